//! Guestbook use-cases backed by a [`MessageRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::PageResult;
use tracing::{debug, info};

use crate::domain::ports::{MessageRepository, MessageRepositoryError, MessageService};
use crate::domain::{
    Fault, MessageBackView, MessageDraft, MessageFilter, MessageId, MessageView, NewMessage,
    ReviewDecision, ReviewStatus, strip_markup,
};

/// Whether fresh submissions need a moderator before going public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewPolicy {
    /// Submissions go straight to the public wall.
    #[default]
    PublishImmediately,
    /// Submissions wait as [`ReviewStatus::Pending`].
    RequireApproval,
}

impl ReviewPolicy {
    const fn initial_status(self) -> ReviewStatus {
        match self {
            Self::PublishImmediately => ReviewStatus::Approved,
            Self::RequireApproval => ReviewStatus::Pending,
        }
    }
}

const EMPTY_IDS: &str = "Message ids must not be empty";
const NOT_FOUND: &str = "Message not found";

fn storage_fault(err: MessageRepositoryError) -> Fault {
    Fault::system(err)
}

/// [`MessageService`] implementation over a message repository.
pub struct GuestbookService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    policy: ReviewPolicy,
}

impl<R> GuestbookService<R> {
    /// Wire the service to its repository and clock.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>, policy: ReviewPolicy) -> Self {
        Self {
            repository,
            clock,
            policy,
        }
    }
}

#[async_trait]
impl<R> MessageService for GuestbookService<R>
where
    R: MessageRepository + 'static,
{
    async fn save_message(&self, message: NewMessage) -> Result<(), Fault> {
        let NewMessage {
            nickname,
            avatar,
            content,
            speed,
            ip_address,
        } = message;
        let draft = MessageDraft {
            nickname: strip_markup(&nickname),
            avatar,
            content: strip_markup(&content),
            speed,
            ip_address,
            review: self.policy.initial_status(),
            created_at: self.clock.utc(),
        };
        let stored = self.repository.insert(draft).await.map_err(storage_fault)?;
        info!(
            message_id = %stored.id,
            pending = stored.review == ReviewStatus::Pending,
            "guestbook message stored"
        );
        Ok(())
    }

    async fn list_messages(&self) -> Result<Vec<MessageView>, Fault> {
        let messages = self
            .repository
            .list_approved()
            .await
            .map_err(storage_fault)?;
        Ok(messages.into_iter().map(MessageView::from).collect())
    }

    async fn list_message_back(
        &self,
        filter: MessageFilter,
    ) -> Result<PageResult<MessageBackView>, Fault> {
        let page = self
            .repository
            .page(&filter)
            .await
            .map_err(storage_fault)?;
        debug!(
            current = filter.page.current(),
            size = filter.page.size(),
            count = page.count(),
            "moderation page loaded"
        );
        Ok(page.map(MessageBackView::from))
    }

    async fn update_messages_review(&self, decision: ReviewDecision) -> Result<(), Fault> {
        if decision.ids.is_empty() {
            return Err(Fault::fail(EMPTY_IDS));
        }
        let updated = self
            .repository
            .update_review(&decision.ids, decision.status)
            .await
            .map_err(storage_fault)?;
        if updated == 0 {
            return Err(Fault::fail(NOT_FOUND));
        }
        info!(
            updated,
            status = decision.status.as_flag(),
            "message review updated"
        );
        Ok(())
    }

    async fn remove_by_ids(&self, ids: Vec<MessageId>) -> Result<(), Fault> {
        if ids.is_empty() {
            return Err(Fault::fail(EMPTY_IDS));
        }
        let removed = self
            .repository
            .delete_many(&ids)
            .await
            .map_err(storage_fault)?;
        info!(requested = ids.len(), removed, "messages removed");
        Ok(())
    }
}
