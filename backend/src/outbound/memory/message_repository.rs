//! Process-local message store.
//!
//! Messages live in a `BTreeMap` keyed by identifier, so iteration order is
//! submission order. Contents are lost on restart.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use pagination::PageResult;

use crate::domain::ports::{MessageRepository, MessageRepositoryError};
use crate::domain::{Message, MessageDraft, MessageFilter, MessageId, ReviewStatus};

#[derive(Debug, Default)]
struct Store {
    last_id: u32,
    messages: BTreeMap<MessageId, Message>,
}

/// [`MessageRepository`] backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryMessageRepository {
    store: RwLock<Store>,
}

impl InMemoryMessageRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Store>, MessageRepositoryError> {
        self.store
            .read()
            .map_err(|_| MessageRepositoryError::query("message store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Store>, MessageRepositoryError> {
        self.store
            .write()
            .map_err(|_| MessageRepositoryError::query("message store lock poisoned"))
    }
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(&self, draft: MessageDraft) -> Result<Message, MessageRepositoryError> {
        let mut store = self.write()?;
        let next = store
            .last_id
            .checked_add(1)
            .ok_or_else(|| MessageRepositoryError::id_exhausted(store.last_id))?;
        store.last_id = next;
        let message = Message::from_draft(MessageId::new(next), draft);
        store.messages.insert(message.id, message.clone());
        Ok(message)
    }

    async fn list_approved(&self) -> Result<Vec<Message>, MessageRepositoryError> {
        let store = self.read()?;
        Ok(store
            .messages
            .values()
            .filter(|message| message.review == ReviewStatus::Approved)
            .cloned()
            .collect())
    }

    async fn page(
        &self,
        filter: &MessageFilter,
    ) -> Result<PageResult<Message>, MessageRepositoryError> {
        let store = self.read()?;
        let matching: Vec<&Message> = store
            .messages
            .values()
            .rev()
            .filter(|message| filter.matches(message))
            .collect();
        let count = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let records = matching
            .into_iter()
            .skip(to_usize(filter.page.offset()))
            .take(to_usize(filter.page.size()))
            .cloned()
            .collect();
        Ok(PageResult::new(records, count))
    }

    async fn update_review(
        &self,
        ids: &[MessageId],
        status: ReviewStatus,
    ) -> Result<u64, MessageRepositoryError> {
        let mut store = self.write()?;
        let mut updated = 0_u64;
        for id in ids {
            if let Some(message) = store.messages.get_mut(id) {
                message.review = status;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete_many(&self, ids: &[MessageId]) -> Result<u64, MessageRepositoryError> {
        let mut store = self.write()?;
        let removed = ids
            .iter()
            .filter(|id| store.messages.remove(*id).is_some())
            .count();
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    //! Behavioural coverage for the in-memory store.

    use super::*;
    use chrono::{TimeZone, Utc};
    use pagination::PageRequest;
    use rstest::{fixture, rstest};

    fn draft(nickname: &str, review: ReviewStatus) -> MessageDraft {
        MessageDraft {
            nickname: nickname.to_owned(),
            avatar: "avatar.png".to_owned(),
            content: format!("{nickname} was here"),
            speed: None,
            ip_address: "192.0.2.1".to_owned(),
            review,
            created_at: Utc
                .with_ymd_and_hms(2021, 7, 29, 8, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[fixture]
    async fn seeded() -> InMemoryMessageRepository {
        let repository = InMemoryMessageRepository::new();
        for (nickname, review) in [
            ("Ada", ReviewStatus::Approved),
            ("Bob", ReviewStatus::Pending),
            ("Adam", ReviewStatus::Approved),
            ("Cy", ReviewStatus::Pending),
        ] {
            repository
                .insert(draft(nickname, review))
                .await
                .expect("insert succeeds");
        }
        repository
    }

    #[rstest]
    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let repository = InMemoryMessageRepository::new();
        let first = repository
            .insert(draft("Ada", ReviewStatus::Approved))
            .await
            .expect("insert succeeds");
        let second = repository
            .insert(draft("Bob", ReviewStatus::Approved))
            .await
            .expect("insert succeeds");
        assert_eq!(first.id, MessageId::new(1));
        assert_eq!(second.id, MessageId::new(2));
    }

    #[rstest]
    #[tokio::test]
    async fn list_approved_keeps_submission_order(#[future] seeded: InMemoryMessageRepository) {
        let repository = seeded.await;
        let names: Vec<String> = repository
            .list_approved()
            .await
            .expect("list succeeds")
            .into_iter()
            .map(|message| message.nickname)
            .collect();
        assert_eq!(names, ["Ada", "Adam"]);
    }

    #[rstest]
    #[tokio::test]
    async fn page_filters_and_orders_newest_first(#[future] seeded: InMemoryMessageRepository) {
        let repository = seeded.await;
        let filter = MessageFilter {
            page: PageRequest::new(1, 1).expect("valid page"),
            keywords: Some("ad".to_owned()),
            review: None,
        };
        let page = repository.page(&filter).await.expect("page succeeds");
        assert_eq!(page.count(), 2);
        assert_eq!(page.records().len(), 1);
        assert_eq!(page.records()[0].nickname, "Adam");

        let second = MessageFilter {
            page: PageRequest::new(2, 1).expect("valid page"),
            ..filter
        };
        let page = repository.page(&second).await.expect("page succeeds");
        assert_eq!(page.records()[0].nickname, "Ada");
    }

    #[rstest]
    #[tokio::test]
    async fn update_review_counts_existing_ids(#[future] seeded: InMemoryMessageRepository) {
        let repository = seeded.await;
        let updated = repository
            .update_review(
                &[MessageId::new(2), MessageId::new(99)],
                ReviewStatus::Approved,
            )
            .await
            .expect("update succeeds");
        assert_eq!(updated, 1);
        let approved = repository.list_approved().await.expect("list succeeds");
        assert_eq!(approved.len(), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_many_ignores_missing_ids(#[future] seeded: InMemoryMessageRepository) {
        let repository = seeded.await;
        let removed = repository
            .delete_many(&[MessageId::new(1), MessageId::new(1), MessageId::new(42)])
            .await
            .expect("delete succeeds");
        assert_eq!(removed, 1);
        let page = repository
            .page(&MessageFilter::default())
            .await
            .expect("page succeeds");
        assert_eq!(page.count(), 3);
    }
}
