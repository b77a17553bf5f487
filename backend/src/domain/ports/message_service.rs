//! Driving port for guestbook use-cases.
//!
//! HTTP handlers call this trait and nothing else, so handler tests can swap
//! in a mock and assert exactly what reached the service.

use async_trait::async_trait;
use pagination::PageResult;

use crate::domain::{
    Fault, MessageBackView, MessageFilter, MessageId, MessageView, NewMessage, ReviewDecision,
};

/// Guestbook use-cases exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageService: Send + Sync {
    /// Accept a visitor submission.
    async fn save_message(&self, message: NewMessage) -> Result<(), Fault>;

    /// Messages visible on the public wall, in service-defined order.
    async fn list_messages(&self) -> Result<Vec<MessageView>, Fault>;

    /// Moderation page matching `filter`.
    async fn list_message_back(
        &self,
        filter: MessageFilter,
    ) -> Result<PageResult<MessageBackView>, Fault>;

    /// Apply a moderator's approve/reject decision.
    async fn update_messages_review(&self, decision: ReviewDecision) -> Result<(), Fault>;

    /// Remove messages in bulk.
    async fn remove_by_ids(&self, ids: Vec<MessageId>) -> Result<(), Fault>;
}
