//! Driven port for guestbook message storage.
//!
//! The message service persists and queries messages exclusively through
//! this trait. Adapters translate their own failures into
//! [`MessageRepositoryError`] so the service can treat every storage problem
//! as a system fault.

use async_trait::async_trait;
use pagination::PageResult;

use super::define_port_error;
use crate::domain::{Message, MessageDraft, MessageFilter, MessageId, ReviewStatus};

define_port_error! {
    /// Errors raised by message storage adapters.
    pub enum MessageRepositoryError {
        /// Backing store could not be reached.
        Connection { message: String } => "message store connection failed: {message}",
        /// A read or write failed after connecting.
        Query { message: String } => "message store query failed: {message}",
        /// Identifier space is exhausted.
        IdExhausted { last: u32 } => "message identifiers exhausted after {last}",
    }
}

/// Storage contract for messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Store a draft and return it with its assigned identifier.
    async fn insert(&self, draft: MessageDraft) -> Result<Message, MessageRepositoryError>;

    /// Approved messages in submission order.
    async fn list_approved(&self) -> Result<Vec<Message>, MessageRepositoryError>;

    /// One page of messages matching `filter`, newest first, with the total
    /// number of matches.
    async fn page(
        &self,
        filter: &MessageFilter,
    ) -> Result<PageResult<Message>, MessageRepositoryError>;

    /// Set the review status of the given messages; returns how many existed.
    async fn update_review(
        &self,
        ids: &[MessageId],
        status: ReviewStatus,
    ) -> Result<u64, MessageRepositoryError>;

    /// Delete the given messages; returns how many existed.
    async fn delete_many(&self, ids: &[MessageId]) -> Result<u64, MessageRepositoryError>;
}
