//! Guestbook domain: entities, failure taxonomy, use-cases and ports.
//!
//! Public surface:
//! - [`Fault`] / [`BizError`] / [`ResultCode`]: the failure taxonomy and the
//!   numeric codes every envelope carries.
//! - [`Message`] and its read models [`MessageView`] and [`MessageBackView`].
//! - [`GuestbookService`]: the [`ports::MessageService`] implementation.
//! - [`TraceId`]: request correlation identifier.

pub mod error;
pub mod message;
pub mod message_service;
pub mod ports;
pub mod trace_id;

pub use self::error::{BizError, Fault, FieldError, FieldErrors, ResultCode, SystemFault};
pub use self::message::{
    InvalidReviewFlag, Message, MessageBackView, MessageDraft, MessageFilter, MessageId,
    MessageView, NewMessage, ReviewDecision, ReviewStatus, strip_markup,
};
pub use self::message_service::{GuestbookService, ReviewPolicy};
pub use self::trace_id::TraceId;

/// Name of the response header carrying the request's [`TraceId`].
pub const TRACE_ID_HEADER: &str = "trace-id";
