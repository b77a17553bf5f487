//! Domain ports: the edges of the hexagon.
//!
//! [`MessageService`] is the driving port HTTP handlers call.
//! [`MessageRepository`], [`RateLimiter`] and [`AuditLog`] are driven ports
//! implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod audit_log;
mod message_repository;
mod message_service;
mod rate_limiter;

#[cfg(test)]
pub use audit_log::MockAuditLog;
pub use audit_log::{AuditEntry, AuditLog, AuditOutcome, OperationType};
#[cfg(test)]
pub use message_repository::MockMessageRepository;
pub use message_repository::{MessageRepository, MessageRepositoryError};
#[cfg(test)]
pub use message_service::MockMessageService;
pub use message_service::MessageService;
#[cfg(test)]
pub use rate_limiter::MockRateLimiter;
pub use rate_limiter::{CallerKey, RateDecision, RateLimitPolicy, RateLimiter};
