//! Process-local adapters.
//!
//! Both adapters keep their state behind a std lock and never await while
//! holding it. State does not survive a restart.

pub mod message_repository;
pub mod rate_limiter;

pub use message_repository::InMemoryMessageRepository;
pub use rate_limiter::InMemoryRateLimiter;
