//! Outbound adapters implementing domain ports.
//!
//! - **memory**: process-local message store and rate limiter
//! - **audit**: audit trail written through `tracing` on its own target
//!
//! Adapters translate between domain types and their backing store. They
//! contain no business rules.

pub mod audit;
pub mod memory;
