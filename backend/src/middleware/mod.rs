//! Request middleware.
//!
//! Purpose: request lifecycle concerns. [`Trace`] and [`FaultTranslator`]
//! wrap the whole `App`; [`RateLimit`] and [`Audited`] are attached to
//! individual routes.

pub mod audit;
pub mod fault;
pub mod rate_limit;
pub mod trace;

pub use audit::Audited;
pub use fault::FaultTranslator;
pub use rate_limit::RateLimit;
pub use trace::Trace;
