//! Guestbook backend library modules.
//!
//! Hexagonal layout: [`domain`] holds entities, faults and ports,
//! [`inbound`] adapts HTTP onto the domain, [`outbound`] implements the
//! driven ports, and [`middleware`] carries request lifecycle concerns.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(test)]
pub(crate) mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::{FaultTranslator, Trace};
