//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the [`MessageService`] port and stay testable without storage.

use std::sync::Arc;

use crate::domain::ports::MessageService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub messages: Arc<dyn MessageService>,
}

impl HttpState {
    /// Wrap the message service.
    pub fn new(messages: Arc<dyn MessageService>) -> Self {
        Self { messages }
    }
}
