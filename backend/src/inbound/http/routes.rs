//! Route table for the guestbook endpoints.
//!
//! ```text
//! POST   /messages               rate limited
//! GET    /messages
//! GET    /showMessages
//! GET    /admin/messages
//! PUT    /admin/messages/review  audited as update
//! DELETE /admin/messages         audited as remove
//! ```

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{AuditLog, OperationType, RateLimitPolicy, RateLimiter};
use crate::inbound::http::error::{json_error_handler, query_error_handler};
use crate::inbound::http::messages::{
    delete_messages, list_message_back, list_messages, save_message, show_messages,
    update_messages_review,
};
use crate::middleware::{Audited, RateLimit};

/// Module name recorded in audit entries for these routes.
pub const AUDIT_MODULE: &str = "message";

/// Collaborators for the per-route middleware.
#[derive(Clone)]
pub struct RouteGuards {
    pub limiter: Arc<dyn RateLimiter>,
    pub submit_policy: RateLimitPolicy,
    /// Key the submission budget on `Forwarded`/`X-Forwarded-For` rather than
    /// the socket peer. Only safe behind a proxy that overwrites them.
    pub trust_forwarded: bool,
    pub audit: Arc<dyn AuditLog>,
}

/// Register JSON and query extractor settings mapping decode failures to
/// validation faults.
pub fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler));
}

/// Register every guestbook route.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use actix_web::App;
/// use guestbook::domain::ports::RateLimitPolicy;
/// use guestbook::inbound::http::routes::{RouteGuards, configure};
/// use guestbook::outbound::audit::TracingAuditLog;
/// use guestbook::outbound::memory::InMemoryRateLimiter;
/// use mockable::DefaultClock;
///
/// let guards = RouteGuards {
///     limiter: Arc::new(InMemoryRateLimiter::new(Arc::new(DefaultClock))),
///     submit_policy: RateLimitPolicy::new(Duration::from_secs(60), 1),
///     trust_forwarded: false,
///     audit: Arc::new(TracingAuditLog),
/// };
/// let app = App::new().configure(|cfg| configure(cfg, &guards));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig, guards: &RouteGuards) {
    extractor_configs(cfg);
    cfg.service(
        web::resource("/messages")
            .route(
                web::post().to(save_message).wrap(
                    RateLimit::new(guards.submit_policy, Arc::clone(&guards.limiter))
                        .trust_forwarded(guards.trust_forwarded),
                ),
            )
            .route(web::get().to(list_messages)),
    )
    .service(web::resource("/showMessages").route(web::get().to(show_messages)))
    .service(
        web::resource("/admin/messages")
            .route(web::get().to(list_message_back))
            .route(web::delete().to(delete_messages).wrap(Audited::new(
                AUDIT_MODULE,
                OperationType::Remove,
                Arc::clone(&guards.audit),
            ))),
    )
    .service(
        web::resource("/admin/messages/review").route(web::put().to(update_messages_review).wrap(
            Audited::new(
                AUDIT_MODULE,
                OperationType::Update,
                Arc::clone(&guards.audit),
            ),
        )),
    );
}
