//! Server construction and middleware wiring.

mod config;

pub use config::ServerSettings;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::{Clock, DefaultClock};
use tracing::info;

use guestbook::domain::GuestbookService;
#[cfg(debug_assertions)]
use guestbook::doc::ApiDoc;
use guestbook::inbound::http::routes::{RouteGuards, configure};
use guestbook::inbound::http::state::HttpState;
use guestbook::outbound::audit::TracingAuditLog;
use guestbook::outbound::memory::{InMemoryMessageRepository, InMemoryRateLimiter};
use guestbook::{FaultTranslator, Trace};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    http_state: web::Data<HttpState>,
    guards: RouteGuards,
}

fn build_dependencies(settings: &ServerSettings) -> AppDependencies {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let repository = Arc::new(InMemoryMessageRepository::new());
    let service = GuestbookService::new(repository, Arc::clone(&clock), settings.review_policy());
    AppDependencies {
        http_state: web::Data::new(HttpState::new(Arc::new(service))),
        guards: RouteGuards {
            limiter: Arc::new(InMemoryRateLimiter::new(clock)),
            submit_policy: settings.submit_policy(),
            trust_forwarded: settings.trust_forwarded,
            audit: Arc::new(TracingAuditLog),
        },
    }
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies { http_state, guards } = deps;

    let app = App::new()
        .app_data(http_state)
        .wrap(FaultTranslator)
        .wrap(Trace)
        .configure(|cfg| configure(cfg, &guards));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the HTTP server from loaded settings.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(settings: &ServerSettings) -> std::io::Result<Server> {
    // Built once so every worker shares the same store and rate-limit table.
    let deps = build_dependencies(settings);
    let bind_addr = settings.bind_addr();
    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();
    info!(%bind_addr, "guestbook listening");
    Ok(server)
}
