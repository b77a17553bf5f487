//! Per-route call budget middleware.
//!
//! Callers are identified by their socket peer address plus the request
//! path. Forwarding headers are only consulted when the deployment sits
//! behind a proxy that sets them. A reserved slot is handed back when the request ends in a failure,
//! so only successful calls consume the budget.

use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;

use crate::domain::Fault;
use crate::domain::ports::{CallerKey, RateDecision, RateLimitPolicy, RateLimiter};
use crate::inbound::http::{peer_address, remote_address};

/// Message returned when a caller exhausts its budget.
pub const TOO_MANY_REQUESTS: &str = "Too many requests, please try again later";

/// Middleware enforcing a [`RateLimitPolicy`] on the wrapped route.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use actix_web::{HttpResponse, web};
/// use guestbook::domain::ports::RateLimitPolicy;
/// use guestbook::middleware::RateLimit;
/// use guestbook::outbound::memory::InMemoryRateLimiter;
/// use mockable::DefaultClock;
///
/// let limiter = Arc::new(InMemoryRateLimiter::new(Arc::new(DefaultClock)));
/// let policy = RateLimitPolicy::new(Duration::from_secs(60), 1);
/// let route = web::post()
///     .to(|| async { HttpResponse::Ok().finish() })
///     .wrap(RateLimit::new(policy, limiter));
/// ```
#[derive(Clone)]
pub struct RateLimit {
    policy: RateLimitPolicy,
    limiter: Arc<dyn RateLimiter>,
    trust_forwarded: bool,
}

impl RateLimit {
    /// Limit callers to `policy` using `limiter` for bookkeeping.
    pub fn new(policy: RateLimitPolicy, limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            policy,
            limiter,
            trust_forwarded: false,
        }
    }

    /// Identify callers by `Forwarded`/`X-Forwarded-For` instead of the
    /// socket peer.
    #[must_use]
    pub const fn trust_forwarded(mut self, trust: bool) -> Self {
        self.trust_forwarded = trust;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            policy: self.policy,
            limiter: Arc::clone(&self.limiter),
            trust_forwarded: self.trust_forwarded,
        }))
    }
}

/// Service wrapper produced by [`RateLimit`].
pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    policy: RateLimitPolicy,
    limiter: Arc<dyn RateLimiter>,
    trust_forwarded: bool,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let limiter = Arc::clone(&self.limiter);
        let policy = self.policy;
        let trust_forwarded = self.trust_forwarded;
        Box::pin(async move {
            let address = if trust_forwarded {
                remote_address(&req.connection_info())
            } else {
                peer_address(&req.connection_info())
            };
            let key = CallerKey::new(&address, req.path());
            if let RateDecision::Rejected { retry_after } =
                limiter.try_acquire(&key, policy).await
            {
                warn!(
                    caller = %key,
                    retry_after_secs = retry_after.as_secs(),
                    "call budget exhausted"
                );
                let res = req.error_response(Fault::fail(TOO_MANY_REQUESTS));
                return Ok(res.map_into_right_body());
            }

            let res = service.call(req).await;
            let failed = match &res {
                Ok(res) => res.response().error().is_some(),
                Err(_) => true,
            };
            if failed {
                limiter.release(&key).await;
            }
            res.map(ServiceResponse::map_into_left_body)
        })
    }
}
