//! Operation audit middleware.
//!
//! Wraps mutating routes and records one [`AuditEntry`] per request once
//! the response is known. The response itself is never altered.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::domain::ports::{AuditEntry, AuditLog, AuditOutcome, OperationType};
use crate::domain::{Fault, ResultCode, TraceId};
use crate::inbound::http::error::envelope_for;
use crate::inbound::http::remote_address;

fn failure_code(err: &Error) -> i32 {
    err.as_error::<Fault>()
        .map_or(ResultCode::SystemError.code(), |fault| {
            envelope_for(fault).code()
        })
}

/// Middleware recording the wrapped route in the audit trail.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use actix_web::{HttpResponse, web};
/// use guestbook::domain::ports::OperationType;
/// use guestbook::middleware::Audited;
/// use guestbook::outbound::audit::TracingAuditLog;
///
/// let route = web::delete()
///     .to(|| async { HttpResponse::Ok().finish() })
///     .wrap(Audited::new("message", OperationType::Remove, Arc::new(TracingAuditLog)));
/// ```
#[derive(Clone)]
pub struct Audited {
    module: &'static str,
    operation: OperationType,
    log: Arc<dyn AuditLog>,
}

impl Audited {
    /// Audit `operation` within `module` into `log`.
    pub fn new(module: &'static str, operation: OperationType, log: Arc<dyn AuditLog>) -> Self {
        Self {
            module,
            operation,
            log,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Audited
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuditedMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuditedMiddleware {
            service,
            audit: self.clone(),
        }))
    }
}

/// Service wrapper produced by [`Audited`].
pub struct AuditedMiddleware<S> {
    service: S,
    audit: Audited,
}

impl<S, B> Service<ServiceRequest> for AuditedMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Audited {
            module,
            operation,
            log,
        } = self.audit.clone();
        let method = req.method().to_string();
        let path = req.path().to_owned();
        let remote_addr = remote_address(&req.connection_info());
        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await;
            let outcome = match &res {
                Ok(res) => res
                    .response()
                    .error()
                    .map_or(AuditOutcome::Succeeded, |err| AuditOutcome::Failed {
                        code: failure_code(err),
                    }),
                Err(err) => AuditOutcome::Failed {
                    code: failure_code(err),
                },
            };
            log.record(AuditEntry {
                module,
                operation,
                method,
                path,
                remote_addr,
                outcome,
                trace_id: TraceId::current(),
            });
            res
        })
    }
}
