//! Fault translation middleware.
//!
//! Every failure escaping a handler, an extractor or a route middleware ends
//! up here. Failures are classified in a fixed order:
//!
//! 1. [`Fault::Business`]: code and message are rendered verbatim.
//! 2. [`Fault::Validation`]: rendered as `52000` with the first field message.
//! 3. Anything else, including foreign Actix errors, becomes a
//!    [`Fault::System`] rendered as `50000 System error`.
//!
//! Each fault is logged once at `error` level with the request URL, method,
//! caller address and, for system faults, the captured backtrace. Logging
//! never changes the response.

use std::fmt::Write as _;
use std::task::{Context, Poll};

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::error;

use crate::domain::{Fault, TraceId};
use crate::inbound::http::remote_address;

/// Platform line separator used inside multi-line fault logs.
pub const LINE_SEPARATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Where a failed request came from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RequestContext {
    url: String,
    method: String,
    remote_addr: String,
}

impl RequestContext {
    fn capture(req: &ServiceRequest) -> Self {
        let info = req.connection_info();
        Self {
            url: format!("{}://{}{}", info.scheme(), info.host(), req.uri()),
            method: req.method().to_string(),
            remote_addr: remote_address(&info),
        }
    }
}

fn describe(context: &RequestContext, fault: &Fault) -> String {
    let mut text = format!(
        "accessAddr: {}, method: {}, remoteAddr: {}{LINE_SEPARATOR}errorInfo: {fault}",
        context.url, context.method, context.remote_addr
    );
    if let Fault::System(inner) = fault {
        text.push_str(LINE_SEPARATOR);
        for frame in inner
            .backtrace()
            .to_string()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
        {
            // Writing into a `String` cannot fail.
            let _ = write!(text, "\tat {frame}{LINE_SEPARATOR}");
        }
    }
    text
}

fn log_fault(context: &RequestContext, fault: &Fault) {
    let trace_id = TraceId::current().map(|id| id.to_string());
    error!(
        category = fault.category(),
        trace_id = trace_id.as_deref(),
        "{}",
        describe(context, fault)
    );
}

/// Middleware rendering every failure as a result envelope.
///
/// Register it once on the `App`, inside [`crate::Trace`] so fault logs carry
/// the request's trace id.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use guestbook::{FaultTranslator, Trace};
///
/// let app = App::new().wrap(FaultTranslator).wrap(Trace);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FaultTranslator;

impl<S, B> Transform<S, ServiceRequest> for FaultTranslator
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = FaultTranslatorMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(FaultTranslatorMiddleware { service }))
    }
}

/// Service wrapper produced by [`FaultTranslator`].
pub struct FaultTranslatorMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for FaultTranslatorMiddleware<S>
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
        let context = RequestContext::capture(&req);
        let fut = self.service.call(req);
        Box::pin(async move {
            let res = match fut.await {
                Ok(res) => res,
                // Actix renders a returned `Fault` through its `ResponseError`
                // impl, so the envelope shape holds on this path too.
                Err(err) => {
                    let logged = err
                        .as_error::<Fault>()
                        .map(|fault| log_fault(&context, fault))
                        .is_some();
                    if logged {
                        return Err(err);
                    }
                    let fault = Fault::system(err.to_string());
                    log_fault(&context, &fault);
                    return Err(fault.into());
                }
            };

            let foreign = res
                .response()
                .error()
                .and_then(|err| match err.as_error::<Fault>() {
                    Some(fault) => {
                        log_fault(&context, fault);
                        None
                    }
                    None => Some(Fault::system(err.to_string())),
                });
            match foreign {
                None => Ok(res.map_into_left_body()),
                Some(fault) => {
                    log_fault(&context, &fault);
                    let (req, _) = res.into_parts();
                    Ok(ServiceResponse::new(req, HttpResponse::from_error(fault))
                        .map_into_right_body())
                }
            }
        })
    }
}
