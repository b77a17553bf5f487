//! HTTP adapter mapping for domain faults.
//!
//! Purpose: keep [`Fault`] transport agnostic while letting Actix handlers
//! return it directly. Every fault renders as a `200 OK` envelope whose
//! `code` carries the failure category.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use tracing::debug;

use crate::domain::{Fault, ResultCode};
use crate::inbound::http::envelope::Envelope;

/// Message reported when a JSON body cannot be decoded.
pub const BODY_MALFORMED: &str = "Request body is malformed";
/// Message reported when a query string cannot be decoded.
pub const QUERY_MALFORMED: &str = "Query string is malformed";

/// Envelope clients see for `fault`.
///
/// System faults are redacted to the generic description; their text only
/// ever reaches the logs.
///
/// # Examples
/// ```
/// use guestbook::domain::Fault;
/// use guestbook::inbound::http::error::envelope_for;
///
/// let envelope = envelope_for(&Fault::system("connection refused"));
/// assert_eq!(envelope.code(), 50000);
/// assert_eq!(envelope.message(), "System error");
/// ```
#[must_use]
pub fn envelope_for(fault: &Fault) -> Envelope<()> {
    match fault {
        Fault::Business(err) => Envelope::failure(err.code(), err.message()),
        Fault::Validation(errors) => Envelope::failure(
            ResultCode::ValidError.code(),
            errors
                .first()
                .map_or(ResultCode::ValidError.desc(), |error| error.message()),
        ),
        Fault::System(_) => Envelope::failure(
            ResultCode::SystemError.code(),
            ResultCode::SystemError.desc(),
        ),
    }
}

impl ResponseError for Fault {
    fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Ok().json(envelope_for(self))
    }
}

/// `JsonConfig` error handler turning undecodable bodies into validation
/// faults.
///
/// Size overflows and transport failures stay foreign errors and are
/// reported as system faults further up.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    match err {
        JsonPayloadError::Deserialize(_) | JsonPayloadError::ContentType => {
            debug!(error = %err, "rejecting malformed request body");
            Fault::invalid("body", BODY_MALFORMED).into()
        }
        other => other.into(),
    }
}

/// `QueryConfig` error handler turning undecodable query strings into
/// validation faults.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    match err {
        QueryPayloadError::Deserialize(_) => {
            debug!(error = %err, "rejecting malformed query string");
            Fault::invalid("query", QUERY_MALFORMED).into()
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    //! Response contract for each fault category.

    use super::*;
    use crate::domain::{BizError, FieldError};
    use actix_web::body::to_bytes;
    use actix_web::test::TestRequest;
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn render(fault: Fault) -> (StatusCode, Value) {
        let response = fault.error_response();
        let status = response.status();
        let body = to_bytes(response.into_body()).await.expect("body bytes");
        (status, serde_json::from_slice(&body).expect("json body"))
    }

    #[rstest]
    #[case(Fault::from(BizError::new(51007, "Message already reviewed")), 51007, "Message already reviewed")]
    #[case(Fault::fail("Message not found"), 51000, "Message not found")]
    #[case(
        Fault::validation(vec![
            FieldError::new("idList", "Message ids must not be null"),
            FieldError::new("isReview", "Review status must not be null"),
        ]),
        52000,
        "Message ids must not be null"
    )]
    #[case(Fault::system("relation \"message\" does not exist"), 50000, "System error")]
    #[actix_web::test]
    async fn faults_render_as_ok_envelopes(
        #[case] fault: Fault,
        #[case] code: i32,
        #[case] message: &str,
    ) {
        let (status, body) = render(fault).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"code": code, "message": message, "data": null}));
    }

    #[rstest]
    #[actix_web::test]
    async fn system_text_is_not_rendered() {
        let (_, body) = render(Fault::system("password=hunter2")).await;
        assert!(!body.to_string().contains("hunter2"));
    }

    #[rstest]
    fn malformed_json_becomes_validation_fault() {
        let req = TestRequest::default().to_http_request();
        let decode = serde_json::from_str::<Value>("{").expect_err("invalid json");
        let err = json_error_handler(JsonPayloadError::Deserialize(decode), &req);
        let fault = err.as_error::<Fault>().expect("fault error");
        assert_eq!(envelope_for(fault).message(), BODY_MALFORMED);
    }

    #[rstest]
    fn oversized_json_stays_foreign() {
        let req = TestRequest::default().to_http_request();
        let err = json_error_handler(JsonPayloadError::Overflow { limit: 4 }, &req);
        assert!(err.as_error::<Fault>().is_none());
    }
}
