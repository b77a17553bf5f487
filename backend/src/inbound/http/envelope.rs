//! Uniform result envelope returned by every guestbook route.
//!
//! ```text
//! {"code":200,"message":"success","data":[...]}
//! {"code":52000,"message":"Nickname must not be blank","data":null}
//! ```
//!
//! The transport status is always `200 OK`; callers branch on `code`.

use actix_web::body::BoxBody;
use actix_web::{HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::domain::{Fault, ResultCode};

/// Result alias for guestbook handlers.
///
/// Handlers return `Ok(Envelope::ok(..))` or propagate a [`Fault`] with `?`;
/// the fault middleware renders the latter.
pub type ApiResult<T> = Result<Envelope<T>, Fault>;

/// Response body shared by successes and failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    code: i32,
    message: String,
    data: Option<T>,
}

impl<T> Envelope<T> {
    /// Successful envelope carrying `data`.
    ///
    /// # Examples
    /// ```
    /// use guestbook::inbound::http::envelope::Envelope;
    ///
    /// let envelope = Envelope::ok(vec!["hello"]);
    /// assert_eq!(envelope.code(), 200);
    /// assert_eq!(envelope.message(), "success");
    /// ```
    pub fn ok(data: T) -> Self {
        Self {
            code: ResultCode::Success.code(),
            message: ResultCode::Success.desc().to_owned(),
            data: Some(data),
        }
    }

    /// Failure envelope; `data` is always absent.
    pub fn failure(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Result code.
    #[must_use]
    pub const fn code(&self) -> i32 {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Payload, present only on success.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }
}

impl Envelope<()> {
    /// Success without a payload; `data` serialises as `null`.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            code: ResultCode::Success.code(),
            message: ResultCode::Success.desc().to_owned(),
            data: None,
        }
    }
}

impl<T: Serialize> Responder for Envelope<T> {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        HttpResponse::Ok().json(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use actix_web::{body::to_bytes, http::StatusCode};
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    fn empty_success_serialises_null_data() {
        let value = serde_json::to_value(Envelope::empty()).expect("serialise envelope");
        assert_eq!(
            value,
            json!({"code": 200, "message": "success", "data": null})
        );
    }

    #[rstest]
    fn failure_never_carries_data() {
        let envelope = Envelope::<Vec<u32>>::failure(51000, "Too many requests");
        assert!(envelope.data().is_none());
        let value = serde_json::to_value(&envelope).expect("serialise envelope");
        assert_eq!(value["data"], Value::Null);
        assert_eq!(value["code"], 51000);
    }

    #[actix_web::test]
    async fn responds_with_ok_status_and_json() {
        let req = TestRequest::default().to_http_request();
        let response = Envelope::ok(vec!["hi"]).respond_to(&req);
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body()).await.expect("body bytes");
        let value: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(value["data"], json!(["hi"]));
    }
}
