//! Declarative request validation for inbound HTTP adapters.
//!
//! Request payloads implement [`Validate`], checking their fields in
//! declaration order and producing either the validated command or every
//! violated constraint. [`ValidJson`] runs the check during extraction, so a
//! handler body only ever sees valid input.

use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use serde::de::DeserializeOwned;

use crate::domain::{Fault, FieldError};

/// Payload that can be checked against its declared field constraints.
pub trait Validate {
    /// Command produced once every constraint holds.
    type Valid;

    /// Check fields in declaration order.
    ///
    /// # Errors
    /// Returns every violated constraint, first-declared field first.
    fn validate(self) -> Result<Self::Valid, Vec<FieldError>>;
}

/// Accumulates field errors while a payload is being checked.
#[derive(Debug, Default)]
pub(crate) struct FieldChecks {
    errors: Vec<FieldError>,
}

impl FieldChecks {
    /// Require a value that is present and not only whitespace.
    pub(crate) fn not_blank(
        &mut self,
        field: &'static str,
        value: Option<String>,
        message: &str,
    ) -> Option<String> {
        match value {
            Some(text) if !text.trim().is_empty() => Some(text),
            _ => {
                self.errors.push(FieldError::new(field, message));
                None
            }
        }
    }

    /// Require a value that is present.
    pub(crate) fn present<T>(
        &mut self,
        field: &'static str,
        value: Option<T>,
        message: &str,
    ) -> Option<T> {
        if value.is_none() {
            self.errors.push(FieldError::new(field, message));
        }
        value
    }

    /// Record a violation found by a custom check.
    pub(crate) fn reject(&mut self, field: &'static str, message: &str) {
        self.errors.push(FieldError::new(field, message));
    }

    pub(crate) fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

/// JSON body extractor that validates before the handler runs.
///
/// Decoding honours the app's `JsonConfig`; constraint violations surface as
/// [`Fault::Validation`].
///
/// # Examples
/// ```
/// use guestbook::inbound::http::messages::MessageRequest;
/// use guestbook::inbound::http::validation::ValidJson;
///
/// async fn handler(ValidJson(submission): ValidJson<MessageRequest>) -> String {
///     submission.nickname
/// }
/// ```
pub struct ValidJson<T: Validate>(pub T::Valid);

impl<T> FromRequest for ValidJson<T>
where
    T: Validate + DeserializeOwned + 'static,
{
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let json = web::Json::<T>::from_request(req, payload);
        Box::pin(async move {
            let body = json.await?.into_inner();
            let valid = body.validate().map_err(Fault::validation)?;
            Ok::<_, actix_web::Error>(ValidJson::<T>(valid))
        })
    }
}
