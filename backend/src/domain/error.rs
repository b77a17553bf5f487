//! Domain-level failure types.
//!
//! Every failure that can escape a guestbook operation is a [`Fault`]. The
//! three variants are the failure taxonomy clients rely on:
//!
//! - [`Fault::Business`]: a deliberate domain-rule failure carrying a
//!   caller-meaningful code and message, surfaced verbatim.
//! - [`Fault::Validation`]: request input violated a declared field
//!   constraint. Only the first field error is shown to callers.
//! - [`Fault::System`]: anything else. The text and backtrace stay in the logs.
//!
//! Faults are transport agnostic. The HTTP adapter renders them as result
//! envelopes.

use std::backtrace::Backtrace;
use std::fmt;

use thiserror::Error;

/// Stable numeric result codes carried in every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ResultCode {
    /// The operation completed.
    Success,
    /// An unclassified failure occurred.
    SystemError,
    /// A business rule rejected the operation.
    Fail,
    /// Request input failed validation.
    ValidError,
}

impl ResultCode {
    /// Numeric value placed in the envelope `code` field.
    ///
    /// # Examples
    /// ```
    /// use guestbook::domain::ResultCode;
    ///
    /// assert_eq!(ResultCode::Success.code(), 200);
    /// assert_eq!(ResultCode::ValidError.code(), 52000);
    /// ```
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Success => 200,
            Self::SystemError => 50000,
            Self::Fail => 51000,
            Self::ValidError => 52000,
        }
    }

    /// Default human-readable description for the code.
    #[must_use]
    pub const fn desc(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::SystemError => "System error",
            Self::Fail => "Operation failed",
            Self::ValidError => "Invalid parameter format",
        }
    }
}

/// Deliberate domain-rule failure.
///
/// ## Invariants
/// - `message` is non-empty once trimmed; blank messages fall back to the
///   description of [`ResultCode::Fail`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BizError {
    code: i32,
    message: String,
}

impl BizError {
    /// Build a business error with an explicit code.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            ResultCode::Fail.desc().to_owned()
        } else {
            message
        };
        Self { code, message }
    }

    /// Business error using the generic [`ResultCode::Fail`] code.
    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(ResultCode::Fail.code(), message)
    }

    /// Code returned to the caller.
    #[must_use]
    pub const fn code(&self) -> i32 {
        self.code
    }

    /// Message returned to the caller.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// A single violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    field: &'static str,
    message: String,
}

impl FieldError {
    /// Record that `field` failed with `message`.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// Wire name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Default message declared for the constraint.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Ordered, non-empty list of field errors for one payload.
///
/// Order follows the payload's field declaration order; nothing here
/// re-sorts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Wrap a list of errors, returning `None` when it is empty.
    #[must_use]
    pub fn from_vec(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    /// First error in declaration order.
    #[must_use]
    pub fn first(&self) -> Option<&FieldError> {
        self.0.first()
    }

    /// All recorded errors.
    #[must_use]
    pub fn as_slice(&self) -> &[FieldError] {
        &self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

/// Unclassified failure with the backtrace captured where it was raised.
#[derive(Debug)]
pub struct SystemFault {
    source: Box<dyn std::error::Error + Send + Sync>,
    backtrace: Backtrace,
}

impl SystemFault {
    /// The wrapped error.
    #[must_use]
    pub fn source_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.source.as_ref()
    }

    /// Backtrace captured when the fault was created.
    #[must_use]
    pub const fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for SystemFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Any failure escaping a guestbook operation.
///
/// # Examples
/// ```
/// use guestbook::domain::{Fault, ResultCode};
///
/// let fault = Fault::fail("Message not found");
/// assert!(matches!(fault, Fault::Business(ref err) if err.code() == ResultCode::Fail.code()));
/// ```
#[derive(Debug, Error)]
pub enum Fault {
    /// Domain-rule failure surfaced verbatim.
    #[error(transparent)]
    Business(#[from] BizError),
    /// Request input violated declared constraints.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    /// Unclassified failure; never shown to callers.
    #[error("{0}")]
    System(SystemFault),
}

impl Fault {
    /// Business fault using [`ResultCode::Fail`].
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Business(BizError::fail(message))
    }

    /// Validation fault for a single field.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation(FieldErrors(vec![FieldError::new(field, message)]))
    }

    /// Validation fault from collected field errors.
    ///
    /// An empty list still yields a validation fault so callers never lose a
    /// rejection; the message falls back to [`ResultCode::ValidError`]'s
    /// description.
    #[must_use]
    pub fn validation(errors: Vec<FieldError>) -> Self {
        match FieldErrors::from_vec(errors) {
            Some(errors) => Self::Validation(errors),
            None => Self::invalid("payload", ResultCode::ValidError.desc()),
        }
    }

    /// Wrap any error as a system fault, capturing a backtrace.
    pub fn system(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::System(SystemFault {
            source: source.into(),
            backtrace: Backtrace::force_capture(),
        })
    }

    /// Short category label used in logs.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Business(_) => "business",
            Self::Validation(_) => "validation",
            Self::System(_) => "system",
        }
    }
}
