//! Offset pagination primitives shared by guestbook list endpoints.
//!
//! [`PageRequest`] carries a 1-based page number and a page size and derives
//! the row offset adapters need. [`PageResult`] is the page envelope returned
//! to clients: the records of the requested page plus the total match count.
//!
//! ```
//! use pagination::{PageRequest, PageResult};
//!
//! let request = PageRequest::new(3, 10).expect("valid page request");
//! assert_eq!(request.offset(), 20);
//!
//! let page = PageResult::new(vec!["a", "b"], 22);
//! assert_eq!(page.count(), 22);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page number used when a client omits `current`.
pub const DEFAULT_CURRENT: u64 = 1;
/// Page size used when a client omits `size`.
pub const DEFAULT_SIZE: u64 = 10;
/// Largest page size a client may request.
pub const MAX_SIZE: u64 = 100;

/// Validation errors raised by [`PageRequest::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Page numbers start at one.
    #[error("page number must be at least 1")]
    ZeroPage,
    /// Empty pages are never requested.
    #[error("page size must be at least 1")]
    ZeroSize,
    /// The requested size exceeds [`MAX_SIZE`].
    #[error("page size must not exceed {max}")]
    SizeTooLarge {
        /// Configured ceiling.
        max: u64,
    },
}

/// Validated offset pagination request.
///
/// ## Invariants
/// - `current >= 1`
/// - `1 <= size <= MAX_SIZE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    current: u64,
    size: u64,
}

impl PageRequest {
    /// Validate and build a page request.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when either bound is violated.
    pub const fn new(current: u64, size: u64) -> Result<Self, PageRequestError> {
        if current == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if size == 0 {
            return Err(PageRequestError::ZeroSize);
        }
        if size > MAX_SIZE {
            return Err(PageRequestError::SizeTooLarge { max: MAX_SIZE });
        }
        Ok(Self { current, size })
    }

    /// Build a request from optional client input, substituting defaults.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when a supplied value is out of range.
    ///
    /// # Examples
    /// ```
    /// use pagination::{DEFAULT_SIZE, PageRequest};
    ///
    /// let request = PageRequest::from_parts(None, None).expect("defaults are valid");
    /// assert_eq!(request.current(), 1);
    /// assert_eq!(request.size(), DEFAULT_SIZE);
    /// ```
    pub fn from_parts(current: Option<u64>, size: Option<u64>) -> Result<Self, PageRequestError> {
        Self::new(
            current.unwrap_or(DEFAULT_CURRENT),
            size.unwrap_or(DEFAULT_SIZE),
        )
    }

    /// 1-based page number.
    #[must_use]
    pub const fn current(&self) -> u64 {
        self.current
    }

    /// Number of records per page.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Number of records preceding the requested page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.current - 1).saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            current: DEFAULT_CURRENT,
            size: DEFAULT_SIZE,
        }
    }
}

/// One page of records with the total number of matching records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    record_list: Vec<T>,
    count: u64,
}

impl<T> PageResult<T> {
    /// Wrap a page of records with the overall match count.
    #[must_use]
    pub const fn new(record_list: Vec<T>, count: u64) -> Self {
        Self { record_list, count }
    }

    /// Page with no records and a zero count.
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    /// Records on this page.
    #[must_use]
    pub fn records(&self) -> &[T] {
        &self.record_list
    }

    /// Total matching records across all pages.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Convert each record while keeping the count.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            record_list: self.record_list.into_iter().map(f).collect(),
            count: self.count,
        }
    }

    /// Consume the page and return its records.
    #[must_use]
    pub fn into_records(self) -> Vec<T> {
        self.record_list
    }
}
