//! Driven port for per-caller call budgets.
//!
//! A limiter tracks how many calls each [`CallerKey`] has made inside the
//! trailing window of a [`RateLimitPolicy`]. Acquisition must be atomic per
//! key: two concurrent callers sharing a key may never both take the last
//! slot.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

/// Identity a budget is tracked against: caller address plus route.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerKey(String);

impl CallerKey {
    /// Build a key from the caller's network address and the request path.
    ///
    /// # Examples
    /// ```
    /// use guestbook::domain::ports::CallerKey;
    ///
    /// let key = CallerKey::new("203.0.113.7", "/messages");
    /// assert_eq!(key.as_str(), "203.0.113.7/messages");
    /// ```
    pub fn new(address: &str, path: &str) -> Self {
        Self(format!("{address}{path}"))
    }

    /// Borrow the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CallerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// At most `max_count` calls per `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    window: Duration,
    max_count: u32,
}

impl RateLimitPolicy {
    /// Build a policy. A zero `max_count` rejects every call.
    #[must_use]
    pub const fn new(window: Duration, max_count: u32) -> Self {
        Self { window, max_count }
    }

    /// Length of the trailing window.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Calls admitted per window.
    #[must_use]
    pub const fn max_count(&self) -> u32 {
        self.max_count
    }
}

/// Outcome of [`RateLimiter::try_acquire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// A slot was reserved for this call.
    Allowed,
    /// The budget is spent; the oldest slot frees up after `retry_after`.
    Rejected { retry_after: Duration },
}

/// Per-caller call budget store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Reserve a slot for `key` under `policy`, or report rejection.
    async fn try_acquire(&self, key: &CallerKey, policy: RateLimitPolicy) -> RateDecision;

    /// Give back the most recent slot reserved for `key`, used when the call
    /// it was reserved for did not succeed.
    async fn release(&self, key: &CallerKey);
}
