//! Process-local sliding-window rate limiter.
//!
//! Each key keeps the timestamps of its admitted calls. A call is admitted
//! when fewer than `max_count` timestamps fall inside the trailing window.
//! Check and reservation happen under one mutex acquisition, so concurrent
//! calls for the same key cannot both take the last slot.
//!
//! Keys whose calls have all aged out are swept from the table at most once
//! per window, so callers that never return do not accumulate.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{CallerKey, RateDecision, RateLimitPolicy, RateLimiter};

/// Admitted calls for one key, with the window they were admitted under.
#[derive(Debug)]
struct CallLog {
    window: TimeDelta,
    admitted: VecDeque<DateTime<Utc>>,
}

impl CallLog {
    const fn new(window: TimeDelta) -> Self {
        Self {
            window,
            admitted: VecDeque::new(),
        }
    }

    fn prune(&mut self, now: DateTime<Utc>) {
        while self
            .admitted
            .front()
            .is_some_and(|admitted| now - *admitted >= self.window)
        {
            self.admitted.pop_front();
        }
    }
}

#[derive(Debug, Default)]
struct CallTable {
    logs: HashMap<CallerKey, CallLog>,
    next_sweep: Option<DateTime<Utc>>,
}

impl CallTable {
    fn sweep(&mut self, now: DateTime<Utc>, window: TimeDelta) {
        if self.next_sweep.is_some_and(|due| now < due) {
            return;
        }
        self.logs.retain(|_, log| {
            log.prune(now);
            !log.admitted.is_empty()
        });
        self.next_sweep = now.checked_add_signed(window);
    }
}

/// [`RateLimiter`] keeping per-key call logs in memory.
pub struct InMemoryRateLimiter {
    clock: Arc<dyn Clock>,
    table: Mutex<CallTable>,
}

impl InMemoryRateLimiter {
    /// Limiter reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            table: Mutex::new(CallTable::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CallTable> {
        // The table holds plain timestamps; a panic mid-update cannot leave
        // it structurally inconsistent.
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.lock().logs.len()
    }
}

fn window_delta(window: Duration) -> TimeDelta {
    TimeDelta::from_std(window).unwrap_or(TimeDelta::MAX)
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn try_acquire(&self, key: &CallerKey, policy: RateLimitPolicy) -> RateDecision {
        let now = self.clock.utc();
        let window = window_delta(policy.window());
        let mut table = self.lock();
        table.sweep(now, window);

        let log = table
            .logs
            .entry(key.clone())
            .or_insert_with(|| CallLog::new(window));
        log.window = window;
        log.prune(now);

        let admitted = u32::try_from(log.admitted.len()).unwrap_or(u32::MAX);
        if admitted < policy.max_count() {
            log.admitted.push_back(now);
            return RateDecision::Allowed;
        }

        let retry_after = log
            .admitted
            .front()
            .and_then(|oldest| window.checked_sub(&(now - *oldest)))
            .and_then(|remaining| remaining.to_std().ok())
            .unwrap_or(policy.window());
        let drained = log.admitted.is_empty();
        if drained {
            table.logs.remove(key);
        }
        RateDecision::Rejected { retry_after }
    }

    async fn release(&self, key: &CallerKey) {
        let mut table = self.lock();
        if let Some(log) = table.logs.get_mut(key) {
            log.admitted.pop_back();
            if log.admitted.is_empty() {
                table.logs.remove(key);
            }
        }
    }
}
