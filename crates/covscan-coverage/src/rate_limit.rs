//! Minimum-interval rate limiter for scraping backend requests.
//!
//! The limiter remembers when the last request was dispatched and makes the
//! next caller wait out the rest of the interval. The returned permit keeps
//! the limiter locked until it is dropped, so holding it across the request
//! guarantees that at most one scrape is ever in flight. Waiters are served
//! in arrival order.

use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;

/// Default spacing between scrape dispatches.
pub const DEFAULT_MIN_INTERVAL: Duration =
    Duration::from_millis(covscan_core::DEFAULT_SCRAPE_MIN_INTERVAL_MS);

#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

/// Exclusive right to dispatch one request. Release by dropping.
#[derive(Debug)]
pub struct RatePermit<'a> {
    dispatched_at: Instant,
    _guard: MutexGuard<'a, Option<Instant>>,
}

impl RatePermit<'_> {
    #[must_use]
    pub fn dispatched_at(&self) -> Instant {
        self.dispatched_at
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

impl RateLimiter {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_dispatch: Mutex::new(None),
        }
    }

    /// Wait until a request may be dispatched, then record the dispatch time.
    pub async fn acquire(&self) -> RatePermit<'_> {
        let mut last = self.last_dispatch.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::debug!(
                    wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                    "rate limiter delaying scrape dispatch"
                );
                tokio::time::sleep(wait).await;
            }
        }

        let now = Instant::now();
        *last = Some(now);
        RatePermit {
            dispatched_at: now,
            _guard: last,
        }
    }
}
