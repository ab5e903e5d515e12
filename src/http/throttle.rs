//! Client-side request pacing
//!
//! Every enumerator that sends through one `HttpClient` shares its
//! `Throttle`: a governor token bucket for the configured budget, plus a
//! hold-off deadline set when the service answers `429`. While the deadline
//! is in the future no request of that client goes out, not only the one
//! that was refused.

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

const DEFAULT_REQUESTS_PER_SECOND: NonZeroU32 = match NonZeroU32::new(10) {
    Some(n) => n,
    None => panic!("default rate must be non-zero"),
};

/// Request budget of one client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    per_second: NonZeroU32,
    burst: NonZeroU32,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            per_second: DEFAULT_REQUESTS_PER_SECOND,
            burst: DEFAULT_REQUESTS_PER_SECOND,
        }
    }
}

impl RateLimit {
    /// `requests` per second, with bursts of the same size
    ///
    /// `0` means no client-side limit and gives `None`.
    pub fn per_second(requests: u32) -> Option<Self> {
        NonZeroU32::new(requests).map(|per_second| Self {
            per_second,
            burst: per_second,
        })
    }

    /// Allow bursts of up to `burst` requests; `0` keeps the current burst
    pub fn with_burst(mut self, burst: u32) -> Self {
        if let Some(burst) = NonZeroU32::new(burst) {
            self.burst = burst;
        }
        self
    }

    /// Sustained requests per second
    pub fn requests_per_second(&self) -> u32 {
        self.per_second.get()
    }

    /// Largest burst sent without waiting
    pub fn burst(&self) -> u32 {
        self.burst.get()
    }

    fn quota(self) -> Quota {
        Quota::per_second(self.per_second).allow_burst(self.burst)
    }
}

/// Paces the requests of one client
#[derive(Clone)]
pub(crate) struct Throttle {
    bucket: Option<Arc<DefaultDirectRateLimiter>>,
    hold_until: Arc<Mutex<Option<Instant>>>,
}

impl Throttle {
    pub(crate) fn new(limit: Option<RateLimit>) -> Self {
        Self {
            bucket: limit.map(|limit| Arc::new(RateLimiter::direct(limit.quota()))),
            hold_until: Arc::new(Mutex::new(None)),
        }
    }

    pub(crate) fn is_limited(&self) -> bool {
        self.bucket.is_some()
    }

    /// Wait until the next request may go out
    pub(crate) async fn acquire(&self) {
        let hold_until = *self.hold_until.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(until) = hold_until.filter(|until| *until > Instant::now()) {
            debug!(
                wait_ms = until.saturating_duration_since(Instant::now()).as_millis() as u64,
                "Holding request after throttling response"
            );
            tokio::time::sleep_until(until).await;
        }

        if let Some(bucket) = &self.bucket {
            bucket.until_ready().await;
        }
    }

    /// Hold back every request of this client for `delay`
    ///
    /// An earlier deadline never shortens a later one.
    pub(crate) fn hold_off(&self, delay: Duration) {
        let until = Instant::now() + delay;
        let mut hold_until = self.hold_until.lock().unwrap_or_else(PoisonError::into_inner);
        if hold_until.map_or(true, |current| current < until) {
            *hold_until = Some(until);
        }
    }

    #[cfg(test)]
    pub(crate) fn held_until(&self) -> Option<Instant> {
        *self.hold_until.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Throttle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("limited", &self.is_limited())
            .finish_non_exhaustive()
    }
}
