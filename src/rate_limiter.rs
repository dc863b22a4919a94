//! Request pacing between page fetches
//!
//! The remote API throttles or bans clients that hammer it, so the fetch loop
//! asks a [`RateLimiter`] for permission before every request. The policy is
//! chosen from [`RateLimitConfig`] and can be swapped without touching the
//! fetch logic.
//!
//! - [`FixedDelay`]: sleeps a fixed interval before every request except the first
//! - [`TokenBucket`]: sustained requests-per-second with a burst allowance
//! - [`Unlimited`]: never waits (local test servers only)

use crate::config::RateLimitConfig;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Gate consulted before each outgoing request
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait until the next request may be sent
    async fn acquire(&self);

    /// Short policy name for logging
    fn name(&self) -> &'static str;
}

/// Build the limiter described by `config`
pub fn from_config(config: &RateLimitConfig) -> Box<dyn RateLimiter> {
    match config {
        RateLimitConfig::FixedDelay { delay } => Box::new(FixedDelay::new(*delay)),
        RateLimitConfig::TokenBucket {
            requests_per_second,
            burst,
        } => Box::new(TokenBucket::new(*requests_per_second, *burst)),
        RateLimitConfig::None => Box::new(Unlimited),
    }
}

/// Pause a fixed interval between consecutive requests
///
/// The first call returns immediately; every later call sleeps for `delay`,
/// regardless of how long the previous request took.
#[derive(Debug)]
pub struct FixedDelay {
    delay: Duration,
    started: AtomicBool,
}

impl FixedDelay {
    /// Create a limiter pausing `delay` between requests
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            started: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl RateLimiter for FixedDelay {
    async fn acquire(&self) {
        if !self.started.swap(true, Ordering::SeqCst) {
            return;
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    fn name(&self) -> &'static str {
        "fixed_delay"
    }
}

/// Slowest refill rate a [`TokenBucket`] accepts
const MIN_RATE: f64 = 1e-3;

/// Longest single nap while waiting for a token
const MAX_WAIT: Duration = Duration::from_secs(1);

/// Token bucket limiter
///
/// # Algorithm
///
/// - One token is one request
/// - Tokens refill continuously at `requests_per_second`
/// - The bucket holds at most `burst` tokens and starts full
/// - `acquire` takes one token, sleeping until one is available
#[derive(Debug)]
pub struct TokenBucket {
    rate: f64,
    capacity: f64,
    state: Mutex<BucketState>,
}

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a bucket refilling at `requests_per_second`, holding up to `burst` tokens
    ///
    /// A non-positive or non-finite rate is raised to one request per 1000 s;
    /// [`Config::validate`] rejects such values before a configured limiter is built.
    ///
    /// [`Config::validate`]: crate::config::Config::validate
    #[must_use]
    pub fn new(requests_per_second: f64, burst: u32) -> Self {
        let rate = if requests_per_second.is_finite() && requests_per_second > 0.0 {
            requests_per_second
        } else {
            MIN_RATE
        };
        let capacity = f64::from(burst.max(1));
        Self {
            rate,
            capacity,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Take a token if one is available, otherwise report how long to wait
    fn try_take(&self) -> Option<Duration> {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let now = Instant::now();
        let elapsed = now.saturating_duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.rate).min(self.capacity);
        state.last_refill = now;

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            None
        } else {
            let missing = 1.0 - state.tokens;
            let wait = Duration::try_from_secs_f64(missing / self.rate).unwrap_or(MAX_WAIT);
            Some(wait.min(MAX_WAIT))
        }
    }
}

#[async_trait]
impl RateLimiter for TokenBucket {
    async fn acquire(&self) {
        // The bucket is re-checked after every nap
        while let Some(wait) = self.try_take() {
            tokio::time::sleep(wait.max(Duration::from_millis(1))).await;
        }
    }

    fn name(&self) -> &'static str {
        "token_bucket"
    }
}

/// Limiter that never waits
#[derive(Debug, Default, Clone, Copy)]
pub struct Unlimited;

#[async_trait]
impl RateLimiter for Unlimited {
    async fn acquire(&self) {}

    fn name(&self) -> &'static str {
        "none"
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_delay_first_acquire_is_immediate() {
        let limiter = FixedDelay::new(Duration::from_millis(200));

        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn fixed_delay_pauses_between_requests() {
        let limiter = FixedDelay::new(Duration::from_millis(40));

        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }

        // Three requests, two gaps
        assert!(
            start.elapsed() >= Duration::from_millis(80),
            "expected at least 80ms, got {:?}",
            start.elapsed()
        );
    }

    #[tokio::test]
    async fn token_bucket_allows_burst_then_throttles() {
        let limiter = TokenBucket::new(20.0, 3);

        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }
        assert!(
            start.elapsed() < Duration::from_millis(30),
            "burst should not wait, took {:?}",
            start.elapsed()
        );

        // Fourth token needs ~50ms of refill at 20 req/s
        limiter.acquire().await;
        assert!(
            start.elapsed() >= Duration::from_millis(40),
            "expected throttling after burst, took {:?}",
            start.elapsed()
        );
    }

    #[test]
    fn token_bucket_reports_wait_when_empty() {
        let limiter = TokenBucket::new(2.0, 1);
        assert!(limiter.try_take().is_none(), "bucket starts full");

        let wait = limiter.try_take().expect("bucket should be empty");
        assert!(wait <= Duration::from_millis(500));
        assert!(wait > Duration::from_millis(400));
    }

    #[test]
    fn token_bucket_zero_rate_waits_are_bounded() {
        let limiter = TokenBucket::new(0.0, 1);
        assert!(limiter.try_take().is_none(), "bucket starts full");

        for _ in 0..2 {
            let wait = limiter.try_take().expect("no refill at the minimum rate");
            assert!(wait <= MAX_WAIT, "wait must be capped, got {wait:?}");
        }
    }

    #[tokio::test]
    async fn token_bucket_zero_rate_second_acquire_blocks_without_panicking() {
        for rate in [0.0, -5.0, f64::NAN] {
            let limiter = TokenBucket::new(rate, 1);
            limiter.acquire().await;

            let second =
                tokio::time::timeout(Duration::from_millis(50), limiter.acquire()).await;
            assert!(second.is_err(), "rate {rate} should still be throttling");
        }
    }

    #[tokio::test]
    async fn unlimited_never_waits() {
        let limiter = Unlimited;
        let start = Instant::now();
        for _ in 0..100 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[test]
    fn from_config_selects_policy() {
        assert_eq!(from_config(&RateLimitConfig::default()).name(), "fixed_delay");
        assert_eq!(
            from_config(&RateLimitConfig::TokenBucket {
                requests_per_second: 1.0,
                burst: 2
            })
            .name(),
            "token_bucket"
        );
        assert_eq!(from_config(&RateLimitConfig::None).name(), "none");
    }
}
