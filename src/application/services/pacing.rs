//! # Call Pacing
//!
//! Spaces resolution calls according to a [`RateLimitPolicy`].
//!
//! A [`Pacer`] wraps a direct `governor` limiter with a quota of one call per
//! `policy.delay()` and a burst of one. Concurrent scans sharing one pacer
//! (one credential) stay within the quota together. The first call is never
//! delayed, and a zero delay disables pacing.

use crate::domain::value_objects::RateLimitPolicy;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::fmt;
use std::time::Duration;
use tracing::trace;

/// Hands out evenly spaced call permits.
pub struct Pacer {
    delay: Duration,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl fmt::Debug for Pacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pacer")
            .field("delay", &self.delay)
            .field("limiter", &self.limiter.as_ref().map(|_| "RateLimiter { .. }"))
            .finish()
    }
}

impl Pacer {
    /// Creates a pacer for `policy`.
    #[must_use]
    pub fn new(policy: &RateLimitPolicy) -> Self {
        let delay = policy.delay();
        Self {
            delay,
            limiter: Quota::with_period(delay).map(RateLimiter::direct),
        }
    }

    /// Returns the spacing between calls.
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns `true` if calls are spaced at all.
    #[inline]
    #[must_use]
    pub fn is_paced(&self) -> bool {
        self.limiter.is_some()
    }

    /// Waits until the caller may issue its next call.
    pub async fn wait_turn(&self) {
        if let Some(limiter) = &self.limiter {
            trace!(delay_ms = self.delay.as_millis(), "waiting for call permit");
            limiter.until_ready().await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::TimeUnit;
    use std::sync::Arc;
    use std::time::Instant;

    const SLACK: Duration = Duration::from_millis(5);

    fn pacer(calls: u32, unit: TimeUnit) -> Pacer {
        Pacer::new(&RateLimitPolicy::try_new(calls, 1, unit).unwrap())
    }

    #[tokio::test]
    async fn first_call_is_immediate() {
        let pacer = pacer(1, TimeUnit::Seconds);
        let start = Instant::now();
        pacer.wait_turn().await;
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn consecutive_calls_are_spaced() {
        let pacer = pacer(20, TimeUnit::Seconds);
        assert_eq!(pacer.delay(), Duration::from_millis(50));
        let start = Instant::now();
        for _ in 0..4 {
            pacer.wait_turn().await;
        }
        assert!(start.elapsed() + SLACK >= Duration::from_millis(150));
    }

    #[tokio::test]
    async fn idle_time_counts_towards_the_gap() {
        let pacer = pacer(10, TimeUnit::Seconds);
        pacer.wait_turn().await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        let before = Instant::now();
        pacer.wait_turn().await;
        assert!(before.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn zero_delay_is_not_paced() {
        let pacer = pacer(5000, TimeUnit::Seconds);
        assert!(pacer.delay().is_zero());
        assert!(!pacer.is_paced());
        let start = Instant::now();
        for _ in 0..100 {
            pacer.wait_turn().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn shared_pacer_spaces_concurrent_callers() {
        let pacer = Arc::new(pacer(20, TimeUnit::Seconds));
        let start = Instant::now();
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let pacer = Arc::clone(&pacer);
                tokio::spawn(async move {
                    pacer.wait_turn().await;
                    start.elapsed()
                })
            })
            .collect();

        let mut finished = Vec::new();
        for handle in handles {
            finished.push(handle.await.unwrap());
        }
        finished.sort();
        assert!(finished[1] + SLACK >= Duration::from_millis(50));
        assert!(finished[2] + SLACK >= Duration::from_millis(100));
    }
}
