//! Retry policy and consecutive-failure tracking for agent calls.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Attempts per chat call, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Base delay between attempts.
pub const DEFAULT_BASE_DELAY_MS: u64 = 1_000;

/// Consecutive failed turns before the persistent-failure notice.
pub const PERSISTENT_FAILURE_THRESHOLD: u32 = 3;

/// How the wait grows between attempts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    /// `base × attempt`
    #[default]
    Linear,
    /// `base × 2^(attempt - 1)`
    Exponential,
}

/// Retry budget for a single remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            backoff: Backoff::Linear,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Wait before the attempt following the failed `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        match self.backoff {
            Backoff::Linear => self.base_delay.saturating_mul(attempt),
            Backoff::Exponential => self
                .base_delay
                .saturating_mul(2u32.saturating_pow(attempt - 1)),
        }
    }

    /// Whether a failure on `attempt` may be followed by another attempt.
    pub fn allows_another(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

/// Runs `operation` until it succeeds, fails with a non-retryable error, or
/// the policy's attempts are exhausted.
///
/// The closure receives the 1-based attempt number. The last error is
/// returned unchanged.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if policy.allows_another(attempt) && err.is_retryable() => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    "[Retry] Attempt {} failed, retrying in {}ms: {}",
                    attempt,
                    delay.as_millis(),
                    err
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                tracing::debug!("[Retry] Giving up after attempt {}: {}", attempt, err);
                return Err(err);
            }
        }
    }
}

/// Widget-wide counter of consecutive failed chat turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureTracker {
    consecutive: u32,
    threshold: u32,
}

impl FailureTracker {
    pub fn new() -> Self {
        Self {
            consecutive: 0,
            threshold: PERSISTENT_FAILURE_THRESHOLD,
        }
    }

    /// Records a failed turn and reports whether the threshold is reached.
    pub fn record_failure(&mut self) -> bool {
        self.consecutive = self.consecutive.saturating_add(1);
        self.is_persistent()
    }

    pub fn record_success(&mut self) {
        self.consecutive = 0;
    }

    pub fn is_persistent(&self) -> bool {
        self.consecutive >= self.threshold
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }
}

impl Default for FailureTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AidaError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[test]
    fn linear_delay_scales_with_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(3000));
    }

    #[test]
    fn oversized_base_delay_saturates() {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(u64::MAX),
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay_for(3), Duration::MAX);

        let policy = RetryPolicy {
            backoff: Backoff::Exponential,
            ..policy
        };
        assert_eq!(policy.delay_for(40), Duration::MAX);
    }

    #[test]
    fn exponential_delay_doubles() {
        let policy = RetryPolicy {
            backoff: Backoff::Exponential,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(4000));
    }

    #[tokio::test(start_paused = true)]
    async fn retryable_failures_use_three_attempts_with_linear_waits() {
        let calls = Arc::new(AtomicU32::new(0));
        let started = Instant::now();
        let policy = RetryPolicy::default();

        let counter = calls.clone();
        let result: Result<()> = with_retry(&policy, |attempt| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(AidaError::network(format!("attempt {attempt} refused")))
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            result.unwrap_err(),
            AidaError::network("attempt 3 refused")
        );
        // 1000ms after the first failure, 2000ms after the second.
        assert_eq!(started.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_second_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let started = Instant::now();

        let counter = calls.clone();
        let result = with_retry(&RetryPolicy::default(), |attempt| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                if attempt == 1 {
                    Err(AidaError::http(503, "unavailable"))
                } else {
                    Ok("pong")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "pong");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(started.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_error_makes_one_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let started = Instant::now();

        let counter = calls.clone();
        let result: Result<()> = with_retry(&RetryPolicy::default(), |_| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(AidaError::http(403, "forbidden"))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[test]
    fn failure_tracker_escalates_at_three_and_resets() {
        let mut tracker = FailureTracker::new();
        assert!(!tracker.record_failure());
        assert!(!tracker.record_failure());
        assert!(tracker.record_failure());
        assert!(tracker.record_failure());

        tracker.record_success();
        assert_eq!(tracker.consecutive(), 0);
        assert!(!tracker.is_persistent());
    }
}
