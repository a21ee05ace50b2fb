//! Exponential backoff for Camino requests
//!
//! Delay before retry `n` (0-indexed) is `backoff * 2^n` seconds, capped at
//! the configured maximum. Only errors whose [`Retryable::is_retryable`]
//! returns true are retried.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::CaminoConfig;
use crate::error::CaminoError;

/// Backoff schedule derived from [`CaminoConfig`]
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_secs: f64,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_retries: u32, backoff_secs: f64, max_delay: Duration) -> Self {
        Self {
            max_retries,
            backoff_secs,
            max_delay,
        }
    }

    pub const fn from_config(config: &CaminoConfig) -> Self {
        Self::new(
            config.max_retries,
            config.retry_backoff,
            Duration::from_secs(config.max_backoff_secs),
        )
    }

    /// No retries at all
    pub const fn none() -> Self {
        Self::new(0, 0.0, Duration::ZERO)
    }

    /// Delay before retry `attempt` (0-indexed)
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(63) as i32;
        let secs = self.backoff_secs * 2f64.powi(exponent);
        let cap = self.max_delay.as_secs_f64();

        if !secs.is_finite() || secs >= cap {
            return self.max_delay;
        }
        Duration::from_secs_f64(secs.max(0.0))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&CaminoConfig::default())
    }
}

/// Errors that know whether a retry may succeed
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for CaminoError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

/// Final outcome of a retried operation
#[derive(Debug)]
pub struct RetryResult<T, E> {
    pub result: Result<T, E>,
    /// Attempts made (1 = no retries)
    pub attempts: u32,
    pub total_duration: Duration,
}

impl<T, E> RetryResult<T, E> {
    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// the retry budget is spent
#[allow(clippy::cast_possible_truncation)]
pub async fn with_retry<F, Fut, T, E>(policy: &RetryPolicy, mut operation: F) -> RetryResult<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let start = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;

        let err = match operation().await {
            Ok(value) => {
                if attempts > 1 {
                    debug!(attempts, "Request succeeded after retries");
                }
                return RetryResult {
                    result: Ok(value),
                    attempts,
                    total_duration: start.elapsed(),
                };
            },
            Err(err) => err,
        };

        let retry_attempt = attempts - 1;
        if !err.is_retryable() || retry_attempt >= policy.max_retries {
            if err.is_retryable() {
                warn!(attempts, error = %err, "Request failed after max retries");
            }
            return RetryResult {
                result: Err(err),
                attempts,
                total_duration: start.elapsed(),
            };
        }

        let delay = policy.delay_for_attempt(retry_attempt);
        warn!(
            attempt = attempts,
            max_retries = policy.max_retries,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Request failed, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries, 0.001, Duration::from_millis(5))
    }

    #[test]
    fn test_delay_doubles() {
        let policy = RetryPolicy::new(3, 1.0, Duration::from_secs(30));
        assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(4));
    }

    #[test]
    fn test_delay_is_capped() {
        let policy = RetryPolicy::new(3, 1.0, Duration::from_secs(30));
        assert_eq!(policy.delay_for_attempt(10), Duration::from_secs(30));
        assert_eq!(policy.delay_for_attempt(u32::MAX), Duration::from_secs(30));
    }

    #[test]
    fn test_zero_backoff() {
        let policy = RetryPolicy::new(3, 0.0, Duration::from_secs(30));
        assert_eq!(policy.delay_for_attempt(2), Duration::ZERO);
    }

    #[test]
    fn test_policy_from_config() {
        let policy = RetryPolicy::from_config(&CaminoConfig::new("k"));
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.max_delay, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let outcome = with_retry(&fast_policy(3), || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(CaminoError::api(500, "boom", None))
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.into_result().unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_returns_immediately() {
        let outcome: RetryResult<(), _> =
            with_retry(&fast_policy(3), || async { Err(CaminoError::api(400, "bad", None)) })
                .await;
        assert_eq!(outcome.attempts, 1);
        assert!(outcome.result.is_err());
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let outcome: RetryResult<(), _> =
            with_retry(&fast_policy(2), || async { Err(CaminoError::api(503, "down", None)) })
                .await;
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.result.unwrap_err().status_code(), Some(503));
    }

    #[tokio::test]
    async fn test_no_retry_policy() {
        let outcome: RetryResult<(), _> =
            with_retry(&RetryPolicy::none(), || async { Err(CaminoError::api(500, "x", None)) })
                .await;
        assert_eq!(outcome.attempts, 1);
    }
}
