//! Bounded retry with exponential backoff.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::CatalogError;

/// How often and how patiently a catalog request is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (total attempts = `max_retries + 1`).
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Growth factor applied per retry.
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    #[must_use]
    pub const fn no_retries() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            multiplier: 1,
        }
    }

    /// Total number of attempts including the first one.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retry number `retry` (1-based).
    ///
    /// `min(initial * multiplier^(retry - 1), max)`.
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1);
        let factor = self.multiplier.saturating_pow(exponent);
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

/// Run `attempt_fn` until it succeeds, fails permanently, or the policy is
/// exhausted.
///
/// `attempt_fn` receives the 1-based attempt number. Permanent errors (see
/// [`CatalogError::is_retryable`]) are returned immediately without spending
/// retry budget.
///
/// # Errors
///
/// Returns the last error when every attempt failed, or the first permanent
/// error.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut attempt_fn: F,
) -> Result<T, CatalogError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, CatalogError>>,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;

        match attempt_fn(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(operation, attempt, "catalog request succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) if !error.is_retryable() => {
                if error.is_blocked() {
                    tracing::error!(operation, error = %error, "catalog API is blocking requests");
                }
                return Err(error);
            }
            Err(error) if attempt >= max_attempts => {
                warn!(
                    operation,
                    attempts = attempt,
                    error = %error,
                    "catalog request failed, retries exhausted"
                );
                return Err(error);
            }
            Err(error) => {
                let delay = policy.delay_for(attempt);
                warn!(
                    operation,
                    attempt,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %error,
                    "catalog request failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            multiplier: 2,
        }
    }

    fn unavailable() -> CatalogError {
        CatalogError::Status {
            status: 503,
            message: "Service Unavailable".to_string(),
        }
    }

    #[test]
    fn test_default_policy_matches_hardened_client() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 6);
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3), Duration::from_secs(8));
        assert_eq!(policy.delay_for(4), Duration::from_secs(10));
        assert_eq!(policy.delay_for(5), Duration::from_secs(10));
    }

    #[test]
    fn test_delay_saturates_instead_of_overflowing() {
        let policy = RetryPolicy {
            max_retries: 100,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay_for(90), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_succeeds_after_three_transient_failures() {
        let calls = AtomicU32::new(0);

        let result = with_retry(&fast_policy(5), "products", |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt <= 3 {
                    Err(unavailable())
                } else {
                    Ok(vec![1, 2, 3])
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), vec![1, 2, 3]);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_blocked_is_not_retried() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = with_retry(&fast_policy(5), "products", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(CatalogError::Blocked("/products".to_string())) }
        })
        .await;

        assert!(result.unwrap_err().is_blocked());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = with_retry(&fast_policy(3), "products", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(unavailable()) }
        })
        .await;

        assert!(matches!(
            result,
            Err(CatalogError::Status { status: 503, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_no_retries_policy_makes_single_attempt() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = with_retry(&RetryPolicy::no_retries(), "products", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(unavailable()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
