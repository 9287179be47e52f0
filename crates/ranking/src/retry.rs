//! Retry with exponential backoff for ranking calls.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::warn;

use crate::RankingError;

/// Configuration for retry behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first try.
    pub max_retries: u32,
    /// Base for the exponential backoff, in milliseconds.
    #[serde(with = "crate::serde_millis")]
    pub base_delay: Duration,
    /// Upper bound on a single backoff, in milliseconds.
    #[serde(with = "crate::serde_millis")]
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Spread each delay by up to 25% in either direction.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn validate(&self) -> Result<(), RankingError> {
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(RankingError::InvalidConfig(
                "retry.backoff_multiplier must be a finite value >= 1.0".into(),
            ));
        }
        if self.base_delay > self.max_delay {
            return Err(RankingError::InvalidConfig(
                "retry.base_delay must not exceed retry.max_delay".into(),
            ));
        }
        Ok(())
    }

    /// Delay before retry `attempt` (1-indexed; attempt 0 is the first try).
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        // base_delay * multiplier^(attempt-1), capped
        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let exponential = self.base_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        let delay_ms = exponential.min(self.max_delay.as_millis() as f64) as u64;

        if self.jitter {
            let jitter_range = delay_ms / 4;
            if jitter_range > 0 {
                let jitter = fastrand::u64(0..jitter_range * 2);
                return Duration::from_millis(delay_ms - jitter_range + jitter);
            }
        }

        Duration::from_millis(delay_ms)
    }
}

/// Outcome of a retried operation.
#[derive(Debug, Clone)]
pub struct RetryResult<T> {
    pub result: Result<T, RankingError>,
    /// Number of attempts made (1 = first try succeeded).
    pub attempts: u32,
    pub total_duration: Duration,
}

impl<T> RetryResult<T> {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }

    pub fn into_result(self) -> Result<T, RankingError> {
        self.result
    }
}

/// Runs `operation` until it succeeds, fails with a non-retryable error, or
/// the retry budget is spent.
///
/// ```
/// use ranking::{execute_with_retry, RankingError, RetryConfig};
/// use std::time::Duration;
///
/// # async fn example() {
/// let config = RetryConfig::default()
///     .with_max_retries(3)
///     .with_base_delay(Duration::from_millis(10));
///
/// let outcome = execute_with_retry(&config, |attempt| async move {
///     if attempt == 0 {
///         Err(RankingError::Http("connection reset".into()))
///     } else {
///         Ok("[1, 2]")
///     }
/// })
/// .await;
///
/// assert!(outcome.succeeded());
/// assert_eq!(outcome.attempts, 2);
/// # }
/// ```
pub async fn execute_with_retry<T, F, Fut>(config: &RetryConfig, mut operation: F) -> RetryResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, RankingError>>,
{
    let start = Instant::now();
    let mut attempt = 0u32;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                return RetryResult {
                    result: Ok(value),
                    attempts: attempt + 1,
                    total_duration: start.elapsed(),
                };
            }
            Err(err) => {
                if !err.is_retryable() || attempt >= config.max_retries {
                    return RetryResult {
                        result: Err(err),
                        attempts: attempt + 1,
                        total_duration: start.elapsed(),
                    };
                }
                attempt += 1;
                let delay = config.calculate_delay(attempt);
                warn!(
                    attempt,
                    delay_millis = delay.as_millis() as u64,
                    error = %err,
                    "ranking_retry"
                );
                if !delay.is_zero() {
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig::default()
            .with_base_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(2))
            .with_jitter(false)
    }

    #[test]
    fn no_delay_before_first_attempt() {
        assert_eq!(RetryConfig::default().calculate_delay(0), Duration::ZERO);
    }

    #[test]
    fn delay_grows_exponentially_until_capped() {
        let config = RetryConfig::default()
            .with_base_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(350))
            .with_jitter(false);

        assert_eq!(config.calculate_delay(1), Duration::from_millis(100));
        assert_eq!(config.calculate_delay(2), Duration::from_millis(200));
        assert_eq!(config.calculate_delay(3), Duration::from_millis(350));
    }

    #[test]
    fn jitter_stays_within_a_quarter() {
        let config = RetryConfig::default()
            .with_base_delay(Duration::from_millis(400))
            .with_max_delay(Duration::from_secs(1));
        for _ in 0..50 {
            let delay = config.calculate_delay(1).as_millis();
            assert!((300..500).contains(&delay), "delay was {delay}");
        }
    }

    #[test]
    fn validate_rejects_shrinking_backoff() {
        let err = RetryConfig::default()
            .with_backoff_multiplier(0.5)
            .validate()
            .expect_err("multiplier below one");
        match err {
            RankingError::InvalidConfig(msg) => assert!(msg.contains("backoff_multiplier")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn retries_transient_errors_then_succeeds() {
        let calls = AtomicU32::new(0);
        let outcome = execute_with_retry(&fast().with_max_retries(3), |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(RankingError::Status {
                        status: 503,
                        body: String::new(),
                    })
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert!(outcome.succeeded());
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.into_result().expect("success"), 2);
    }

    #[tokio::test]
    async fn stops_at_first_non_retryable_error() {
        let calls = AtomicU32::new(0);
        let outcome: RetryResult<()> = execute_with_retry(&fast().with_max_retries(5), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(RankingError::Status { status: 401, body: "no".into() }) }
        })
        .await;

        assert!(!outcome.succeeded());
        assert_eq!(outcome.attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_budget() {
        let outcome: RetryResult<()> = execute_with_retry(&fast().with_max_retries(2), |_| async {
            Err(RankingError::Http("refused".into()))
        })
        .await;

        assert_eq!(outcome.attempts, 3);
        assert_eq!(
            outcome.into_result().expect_err("exhausted"),
            RankingError::Http("refused".into())
        );
    }
}
