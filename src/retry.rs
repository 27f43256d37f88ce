//! Bounded exponential backoff for transient failures
//!
//! Transient network and server failures are retried with a doubling
//! delay. Client errors (4xx) are not transient and are surfaced
//! immediately; rate limits are surfaced too, so the countdown gate can
//! handle them instead of burning retry attempts against an advisory
//! wait.

use crate::constants::{INITIAL_BACKOFF_MS, MAX_BACKOFF_MS, MAX_RETRY_ATTEMPTS};
use crate::error::ApiError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Retry policy with bounded exponential backoff
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRY_ATTEMPTS,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
            max_backoff: Duration::from_millis(MAX_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with explicit bounds
    pub fn new(max_attempts: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff,
            max_backoff,
        }
    }

    /// Delay before the retry following attempt number `attempt` (0-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Whether a failure is worth retrying
    pub fn should_retry(&self, error: &ApiError) -> bool {
        !error.is_rate_limit() && !error.is_client_error()
    }

    /// Runs `op` until it succeeds, fails terminally, or attempts run out
    pub async fn run<T, F, Fut>(&self, operation: &str, op: F) -> Result<T, ApiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if !self.should_retry(&error) || attempt + 1 >= self.max_attempts {
                        return Err(error);
                    }

                    let delay = self.backoff_for(attempt);
                    tracing::warn!(
                        operation,
                        attempt = attempt + 1,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Request failed, retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
