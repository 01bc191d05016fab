use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::constants::{
    BACKOFF_MULTIPLIER, DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY, DEFAULT_MAX_RETRY_ATTEMPTS,
    MAX_BACKOFF_EXPONENT,
};

/// Exponential backoff policy for transient request failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, the initial try included.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub multiplier: u32,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRY_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            multiplier: BACKOFF_MULTIPLIER,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
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

    /// Delay before retry number `retry_number` (1-based): the base delay
    /// scaled by `multiplier^(retry_number - 1)`, capped at `max_delay`.
    pub fn delay_for(&self, retry_number: u32) -> Duration {
        let exponent = retry_number.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
        let factor = self.multiplier.checked_pow(exponent).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Runs `operation` until it succeeds, fails with a non-retryable error, or
/// the policy's attempts are exhausted, sleeping with exponential backoff in
/// between. `is_retryable` decides which failures are worth another attempt;
/// the final failure is returned to the caller unchanged.
pub async fn retry_with_policy<T, E, Op, Fut, Pred>(
    policy: &RetryPolicy,
    mut operation: Op,
    is_retryable: Pred,
) -> Result<T, E>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    Pred: Fn(&E) -> bool,
    E: Display,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= attempts || !is_retryable(&err) {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                warn!(
                    "Attempt {}/{} failed ({}), retrying in {:?}",
                    attempt, attempts, err, delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
