//! Exponential backoff for transient failures.
//!
//! The pipeline favors eventual progress over giving up: retries are
//! unbounded in count and bounded only in per-attempt delay. Every retry
//! logs the operation name and attempt number so an infinite retry streak
//! is visible to an operator.

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use crate::errors::PipelineError;

/// Backoff parameters shared by every retried operation.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Delay before the first retry.
    pub initial_interval: Duration,
    /// Multiplier applied to the delay for every further attempt.
    pub backoff_factor: u32,
    /// Upper bound on the delay between attempts.
    pub maximum_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            backoff_factor: 2,
            maximum_interval: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Determine the delay before the given retry attempt (1-based).
    pub fn retry_interval(&self, attempt: u32) -> Duration {
        let candidate = self
            .initial_interval
            .saturating_mul(self.backoff_factor.saturating_pow(attempt.saturating_sub(1)));
        std::cmp::min(candidate, self.maximum_interval)
    }
}

/// Run `f`, retrying indefinitely while it fails with a transient error.
///
/// Non-transient errors propagate immediately. On success after a streak of
/// retries, the streak length is logged once at info level.
pub async fn retry_transient<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut f: F,
) -> Result<T, PipelineError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PipelineError>>,
{
    let mut attempt: u32 = 0;

    loop {
        match f().await {
            Ok(value) => {
                if attempt > 0 {
                    info!(operation, retries = attempt, "Operation recovered after retries");
                }
                return Ok(value);
            }
            Err(e) if e.is_transient() => {
                attempt += 1;
                let delay = policy.retry_interval(attempt);
                warn!(
                    operation,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Transient failure, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
