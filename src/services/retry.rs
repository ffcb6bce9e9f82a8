//! Exponential backoff for per-page fetches.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{AppError, Result};
use crate::models::RetryConfig;

/// Attempt ceiling plus a doubling delay between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after `failed_attempts` consecutive failures (1-based).
    pub fn delay_for(&self, failed_attempts: u32) -> Duration {
        let exponent = failed_attempts.saturating_sub(1).min(31);
        self.initial_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt ceiling is reached. `op` receives the 1-based attempt number.
    ///
    /// Exhaustion is reported as [`AppError::PageFailed`] wrapping the last error.
    pub async fn run<T, F, Fut>(
        &self,
        page: u32,
        cancel: &CancellationToken,
        mut op: F,
    ) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            let error = match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !error.is_retryable() {
                return Err(error);
            }
            if attempt >= self.max_attempts {
                log::error!("Page {} giving up after {} attempt(s): {}", page, attempt, error);
                return Err(AppError::PageFailed {
                    page,
                    attempts: attempt,
                    source: Box::new(error),
                });
            }

            let delay = self.delay_for(attempt);
            log::warn!(
                "Page {} attempt {}/{} failed: {}. Retrying in {} ms",
                page,
                attempt,
                self.max_attempts,
                error,
                delay.as_millis()
            );

            tokio::select! {
                _ = cancel.cancelled() => return Err(AppError::Aborted),
                _ = tokio::time::sleep(delay) => {}
            }
            attempt += 1;
        }
    }
}
