//! Retry policy and the retry-with-backoff envelope.

use std::future::Future;
use std::time::Duration;

use i18n_core::RetrySettings;

use crate::error::FetchError;

/// Retry policy configuration.
///
/// Immutable once a fetcher is built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Growth factor per attempt.
    pub backoff_multiplier: f64,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_RETRIES: u32 = 3;
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(10_000);
    pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

    /// Create a policy with default delays.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Create a policy with no retries.
    pub fn none() -> Self {
        Self::new(0)
    }

    /// Merge optional settings over the defaults.
    ///
    /// Non-positive or non-finite multipliers are ignored.
    pub fn from_settings(settings: &RetrySettings) -> Self {
        let defaults = Self::default();
        Self {
            max_retries: settings.max_retries.unwrap_or(defaults.max_retries),
            base_delay: settings
                .base_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.base_delay),
            max_delay: settings
                .max_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.max_delay),
            backoff_multiplier: settings
                .backoff_multiplier
                .filter(|m| m.is_finite() && *m > 0.0)
                .unwrap_or(defaults.backoff_multiplier),
        }
    }

    /// Set the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the maximum delay.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the backoff multiplier.
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Total attempts one logical call may make.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay after a failed attempt (0-indexed): `min(base * multiplier^attempt, max)`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let millis = self.base_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        let cap = self.max_delay.as_millis() as f64;

        if !millis.is_finite() || millis >= cap {
            self.max_delay
        } else {
            Duration::from_millis(millis.round() as u64)
        }
    }

    /// Run `operation` until it succeeds, fails with a final error, or the
    /// retry budget is spent.
    ///
    /// `operation` receives the 0-indexed attempt number.
    pub async fn execute<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, FetchError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut attempt = 0;
        loop {
            let err = match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if attempt >= self.max_retries || !err.is_retryable() {
                return Err(err);
            }

            let delay = self.delay_for_attempt(attempt);
            tracing::debug!(
                operation = label,
                attempt = attempt + 1,
                max_attempts = self.max_attempts(),
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Retrying after failure"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            base_delay: Self::DEFAULT_BASE_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            backoff_multiplier: Self::DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}
