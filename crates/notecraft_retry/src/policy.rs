//! Backoff policy and the retrying executor.

use notecraft_error::{
    NotecraftError, NotecraftErrorKind, NotecraftResult, ProviderError, ProviderErrorKind,
    RetryableError,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_retry2::{
    Retry, RetryError,
    strategy::{ExponentialFactorBackoff, jitter},
};
use tracing::{debug, warn};

/// Backoff bounds as they appear in configuration files.
///
/// ```toml
/// [retry]
/// min_delay_ms = 4000
/// max_delay_ms = 10000
/// jitter = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Wait before the first retry, in milliseconds
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    /// Upper bound on any single wait, in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Randomize each wait
    #[serde(default)]
    pub jitter: bool,
}

fn default_min_delay_ms() -> u64 {
    4000
}

fn default_max_delay_ms() -> u64 {
    10_000
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter: false,
        }
    }
}

/// Exponential backoff with an attempt cap.
///
/// The wait before retry `n` (zero-based) is `min_delay * 2^n`, capped at
/// `max_delay`. With jitter enabled each wait is scaled by a random factor
/// in `[0.5, 1.5)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: usize,
    min_delay: Duration,
    max_delay: Duration,
    jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(4), Duration::from_secs(10))
    }
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` counts the first try; zero is treated as one.
    pub fn new(max_attempts: usize, min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            min_delay,
            max_delay: max_delay.max(min_delay),
            jitter: false,
        }
    }

    /// Builds a policy from configured bounds and a per-provider attempt cap.
    pub fn from_settings(settings: &RetrySettings, max_attempts: usize) -> Self {
        Self::new(
            max_attempts,
            Duration::from_millis(settings.min_delay_ms),
            Duration::from_millis(settings.max_delay_ms),
        )
        .with_jitter(settings.jitter)
    }

    /// Enables or disables jitter.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Total attempts, including the first.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Waits between attempts, before jitter.
    pub fn delays(&self) -> Vec<Duration> {
        self.backoff().collect()
    }

    /// Unjittered schedule, one wait per retry.
    fn backoff(&self) -> impl Iterator<Item = Duration> {
        ExponentialFactorBackoff::from_millis(millis(self.min_delay), 2.0)
            .max_delay(self.max_delay)
            .take(self.max_attempts - 1)
    }

    /// Schedule handed to [`Retry::spawn`].
    fn strategy(&self) -> impl Iterator<Item = Duration> {
        let jittered = self.jitter;
        self.backoff()
            .map(move |d| if jittered { jitter(d) } else { d })
    }

    /// Runs `operation`, retrying transient failures.
    ///
    /// `label` names the operation in log output.
    ///
    /// # Errors
    ///
    /// Returns the operation's own error when it is terminal, or
    /// `RetriesExhausted` when every attempt failed transiently.
    pub async fn execute<F, Fut, R>(&self, label: &str, operation: F) -> NotecraftResult<R>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = NotecraftResult<R>>,
    {
        let strategy = self.strategy();
        let attempts = AtomicUsize::new(0);
        let max_attempts = self.max_attempts;
        let counter = &attempts;
        let operation = &operation;

        let result = Retry::spawn(strategy, move || async move {
            let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
            debug!(operation = label, attempt, max_attempts, "Sending request");

            match operation().await {
                Ok(value) => Ok(value),
                Err(e) => {
                    if e.is_retryable() {
                        warn!(operation = label, attempt, "Transient error, will retry: {}", e);
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    } else {
                        warn!(operation = label, attempt, "Permanent error, failing immediately: {}", e);
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        })
        .await;

        result.map_err(|e| {
            if e.is_retryable() {
                let attempts = attempts.load(Ordering::SeqCst);
                warn!(operation = label, attempts, "Retries exhausted");
                exhausted(attempts, e)
            } else {
                e
            }
        })
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn exhausted(attempts: usize, last: NotecraftError) -> NotecraftError {
    let last = match last.kind() {
        NotecraftErrorKind::Provider(p) => p.kind.to_string(),
        other => other.to_string(),
    };
    ProviderError::new(ProviderErrorKind::RetriesExhausted { attempts, last }).into()
}
