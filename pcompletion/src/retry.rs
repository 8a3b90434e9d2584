//! Retry policy with exponential backoff and jitter, plus operation hooks.

use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::CompletionError;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Additional attempts after the first; attempt numbering starts at 0.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            max_jitter: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    pub fn should_retry(&self, attempt: u32, error: &CompletionError) -> bool {
        error.retryable && attempt < self.max_retries
    }

    /// Delay before retrying after failed attempt `attempt`:
    /// `2^attempt * base` plus a jitter sample in `[0, max_jitter)`.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(16);
        let scaled = self.base_delay.saturating_mul(1u32 << exponent);
        scaled + jitter_sample(self.max_jitter)
    }
}

fn jitter_sample(max_jitter: Duration) -> Duration {
    let max_ms = max_jitter.as_millis() as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .subsec_nanos() as u64;

    Duration::from_millis(nanos % max_ms)
}

pub trait CompletionHooks: Send + Sync {
    fn on_attempt_start(&self, _operation: &str, _attempt: u32) {}

    fn on_retry_scheduled(
        &self,
        _operation: &str,
        _attempt: u32,
        _delay: Duration,
        _error: &CompletionError,
    ) {
    }

    fn on_success(&self, _operation: &str, _attempts: u32) {}

    fn on_failure(&self, _operation: &str, _attempts: u32, _error: &CompletionError) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCompletionHooks;

impl CompletionHooks for NoopCompletionHooks {}

/// Drives one logical operation through the retry policy. The sleep is
/// injected so tests can record scheduled delays instead of waiting them out.
pub async fn execute_with_retry<T, Op, OpFuture, Sleep, SleepFuture>(
    operation: &str,
    policy: &RetryPolicy,
    hooks: &dyn CompletionHooks,
    mut execute: Op,
    mut sleep: Sleep,
) -> Result<T, CompletionError>
where
    Op: FnMut(u32) -> OpFuture,
    OpFuture: Future<Output = Result<T, CompletionError>>,
    Sleep: FnMut(Duration) -> SleepFuture,
    SleepFuture: Future<Output = ()>,
{
    let mut attempt = 0;

    loop {
        hooks.on_attempt_start(operation, attempt);

        match execute(attempt).await {
            Ok(value) => {
                hooks.on_success(operation, attempt + 1);
                return Ok(value);
            }
            Err(error) => {
                if policy.should_retry(attempt, &error) {
                    let delay = policy.backoff_for_attempt(attempt);
                    hooks.on_retry_scheduled(operation, attempt, delay, &error);
                    sleep(delay).await;
                    attempt += 1;
                    continue;
                }

                hooks.on_failure(operation, attempt + 1, &error);
                return Err(error);
            }
        }
    }
}
