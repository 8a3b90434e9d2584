//! Tracing-based observability hooks for completion and function phases.
//!
//! ```rust
//! use pcompletion::CompletionHooks;
//! use pobserve::TracingObservabilityHooks;
//!
//! fn accepts_completion_hooks(_hooks: &dyn CompletionHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_completion_hooks(&hooks);
//! ```

use std::time::Duration;

use pcompletion::{CompletionError, CompletionHooks};
use pfunctions::{ExecutionResult, FunctionRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl CompletionHooks for TracingObservabilityHooks {
    fn on_attempt_start(&self, operation: &str, attempt: u32) {
        tracing::info!(
            phase = "completion",
            event = "attempt_start",
            operation,
            attempt
        );
    }

    fn on_retry_scheduled(
        &self,
        operation: &str,
        attempt: u32,
        delay: Duration,
        error: &CompletionError,
    ) {
        tracing::warn!(
            phase = "completion",
            event = "retry_scheduled",
            operation,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }

    fn on_success(&self, operation: &str, attempts: u32) {
        tracing::info!(
            phase = "completion",
            event = "success",
            operation,
            attempts
        );
    }

    fn on_failure(&self, operation: &str, attempts: u32, error: &CompletionError) {
        tracing::error!(
            phase = "completion",
            event = "failure",
            operation,
            attempts,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }
}

impl FunctionRuntimeHooks for TracingObservabilityHooks {
    fn on_execution_start(&self, function_name: &str) {
        tracing::info!(
            phase = "function",
            event = "execution_start",
            function_name
        );
    }

    fn on_execution_success(
        &self,
        function_name: &str,
        _result: &ExecutionResult,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "function",
            event = "execution_success",
            function_name,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_execution_failure(
        &self,
        function_name: &str,
        result: &ExecutionResult,
        elapsed: Duration,
    ) {
        tracing::warn!(
            phase = "function",
            event = "execution_failure",
            function_name,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?result.failure_kind()
        );
    }
}
