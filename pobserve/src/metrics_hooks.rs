//! Metrics-based observability hooks for completion and function phases.
//!
//! ```rust
//! use pfunctions::FunctionRuntimeHooks;
//! use pobserve::MetricsObservabilityHooks;
//!
//! fn accepts_function_hooks(_hooks: &dyn FunctionRuntimeHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_function_hooks(&hooks);
//! ```

use std::time::Duration;

use pcompletion::{CompletionError, CompletionHooks};
use pfunctions::{ExecutionResult, FunctionRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl CompletionHooks for MetricsObservabilityHooks {
    fn on_attempt_start(&self, operation: &str, _attempt: u32) {
        metrics::counter!(
            "parley_completion_attempt_start_total",
            "operation" => operation.to_string()
        )
        .increment(1);
    }

    fn on_retry_scheduled(
        &self,
        operation: &str,
        _attempt: u32,
        delay: Duration,
        error: &CompletionError,
    ) {
        metrics::counter!(
            "parley_completion_retry_scheduled_total",
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "parley_completion_retry_delay_seconds",
            "operation" => operation.to_string()
        )
        .record(delay.as_secs_f64());
    }

    fn on_success(&self, operation: &str, attempts: u32) {
        metrics::counter!(
            "parley_completion_success_total",
            "operation" => operation.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "parley_completion_attempts_per_success",
            "operation" => operation.to_string()
        )
        .record(attempts as f64);
    }

    fn on_failure(&self, operation: &str, attempts: u32, error: &CompletionError) {
        metrics::counter!(
            "parley_completion_failure_total",
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "parley_completion_attempts_per_failure",
            "operation" => operation.to_string()
        )
        .record(attempts as f64);
    }
}

impl FunctionRuntimeHooks for MetricsObservabilityHooks {
    fn on_execution_start(&self, function_name: &str) {
        metrics::counter!(
            "parley_function_execution_start_total",
            "function_name" => function_name.to_string()
        )
        .increment(1);
    }

    fn on_execution_success(
        &self,
        function_name: &str,
        _result: &ExecutionResult,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "parley_function_execution_success_total",
            "function_name" => function_name.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "parley_function_execution_duration_seconds",
            "function_name" => function_name.to_string(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_execution_failure(
        &self,
        function_name: &str,
        result: &ExecutionResult,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "parley_function_execution_failure_total",
            "function_name" => function_name.to_string(),
            "error_kind" => format!("{:?}", result.failure_kind())
        )
        .increment(1);
        metrics::histogram!(
            "parley_function_execution_duration_seconds",
            "function_name" => function_name.to_string(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}
