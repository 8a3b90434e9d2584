use std::time::Duration;

use pcompletion::{CompletionError, CompletionHooks};
use pfunctions::{ExecutionResult, FunctionError, FunctionRuntimeHooks};
use serde_json::json;

use crate::{MetricsObservabilityHooks, TracingObservabilityHooks};

fn sample_success() -> ExecutionResult {
    ExecutionResult::succeeded(
        json!({"ok": true}),
        Duration::from_millis(3),
        Duration::from_millis(5000),
    )
}

fn sample_failure() -> ExecutionResult {
    ExecutionResult::failed(
        &FunctionError::timeout("too slow"),
        Duration::from_millis(5000),
        Duration::from_millis(5000),
    )
}

#[test]
fn tracing_hooks_smoke_test_all_callbacks() {
    let hooks = TracingObservabilityHooks;
    let completion_error = CompletionError::rate_limit("busy");

    hooks.on_attempt_start("complete", 0);
    hooks.on_retry_scheduled("complete", 0, Duration::from_millis(10), &completion_error);
    hooks.on_success("complete", 2);
    hooks.on_failure("complete", 2, &completion_error);

    hooks.on_execution_start("get_weather");
    hooks.on_execution_success("get_weather", &sample_success(), Duration::from_millis(20));
    hooks.on_execution_failure("get_weather", &sample_failure(), Duration::from_millis(20));
}

#[test]
fn metrics_hooks_smoke_test_all_callbacks() {
    let hooks = MetricsObservabilityHooks;
    let completion_error = CompletionError::server("boom");

    hooks.on_attempt_start("complete", 0);
    hooks.on_retry_scheduled("complete", 0, Duration::from_millis(10), &completion_error);
    hooks.on_success("complete", 1);
    hooks.on_failure("complete", 4, &completion_error);

    hooks.on_execution_start("get_weather");
    hooks.on_execution_success("get_weather", &sample_success(), Duration::from_millis(20));
    hooks.on_execution_failure("get_weather", &sample_failure(), Duration::from_millis(20));
}
