//! Sandboxed function execution: lookup, validation, and a timeout race.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_timer::Delay;
use futures_util::future::{Either, select};
use futures_util::pin_mut;
use serde_json::{Map, Value};

use crate::{
    ExecutionOptions, ExecutionResult, FunctionError, FunctionRegistry, FunctionRuntimeHooks,
    NoopFunctionRuntimeHooks, sanitize_value, validate_arguments,
};

pub const DEFAULT_EXECUTION_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Clone)]
pub struct FunctionRuntime {
    registry: Arc<FunctionRegistry>,
    hooks: Arc<dyn FunctionRuntimeHooks>,
    default_timeout: Duration,
}

impl FunctionRuntime {
    pub fn new(registry: Arc<FunctionRegistry>) -> Self {
        Self {
            registry,
            hooks: Arc::new(NoopFunctionRuntimeHooks),
            default_timeout: DEFAULT_EXECUTION_TIMEOUT,
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn FunctionRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_default_timeout(mut self, default_timeout: Duration) -> Self {
        self.default_timeout = default_timeout;
        self
    }

    pub fn registry(&self) -> Arc<FunctionRegistry> {
        Arc::clone(&self.registry)
    }

    /// Resolves through three gates in order: existence, argument validation,
    /// then the handler raced against the timeout budget. All outcomes are
    /// reported through `ExecutionResult`; nothing escapes as a raw error.
    pub async fn execute(&self, name: &str, args: Map<String, Value>) -> ExecutionResult {
        self.execute_with_timeout(name, args, self.default_timeout)
            .await
    }

    /// `execute` with a caller-controlled timeout and transport sanitization.
    /// Always returns; internal inconsistencies degrade to an unexpected-error
    /// result instead of propagating.
    pub async fn execute_safely(
        &self,
        name: &str,
        args: Map<String, Value>,
        options: ExecutionOptions,
    ) -> ExecutionResult {
        let timeout = options.timeout.unwrap_or(self.default_timeout);
        let mut outcome = self.execute_with_timeout(name, args, timeout).await;

        if options.sanitize
            && let Some(result) = outcome.result.take()
        {
            outcome.result = Some(sanitize_value(&result));
        }

        outcome
    }

    async fn execute_with_timeout(
        &self,
        name: &str,
        args: Map<String, Value>,
        timeout: Duration,
    ) -> ExecutionResult {
        self.hooks.on_execution_start(name);
        let started = Instant::now();

        let Some(record) = self.registry.record(name) else {
            let error =
                FunctionError::not_found(format!("function '{name}' is not registered"))
                    .with_function_name(name);
            return self.report_failure(name, &error, started.elapsed(), timeout);
        };

        // Validation runs before the race so a malformed call never consumes
        // execution-timeout budget.
        if let Err(error) = validate_arguments(&record.schema.parameters, &args) {
            let error = error.with_function_name(name);
            return self.report_failure(name, &error, started.elapsed(), timeout);
        }

        let handler = Arc::clone(&record.handler);
        let invocation = handler(args);
        let deadline = Delay::new(timeout);
        pin_mut!(deadline);

        match select(invocation, deadline).await {
            Either::Left((Ok(value), _)) => {
                let result = ExecutionResult::succeeded(value, started.elapsed(), timeout);
                self.hooks
                    .on_execution_success(name, &result, result.execution_time);
                result
            }
            Either::Left((Err(error), _)) => {
                let error = error.with_function_name(name);
                self.report_failure(name, &error, started.elapsed(), timeout)
            }
            Either::Right((_, invocation)) => {
                // Losing the race drops the handler future; its settlement can
                // never reach this result or any registry state.
                drop(invocation);
                let error = FunctionError::timeout(format!(
                    "function '{name}' did not complete within {} ms",
                    timeout.as_millis()
                ))
                .with_function_name(name);
                self.report_failure(name, &error, started.elapsed(), timeout)
            }
        }
    }

    fn report_failure(
        &self,
        name: &str,
        error: &FunctionError,
        elapsed: Duration,
        timeout: Duration,
    ) -> ExecutionResult {
        let result = ExecutionResult::failed(error, elapsed, timeout);
        self.hooks.on_execution_failure(name, &result, elapsed);
        result
    }
}
