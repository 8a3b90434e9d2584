//! Runtime hooks for function execution lifecycle events.
//!
//! ```rust
//! use pfunctions::{FunctionRuntimeHooks, NoopFunctionRuntimeHooks};
//!
//! fn assert_hooks_trait(_hooks: &dyn FunctionRuntimeHooks) {}
//!
//! let hooks = NoopFunctionRuntimeHooks;
//! assert_hooks_trait(&hooks);
//! ```

use std::time::Duration;

use crate::ExecutionResult;

pub trait FunctionRuntimeHooks: Send + Sync {
    fn on_execution_start(&self, _function_name: &str) {}

    fn on_execution_success(
        &self,
        _function_name: &str,
        _result: &ExecutionResult,
        _elapsed: Duration,
    ) {
    }

    fn on_execution_failure(
        &self,
        _function_name: &str,
        _result: &ExecutionResult,
        _elapsed: Duration,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFunctionRuntimeHooks;

impl FunctionRuntimeHooks for NoopFunctionRuntimeHooks {}
