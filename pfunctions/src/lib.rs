//! Capability layer for registering, validating, and executing functions.

mod args;
mod error;
mod hooks;
mod registry;
mod runtime;
mod sanitize;
mod schema;
mod types;
mod validate;

pub mod prelude {
    pub use crate::{
        DEFAULT_EXECUTION_TIMEOUT, ExecutionFailure, ExecutionOptions, ExecutionResult,
        FunctionError, FunctionErrorKind, FunctionFuture, FunctionRegistry, FunctionRuntime,
        FunctionRuntimeHooks, FunctionSchema, NoopFunctionRuntimeHooks, ParameterSchema,
        PropertySchema, PropertyType,
    };
}

pub use args::{parse_arguments, required_string};
pub use error::{FunctionError, FunctionErrorKind};
pub use hooks::{FunctionRuntimeHooks, NoopFunctionRuntimeHooks};
pub use registry::{FunctionFuture, FunctionRegistry};
pub use runtime::{DEFAULT_EXECUTION_TIMEOUT, FunctionRuntime};
pub use sanitize::{
    DEPTH_PLACEHOLDER, UNSERIALIZABLE_PLACEHOLDER, sanitize_failure, sanitize_serializable,
    sanitize_value,
};
pub use schema::{FunctionSchema, ParameterSchema, PropertySchema, PropertyType};
pub use types::{ExecutionFailure, ExecutionOptions, ExecutionResult};
pub use validate::validate_arguments;
