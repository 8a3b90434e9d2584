//! Execution outcome and option types.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{FunctionError, FunctionErrorKind};

/// Outcome of one function invocation. Carries plain data only; the handler
/// and any pending futures never outlive the call that produced this.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub success: bool,
    pub result: Option<Value>,
    pub error: Option<ExecutionFailure>,
    pub execution_time: Duration,
    pub timeout: Duration,
}

impl ExecutionResult {
    pub fn succeeded(result: Value, execution_time: Duration, timeout: Duration) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
            execution_time,
            timeout,
        }
    }

    pub fn failed(error: &FunctionError, execution_time: Duration, timeout: Duration) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(ExecutionFailure {
                kind: error.kind,
                message: error.message.clone(),
            }),
            execution_time,
            timeout,
        }
    }

    pub fn failure_kind(&self) -> Option<FunctionErrorKind> {
        self.error.as_ref().map(|failure| failure.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionFailure {
    #[serde(with = "kind_name")]
    pub kind: FunctionErrorKind,
    pub message: String,
}

mod kind_name {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::FunctionErrorKind;

    pub fn serialize<S: Serializer>(
        kind: &FunctionErrorKind,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(kind.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<FunctionErrorKind, D::Error> {
        let name = String::deserialize(deserializer)?;
        let kind = match name.as_str() {
            "schema_error" => FunctionErrorKind::Schema,
            "handler_error" => FunctionErrorKind::Handler,
            "not_found" => FunctionErrorKind::NotFound,
            "validation_error" => FunctionErrorKind::Validation,
            "timeout_error" => FunctionErrorKind::Timeout,
            "execution_error" => FunctionErrorKind::Execution,
            _ => FunctionErrorKind::Unexpected,
        };

        Ok(kind)
    }
}

/// Per-call overrides accepted by `execute_safely`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionOptions {
    pub timeout: Option<Duration>,
    pub sanitize: bool,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            sanitize: true,
        }
    }
}

impl ExecutionOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn without_sanitize(mut self) -> Self {
        self.sanitize = false;
        self
    }
}
