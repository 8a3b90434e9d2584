//! Orchestrator errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

use pcompletion::CompletionError;
use pfunctions::FunctionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    InvalidInput,
    InvalidRole,
    InvalidContent,
    FunctionExecution,
    TooManyFunctionCalls,
    Processing,
}

impl ChatErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::InvalidRole => "invalid_role",
            Self::InvalidContent => "invalid_content",
            Self::FunctionExecution => "function_execution_error",
            Self::TooManyFunctionCalls => "too_many_function_calls",
            Self::Processing => "processing_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidInput, message)
    }

    pub fn invalid_role(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidRole, message)
    }

    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidContent, message)
    }

    pub fn function_execution(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::FunctionExecution, message)
    }

    pub fn too_many_function_calls(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::TooManyFunctionCalls, message)
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Processing, message)
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ChatError {}

impl From<CompletionError> for ChatError {
    fn from(value: CompletionError) -> Self {
        ChatError::processing(value.to_string())
    }
}

impl From<FunctionError> for ChatError {
    fn from(value: FunctionError) -> Self {
        ChatError::function_execution(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_errors_convert_to_processing() {
        let error: ChatError = CompletionError::auth("bad key").into();
        assert_eq!(error.kind, ChatErrorKind::Processing);
        assert!(error.message.contains("bad key"));
    }

    #[test]
    fn function_errors_convert_to_function_execution() {
        let error: ChatError = FunctionError::timeout("too slow").into();
        assert_eq!(error.kind, ChatErrorKind::FunctionExecution);
    }

    #[test]
    fn kinds_render_stable_wire_names() {
        assert_eq!(ChatErrorKind::InvalidInput.as_str(), "invalid_input");
        assert_eq!(
            ChatErrorKind::TooManyFunctionCalls.as_str(),
            "too_many_function_calls"
        );
    }
}
