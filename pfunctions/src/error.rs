//! Function-layer errors and classifications.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionErrorKind {
    Schema,
    Handler,
    NotFound,
    Validation,
    Timeout,
    Execution,
    Unexpected,
}

impl FunctionErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Schema => "schema_error",
            Self::Handler => "handler_error",
            Self::NotFound => "not_found",
            Self::Validation => "validation_error",
            Self::Timeout => "timeout_error",
            Self::Execution => "execution_error",
            Self::Unexpected => "unexpected_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionError {
    pub kind: FunctionErrorKind,
    pub message: String,
    pub function_name: Option<String>,
}

impl FunctionError {
    pub fn new(kind: FunctionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            function_name: None,
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::new(FunctionErrorKind::Schema, message)
    }

    pub fn handler(message: impl Into<String>) -> Self {
        Self::new(FunctionErrorKind::Handler, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FunctionErrorKind::NotFound, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(FunctionErrorKind::Validation, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FunctionErrorKind::Timeout, message)
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(FunctionErrorKind::Execution, message)
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(FunctionErrorKind::Unexpected, message)
    }

    pub fn with_function_name(mut self, function_name: impl Into<String>) -> Self {
        self.function_name = Some(function_name.into());
        self
    }

    pub fn is_caller_error(&self) -> bool {
        matches!(
            self.kind,
            FunctionErrorKind::NotFound | FunctionErrorKind::Validation
        )
    }
}

impl Display for FunctionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.function_name {
            Some(function_name) => write!(
                f,
                "{:?} [function={}]: {}",
                self.kind, function_name, self.message
            ),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for FunctionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_methods_classify_caller_errors() {
        let missing = FunctionError::not_found("no such function");
        assert!(missing.is_caller_error());

        let timeout = FunctionError::timeout("slow");
        assert!(!timeout.is_caller_error());
    }

    #[test]
    fn function_name_is_included_in_display() {
        let error = FunctionError::validation("missing required field").with_function_name("lookup");

        let rendered = error.to_string();
        assert!(rendered.contains("lookup"));
        assert!(rendered.contains("missing required field"));
    }

    #[test]
    fn kinds_render_stable_wire_names() {
        assert_eq!(FunctionErrorKind::Validation.as_str(), "validation_error");
        assert_eq!(FunctionErrorKind::Timeout.as_str(), "timeout_error");
        assert_eq!(FunctionErrorKind::Unexpected.as_str(), "unexpected_error");
    }
}
