//! JSON argument parsing helpers shared by the runtime and the orchestrator.
//!
//! ```rust
//! use pfunctions::{parse_arguments, required_string};
//!
//! let args = parse_arguments(r#"{"city":"Oslo"}"#).expect("object should parse");
//! let city = required_string(&args, "city").expect("city should be present");
//! assert_eq!(city, "Oslo");
//! ```

use serde_json::{Map, Value};

use crate::FunctionError;

pub fn parse_arguments(args_json: &str) -> Result<Map<String, Value>, FunctionError> {
    let value: Value = serde_json::from_str(args_json)
        .map_err(|err| FunctionError::validation(format!("invalid JSON arguments: {err}")))?;

    value
        .as_object()
        .cloned()
        .ok_or_else(|| FunctionError::validation("expected a JSON object of arguments"))
}

pub fn required_string(args: &Map<String, Value>, key: &str) -> Result<String, FunctionError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| FunctionError::validation(format!("missing required string: '{key}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_object_and_extract_required_string() {
        let args = parse_arguments("{\"city\":\"Oslo\"}").expect("args should parse");
        let city = required_string(&args, "city").expect("city should exist");
        assert_eq!(city, "Oslo");
    }

    #[test]
    fn malformed_json_reports_validation_error() {
        let error = parse_arguments("{").expect_err("json should fail");
        assert_eq!(error.kind, crate::FunctionErrorKind::Validation);
    }

    #[test]
    fn non_object_arguments_are_rejected() {
        let error = parse_arguments("[1,2]").expect_err("array should fail");
        assert!(error.message.contains("object"));
    }
}
