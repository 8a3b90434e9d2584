//! Conversion of arbitrary handler output into guaranteed transport-safe JSON.
//!
//! ```rust
//! use pfunctions::sanitize_serializable;
//! use serde_json::json;
//!
//! let clean = sanitize_serializable(&json!({"ok": true}));
//! assert_eq!(clean, json!({"ok": true}));
//! ```

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::FunctionError;

/// Nesting bound for sanitized values. `serde_json::Value` cannot be cyclic,
/// but handler output may still be arbitrarily deep.
const MAX_DEPTH: usize = 64;

pub const UNSERIALIZABLE_PLACEHOLDER: &str = "[unserializable]";
pub const DEPTH_PLACEHOLDER: &str = "[max depth exceeded]";

/// Best-effort serialization of any `Serialize` value. Values that refuse to
/// serialize degrade to a placeholder string instead of propagating an error.
pub fn sanitize_serializable<T: Serialize>(value: &T) -> Value {
    match serde_json::to_value(value) {
        Ok(serialized) => sanitize_value(&serialized),
        Err(_) => Value::String(UNSERIALIZABLE_PLACEHOLDER.to_string()),
    }
}

/// Depth-limited normalization of an already-JSON value. Within the depth
/// bound this is the identity; beyond it, subtrees collapse to a placeholder.
pub fn sanitize_value(value: &Value) -> Value {
    sanitize_at_depth(value, 0)
}

fn sanitize_at_depth(value: &Value, depth: usize) -> Value {
    if depth >= MAX_DEPTH {
        return Value::String(DEPTH_PLACEHOLDER.to_string());
    }

    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| sanitize_at_depth(item, depth + 1))
                .collect(),
        ),
        Value::Object(entries) => {
            let mut sanitized = Map::with_capacity(entries.len());
            for (key, entry) in entries {
                sanitized.insert(key.clone(), sanitize_at_depth(entry, depth + 1));
            }
            Value::Object(sanitized)
        }
        scalar => scalar.clone(),
    }
}

/// Error-shaped values travel as a plain `{message, name}` object.
pub fn sanitize_failure(error: &FunctionError) -> Value {
    json!({
        "message": error.message,
        "name": error.kind.as_str(),
    })
}
