//! Argument validation against a declared parameter schema.
//!
//! Validation runs before any execution budget is consumed: a malformed call
//! never reaches the handler or its timeout race.

use serde_json::{Map, Value};

use crate::{FunctionError, ParameterSchema, PropertySchema, PropertyType};

pub fn validate_arguments(
    schema: &ParameterSchema,
    args: &Map<String, Value>,
) -> Result<(), FunctionError> {
    for required in &schema.required {
        if !args.contains_key(required) {
            return Err(FunctionError::validation(format!(
                "missing required argument '{required}'"
            )));
        }
    }

    if schema.additional_properties == Some(false) {
        for key in args.keys() {
            if !schema.properties.contains_key(key) {
                return Err(FunctionError::validation(format!(
                    "unexpected argument '{key}'"
                )));
            }
        }
    }

    for (name, property) in &schema.properties {
        let Some(value) = args.get(name) else {
            continue;
        };

        validate_property(name, property, value)?;
    }

    Ok(())
}

fn validate_property(
    name: &str,
    property: &PropertySchema,
    value: &Value,
) -> Result<(), FunctionError> {
    if !type_matches(property.property_type, value) {
        return Err(FunctionError::validation(format!(
            "argument '{name}' must be of type {}, got {}",
            property.property_type.as_str(),
            value_type_name(value)
        )));
    }

    if let Some(allowed) = &property.allowed_values
        && !allowed.contains(value)
    {
        return Err(FunctionError::validation(format!(
            "argument '{name}' must be one of the enumerated values"
        )));
    }

    match value {
        Value::String(text) => validate_string(name, property, text)?,
        Value::Number(number) => {
            if let Some(numeric) = number.as_f64() {
                validate_numeric(name, property, numeric)?;
            }
        }
        Value::Array(items) => validate_array(name, property, items)?,
        _ => {}
    }

    Ok(())
}

fn validate_string(name: &str, property: &PropertySchema, text: &str) -> Result<(), FunctionError> {
    let length = text.chars().count();

    if let Some(min_length) = property.min_length
        && length < min_length
    {
        return Err(FunctionError::validation(format!(
            "argument '{name}' must be at least {min_length} characters"
        )));
    }

    if let Some(max_length) = property.max_length
        && length > max_length
    {
        return Err(FunctionError::validation(format!(
            "argument '{name}' must be at most {max_length} characters"
        )));
    }

    if let Some(pattern) = &property.pattern {
        // Patterns are checked for validity at registration time.
        let matcher = regex::Regex::new(pattern).map_err(|err| {
            FunctionError::validation(format!("argument '{name}' has an unusable pattern: {err}"))
        })?;

        if !matcher.is_match(text) {
            return Err(FunctionError::validation(format!(
                "argument '{name}' does not match pattern '{pattern}'"
            )));
        }
    }

    Ok(())
}

fn validate_numeric(
    name: &str,
    property: &PropertySchema,
    numeric: f64,
) -> Result<(), FunctionError> {
    if let Some(minimum) = property.minimum
        && numeric < minimum
    {
        return Err(FunctionError::validation(format!(
            "argument '{name}' must be at least {minimum}"
        )));
    }

    if let Some(maximum) = property.maximum
        && numeric > maximum
    {
        return Err(FunctionError::validation(format!(
            "argument '{name}' must be at most {maximum}"
        )));
    }

    Ok(())
}

fn validate_array(
    name: &str,
    property: &PropertySchema,
    items: &[Value],
) -> Result<(), FunctionError> {
    if let Some(min_items) = property.min_items
        && items.len() < min_items
    {
        return Err(FunctionError::validation(format!(
            "argument '{name}' must contain at least {min_items} items"
        )));
    }

    if let Some(max_items) = property.max_items
        && items.len() > max_items
    {
        return Err(FunctionError::validation(format!(
            "argument '{name}' must contain at most {max_items} items"
        )));
    }

    Ok(())
}

fn type_matches(property_type: PropertyType, value: &Value) -> bool {
    match property_type {
        PropertyType::String => value.is_string(),
        PropertyType::Number => value.is_number(),
        PropertyType::Integer => value.is_i64() || value.is_u64(),
        PropertyType::Boolean => value.is_boolean(),
        PropertyType::Array => value.is_array(),
        PropertyType::Object => value.is_object(),
        PropertyType::Null => value.is_null(),
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) => {
            if number.is_i64() || number.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
