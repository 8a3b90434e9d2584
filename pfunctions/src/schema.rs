//! Declarative function schema model advertised to the completion endpoint.
//!
//! ```rust
//! use pfunctions::{FunctionSchema, PropertySchema};
//!
//! let schema = FunctionSchema::new("get_weather", "Look up current weather")
//!     .property("city", PropertySchema::string().with_min_length(1))
//!     .required(["city"]);
//!
//! assert!(schema.validate().is_ok());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::FunctionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Null => "null",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

impl PropertySchema {
    pub fn new(property_type: PropertyType) -> Self {
        Self {
            property_type,
            description: None,
            allowed_values: None,
            minimum: None,
            maximum: None,
            min_length: None,
            max_length: None,
            pattern: None,
            min_items: None,
            max_items: None,
        }
    }

    pub fn string() -> Self {
        Self::new(PropertyType::String)
    }

    pub fn number() -> Self {
        Self::new(PropertyType::Number)
    }

    pub fn integer() -> Self {
        Self::new(PropertyType::Integer)
    }

    pub fn boolean() -> Self {
        Self::new(PropertyType::Boolean)
    }

    pub fn array() -> Self {
        Self::new(PropertyType::Array)
    }

    pub fn object() -> Self {
        Self::new(PropertyType::Object)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_allowed_values(mut self, allowed_values: Vec<Value>) -> Self {
        self.allowed_values = Some(allowed_values);
        self
    }

    pub fn with_minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn with_maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_min_items(mut self, min_items: usize) -> Self {
        self.min_items = Some(min_items);
        self
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySchema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(rename = "additionalProperties", skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,
}

impl Default for ParameterSchema {
    fn default() -> Self {
        Self {
            object_type: "object".to_string(),
            properties: BTreeMap::new(),
            required: Vec::new(),
            additional_properties: None,
        }
    }
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSchema {
    pub name: String,
    pub description: String,
    pub parameters: ParameterSchema,
}

impl FunctionSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ParameterSchema::new(),
        }
    }

    pub fn property(mut self, name: impl Into<String>, property: PropertySchema) -> Self {
        self.parameters.properties.insert(name.into(), property);
        self
    }

    pub fn required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters.required = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn deny_additional_properties(mut self) -> Self {
        self.parameters.additional_properties = Some(false);
        self
    }

    /// Structural checks applied at registration time.
    pub fn validate(&self) -> Result<(), FunctionError> {
        if self.name.trim().is_empty() {
            return Err(FunctionError::schema("function name must not be empty"));
        }

        if self.description.trim().is_empty() {
            return Err(FunctionError::schema(format!(
                "function '{}' must carry a description",
                self.name
            )));
        }

        if self.parameters.object_type != "object" {
            return Err(FunctionError::schema(format!(
                "function '{}' parameters must declare type 'object', got '{}'",
                self.name, self.parameters.object_type
            )));
        }

        for required in &self.parameters.required {
            if !self.parameters.properties.contains_key(required) {
                return Err(FunctionError::schema(format!(
                    "function '{}' requires undeclared property '{}'",
                    self.name, required
                )));
            }
        }

        for (property_name, property) in &self.parameters.properties {
            if let Some(pattern) = &property.pattern {
                regex::Regex::new(pattern).map_err(|err| {
                    FunctionError::schema(format!(
                        "function '{}' property '{}' has an invalid pattern: {err}",
                        self.name, property_name
                    ))
                })?;
            }

            if let (Some(minimum), Some(maximum)) = (property.minimum, property.maximum)
                && minimum > maximum
            {
                return Err(FunctionError::schema(format!(
                    "function '{}' property '{}' declares minimum above maximum",
                    self.name, property_name
                )));
            }
        }

        Ok(())
    }
}
