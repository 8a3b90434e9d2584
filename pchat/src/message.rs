//! Transcript message model.
//!
//! ```rust
//! use pchat::{Message, Role};
//!
//! let message = Message::user("hello");
//! assert_eq!(message.role, Role::User);
//! assert_eq!(Role::parse("assistant").expect("role should parse"), Role::Assistant);
//! ```

use std::time::SystemTime;

use pcompletion::{FunctionCallRequest, WireMessage, WireRole};
use serde::{Deserialize, Serialize};

use crate::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Function,
}

impl Role {
    /// String-boundary constructor for callers outside the typed API.
    /// The role set is closed; anything else is rejected.
    pub fn parse(value: &str) -> Result<Self, ChatError> {
        match value {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            "function" => Ok(Self::Function),
            other => Err(ChatError::invalid_role(format!(
                "'{other}' is not a valid role"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Function => "function",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(with = "timestamp_millis")]
    pub timestamp: SystemTime,
    #[serde(rename = "functionCall", skip_serializing_if = "Option::is_none", default)]
    pub function_call: Option<FunctionCallRequest>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}

impl Message {
    /// Timestamps are assigned here, never accepted from callers.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: SystemTime::now(),
            function_call: None,
            name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Assistant entry echoing a model-requested function call; content stays
    /// empty, matching the shape the completion endpoint expects back.
    pub fn function_call(request: FunctionCallRequest) -> Self {
        let mut message = Self::new(Role::Assistant, "");
        message.function_call = Some(request);
        message
    }

    /// Function-role entry carrying a formatted execution result.
    pub fn function_result(function_name: impl Into<String>, content: impl Into<String>) -> Self {
        let mut message = Self::new(Role::Function, content);
        message.name = Some(function_name.into());
        message
    }

    pub fn to_wire(&self) -> WireMessage {
        let role = match self.role {
            Role::System => WireRole::System,
            Role::User => WireRole::User,
            Role::Assistant => WireRole::Assistant,
            Role::Function => WireRole::Function,
        };

        let mut wire = WireMessage::new(role, self.content.clone());
        if let Some(function_call) = &self.function_call {
            wire = wire.with_function_call(function_call.clone());
        }

        if let Some(name) = &self.name {
            wire = wire.with_name(name.clone());
        }

        wire
    }
}

mod timestamp_millis {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        timestamp: &SystemTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let millis = timestamp
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as u64;

        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<SystemTime, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + Duration::from_millis(millis))
    }
}
