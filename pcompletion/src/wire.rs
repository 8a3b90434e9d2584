//! Serde model of the completion endpoint contract.
//!
//! Request and response shapes mirror the endpoint's JSON exactly; nothing in
//! this module knows about transcripts or registries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    System,
    User,
    Assistant,
    Function,
}

/// One transcript entry as the endpoint expects to receive it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: WireRole,
    pub content: String,
    #[serde(rename = "functionCall", skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCallRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl WireMessage {
    pub fn new(role: WireRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            function_call: None,
            name: None,
        }
    }

    pub fn with_function_call(mut self, function_call: FunctionCallRequest) -> Self {
        self.function_call = Some(function_call);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A model-requested function invocation. `arguments` is the raw JSON text
/// exactly as the model produced it; parsing is the orchestrator's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCallRequest {
    pub name: String,
    pub arguments: String,
}

/// A registered capability as advertised on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub functions: Vec<FunctionDecl>,
    #[serde(rename = "functionCallMode")]
    pub function_call_mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "functionCall", skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCallRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
    #[serde(rename = "finishReason")]
    pub finish_reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    #[serde(rename = "totalTokens")]
    pub total_tokens: u32,
    #[serde(rename = "promptTokens", default)]
    pub prompt_tokens: u32,
    #[serde(rename = "completionTokens", default)]
    pub completion_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Usage,
    pub model: String,
}

/// How one completion ended, parsed from the wire's `finishReason`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    FunctionCall,
    Length,
    Other,
}

impl FinishReason {
    pub fn parse(value: &str) -> Self {
        match value {
            "stop" => Self::Stop,
            "function_call" => Self::FunctionCall,
            "length" => Self::Length,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::FunctionCall => "function_call",
            Self::Length => "length",
            Self::Other => "other",
        }
    }
}
