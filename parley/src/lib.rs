//! Unified facade over the parley workspace crates.
//!
//! This crate is designed to be the single dependency for most applications.
//! It re-exports the core parley crates and provides a builder that wires a
//! function registry, a retrying completion client, and a conversation
//! orchestrator into one ready-to-use agent.

mod agent;

pub mod prelude;

pub use pchat;
pub use pcommon;
pub use pcompletion;
pub use pfunctions;
pub use pobserve;

pub use agent::AgentBuilder;

#[cfg(feature = "http-backend")]
pub use agent::http_backend;

pub use pchat::{
    ChatError, ChatErrorKind, ChatOrchestrator, ChatOrchestratorBuilder, ChatPolicy,
    ConversationExport, ConversationStats, Message, ModelConfigExport, Role, Transcript,
    TurnOptions, TurnOutcome, estimate_message_tokens,
};
pub use pcommon::{BoxFuture, ConversationId, MetadataMap, Registry, SamplingOptions};
pub use pcompletion::{
    ClientConfig, Completion, CompletionBackend, CompletionError, CompletionErrorKind,
    CompletionFuture, CompletionHooks, CompletionRequest, CompletionResponse, FinishReason,
    FunctionCallRequest, FunctionDecl, NoopCompletionHooks, RetryPolicy, RetryingClient,
    ScriptedBackend, Usage, WireMessage, WireRole, classify_status, execute_with_retry,
};
pub use pfunctions::{
    ExecutionFailure, ExecutionOptions, ExecutionResult, FunctionError, FunctionErrorKind,
    FunctionFuture, FunctionRegistry, FunctionRuntime, FunctionRuntimeHooks, FunctionSchema,
    NoopFunctionRuntimeHooks, ParameterSchema, PropertySchema, PropertyType, parse_arguments,
    required_string, sanitize_serializable, sanitize_value, validate_arguments,
};
pub use pobserve::{MetricsObservabilityHooks, TracingObservabilityHooks};

#[cfg(test)]
mod tests {
    use crate::{FunctionSchema, PropertySchema, Role};

    #[test]
    fn facade_reexports_compose_a_schema() {
        let schema = FunctionSchema::new("get_time", "Returns the current time")
            .property("zone", PropertySchema::string())
            .required(["zone"]);

        assert!(schema.validate().is_ok());
        assert_eq!(Role::parse("user").expect("role should parse"), Role::User);
    }
}
