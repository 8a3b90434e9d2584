//! One-stop imports for applications built on parley.
//!
//! ```rust
//! use parley::prelude::*;
//!
//! let schema = FunctionSchema::new("get_time", "Returns the current time");
//! assert_eq!(schema.name, "get_time");
//! ```

pub use crate::AgentBuilder;

#[cfg(feature = "http-backend")]
pub use crate::http_backend;

pub use pchat::{
    ChatError, ChatErrorKind, ChatOrchestrator, ChatOrchestratorBuilder, ChatPolicy,
    ConversationExport, ConversationStats, Message, ModelConfigExport, Role, Transcript,
    TurnOptions, TurnOutcome,
};
pub use pcommon::{BoxFuture, ConversationId, MetadataMap, SamplingOptions};
pub use pcompletion::{
    ClientConfig, Completion, CompletionBackend, CompletionError, CompletionErrorKind,
    CompletionHooks, CompletionRequest, CompletionResponse, FinishReason, FunctionCallRequest,
    FunctionDecl, NoopCompletionHooks, RetryPolicy, RetryingClient, ScriptedBackend, Usage,
    WireMessage, WireRole,
};
pub use pfunctions::{
    ExecutionFailure, ExecutionOptions, ExecutionResult, FunctionError, FunctionErrorKind,
    FunctionRegistry, FunctionRuntime, FunctionRuntimeHooks, FunctionSchema,
    NoopFunctionRuntimeHooks, ParameterSchema, PropertySchema, PropertyType,
};
pub use pobserve::{MetricsObservabilityHooks, TracingObservabilityHooks};
