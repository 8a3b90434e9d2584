//! Retrying client over the completion endpoint contract.

mod backend;
mod client;
mod config;
mod error;
mod retry;
mod wire;

#[cfg(feature = "http-backend")]
mod http;

pub mod prelude {
    pub use crate::{
        ClientConfig, Completion, CompletionBackend, CompletionError, CompletionErrorKind,
        CompletionFuture, CompletionHooks, CompletionRequest, CompletionResponse, FinishReason,
        FunctionCallRequest, FunctionDecl, NoopCompletionHooks, RetryPolicy, RetryingClient,
        Usage, WireMessage, WireRole,
    };
}

pub use backend::{CompletionBackend, CompletionFuture, ScriptedBackend};
pub use client::{Completion, RetryingClient};
pub use config::{ClientConfig, MAX_OUTPUT_TOKENS_LIMIT, MAX_TEMPERATURE, MIN_TEMPERATURE};
pub use error::{CompletionError, CompletionErrorKind, classify_status};
pub use retry::{CompletionHooks, NoopCompletionHooks, RetryPolicy, execute_with_retry};
pub use wire::{
    Choice, ChoiceMessage, CompletionRequest, CompletionResponse, FinishReason,
    FunctionCallRequest, FunctionDecl, Usage, WireMessage, WireRole,
};

#[cfg(feature = "http-backend")]
pub use http::HttpCompletionBackend;
