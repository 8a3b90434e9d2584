//! Conversational orchestration over the completion client and function
//! runtime.

mod error;
mod export;
mod message;
mod orchestrator;
mod transcript;
mod types;

pub mod prelude {
    pub use crate::{
        ChatError, ChatErrorKind, ChatOrchestrator, ChatOrchestratorBuilder, ChatPolicy,
        ConversationExport, ConversationStats, Message, ModelConfigExport, Role, Transcript,
        TurnOptions, TurnOutcome,
    };
    pub use pcompletion::{ClientConfig, RetryingClient};
    pub use pfunctions::{FunctionRegistry, FunctionRuntime};
}

pub use error::{ChatError, ChatErrorKind};
pub use export::{ConversationExport, ModelConfigExport};
pub use message::{Message, Role};
pub use orchestrator::{ChatOrchestrator, ChatOrchestratorBuilder};
pub use transcript::{
    ConversationStats, DEFAULT_MAX_TRANSCRIPT_LEN, Transcript, estimate_message_tokens,
};
pub use types::{
    ChatPolicy, DEFAULT_FUNCTION_CALL_TIMEOUT, DEFAULT_MAX_FUNCTION_ROUNDS, TurnOptions,
    TurnOutcome,
};
