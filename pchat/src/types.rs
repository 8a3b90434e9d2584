//! Orchestrator policy, per-turn options, and the caller-facing envelope.

use std::time::Duration;

use pcompletion::{FinishReason, Usage};

use crate::{ChatError, transcript::DEFAULT_MAX_TRANSCRIPT_LEN};

/// Call-site budget for one function execution inside a turn. Distinct from
/// the registry's own internal default; this value always wins.
pub const DEFAULT_FUNCTION_CALL_TIMEOUT: Duration = Duration::from_millis(10_000);

pub const DEFAULT_MAX_FUNCTION_ROUNDS: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ChatPolicy {
    pub max_transcript_len: usize,
    /// Hard bound on function-call rounds per user turn so an adversarial
    /// model cannot keep the loop alive indefinitely.
    pub max_function_rounds: u32,
    pub function_timeout: Duration,
}

impl Default for ChatPolicy {
    fn default() -> Self {
        Self {
            max_transcript_len: DEFAULT_MAX_TRANSCRIPT_LEN,
            max_function_rounds: DEFAULT_MAX_FUNCTION_ROUNDS,
            function_timeout: DEFAULT_FUNCTION_CALL_TIMEOUT,
        }
    }
}

impl ChatPolicy {
    pub fn with_max_transcript_len(mut self, max_transcript_len: usize) -> Self {
        self.max_transcript_len = max_transcript_len;
        self
    }

    pub fn with_max_function_rounds(mut self, max_function_rounds: u32) -> Self {
        self.max_function_rounds = max_function_rounds;
        self
    }

    pub fn with_function_timeout(mut self, function_timeout: Duration) -> Self {
        self.function_timeout = function_timeout;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOptions {
    /// When false the request carries only the system message and the
    /// current turn, not prior history.
    pub include_history: bool,
    /// Optional token budget applied to the assembled request transcript.
    pub token_budget: Option<usize>,
}

impl Default for TurnOptions {
    fn default() -> Self {
        Self {
            include_history: true,
            token_budget: None,
        }
    }
}

impl TurnOptions {
    pub fn single_turn(mut self) -> Self {
        self.include_history = false;
        self
    }

    pub fn with_token_budget(mut self, token_budget: usize) -> Self {
        self.token_budget = Some(token_budget);
        self
    }
}

/// The only shape `process_message` callers ever observe: either the final
/// assistant text with usage metadata, or a classified failure.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub success: bool,
    pub message: String,
    pub usage: Option<Usage>,
    pub finish_reason: Option<FinishReason>,
    pub error: Option<ChatError>,
}

impl TurnOutcome {
    pub fn succeeded(message: impl Into<String>, usage: Usage, finish_reason: FinishReason) -> Self {
        Self {
            success: true,
            message: message.into(),
            usage: Some(usage),
            finish_reason: Some(finish_reason),
            error: None,
        }
    }

    pub fn failed(error: ChatError) -> Self {
        Self {
            success: false,
            message: error.message.clone(),
            usage: None,
            finish_reason: None,
            error: Some(error),
        }
    }
}
