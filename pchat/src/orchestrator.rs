//! Multi-round conversation orchestration over the completion client and the
//! function runtime.
//!
//! Within one turn, transcript mutations happen in strict program order:
//! user message, then the echoed function-call request, then the function
//! result, then the assistant text. That ordering is part of the wire
//! contract with the completion endpoint.

use pcommon::ConversationId;
use pcompletion::{
    Completion, CompletionError, FunctionCallRequest, FunctionDecl, RetryingClient, WireMessage,
};
use pfunctions::{
    ExecutionOptions, ExecutionResult, FunctionRuntime, FunctionSchema, parse_arguments,
};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    ChatError, ChatPolicy, ConversationExport, ConversationStats, Message, Role, Transcript,
    TurnOptions, TurnOutcome, transcript::select_within_token_budget,
};

pub struct ChatOrchestrator {
    conversation_id: ConversationId,
    // One logical writer per conversation: the lock is held for the whole
    // turn, so concurrent process_message calls serialize.
    transcript: Mutex<Transcript>,
    client: RetryingClient,
    functions: FunctionRuntime,
    policy: ChatPolicy,
}

pub struct ChatOrchestratorBuilder {
    conversation_id: ConversationId,
    client: RetryingClient,
    functions: FunctionRuntime,
    policy: ChatPolicy,
    system_prompt: String,
}

impl ChatOrchestratorBuilder {
    pub fn new(client: RetryingClient, functions: FunctionRuntime) -> Self {
        Self {
            conversation_id: ConversationId::new("default"),
            client,
            functions,
            policy: ChatPolicy::default(),
            system_prompt: "You are a helpful assistant.".to_string(),
        }
    }

    pub fn conversation_id(mut self, conversation_id: impl Into<ConversationId>) -> Self {
        self.conversation_id = conversation_id.into();
        self
    }

    pub fn policy(mut self, policy: ChatPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn build(self) -> ChatOrchestrator {
        ChatOrchestrator {
            conversation_id: self.conversation_id,
            transcript: Mutex::new(Transcript::with_max_len(
                self.system_prompt,
                self.policy.max_transcript_len,
            )),
            client: self.client,
            functions: self.functions,
            policy: self.policy,
        }
    }
}

impl ChatOrchestrator {
    pub fn builder(client: RetryingClient, functions: FunctionRuntime) -> ChatOrchestratorBuilder {
        ChatOrchestratorBuilder::new(client, functions)
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    /// Resets the transcript to `[system]`, replacing the system prompt when
    /// one is provided.
    pub async fn start_conversation(&self, system_prompt: Option<&str>) {
        self.transcript.lock().await.reset(system_prompt);
    }

    /// Truncates the transcript back to `[system]`.
    pub async fn clear_history(&self) {
        self.transcript.lock().await.reset(None);
    }

    /// Appends one message with a server-assigned timestamp, then applies
    /// count-based trimming.
    pub async fn add_message(&self, role: Role, content: &str) -> Result<(), ChatError> {
        if content.is_empty() && role != Role::Assistant {
            return Err(ChatError::invalid_content(
                "message content must not be empty",
            ));
        }

        self.transcript.lock().await.push(Message::new(role, content));
        Ok(())
    }

    pub async fn stats(&self) -> ConversationStats {
        self.transcript.lock().await.stats()
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.transcript.lock().await.messages().to_vec()
    }

    pub async fn trim_to_token_limit(&self, budget: usize) {
        self.transcript.lock().await.trim_to_token_limit(budget);
    }

    pub async fn export(&self, include_system: bool) -> ConversationExport {
        let transcript = self.transcript.lock().await;
        ConversationExport::new(
            &self.conversation_id,
            transcript.messages(),
            transcript.stats(),
            self.client.config(),
            include_system,
        )
    }

    /// Runs one full conversational turn. Never returns a raw fault: every
    /// failure is folded into a `TurnOutcome` envelope, and non-input
    /// failures are also recorded into the transcript so downstream context
    /// reflects that an error occurred.
    pub async fn process_message(&self, user_input: &str, options: TurnOptions) -> TurnOutcome {
        if user_input.trim().is_empty() {
            return TurnOutcome::failed(ChatError::invalid_input(
                "user input must not be empty",
            ));
        }

        let mut transcript = self.transcript.lock().await;
        transcript.push(Message::user(user_input));

        match self.run_turn(&mut transcript, &options).await {
            Ok(outcome) => outcome,
            Err(error) => {
                let outcome = TurnOutcome::failed(error);
                transcript.push(Message::assistant(format!("Error: {}", outcome.message)));
                outcome
            }
        }
    }

    async fn run_turn(
        &self,
        transcript: &mut Transcript,
        options: &TurnOptions,
    ) -> Result<TurnOutcome, ChatError> {
        let mut rounds_remaining = self.policy.max_function_rounds;
        // Messages this turn has appended so far; the turn's entries are
        // always the transcript tail, which stays true across trimming.
        let mut turn_len = 1;
        let mut completion = self.request_completion(transcript, turn_len, options).await?;

        loop {
            let Some(call) = completion.function_call.clone() else {
                let text = completion.content.unwrap_or_default();
                transcript.push(Message::assistant(text.clone()));
                return Ok(TurnOutcome::succeeded(
                    text,
                    completion.usage,
                    completion.finish_reason,
                ));
            };

            if rounds_remaining == 0 {
                return Err(ChatError::too_many_function_calls(format!(
                    "model requested more than {} function calls in one turn",
                    self.policy.max_function_rounds
                )));
            }

            rounds_remaining -= 1;
            self.run_function_round(transcript, &call).await;
            turn_len += 2;
            completion = self.request_completion(transcript, turn_len, options).await?;
        }
    }

    /// One function-call round: echo the request, execute (or degrade), and
    /// append the formatted result as a function-role message.
    async fn run_function_round(&self, transcript: &mut Transcript, call: &FunctionCallRequest) {
        transcript.push(Message::function_call(call.clone()));

        let result_text = match parse_arguments(&call.arguments) {
            // A parse failure is not escalated; the model gets the error as
            // context and a chance to recover.
            Err(parse_error) => format_failure_text(parse_error.kind.as_str(), &parse_error.message),
            Ok(args) => {
                let result = self
                    .functions
                    .execute_safely(
                        &call.name,
                        args,
                        ExecutionOptions::default().with_timeout(self.policy.function_timeout),
                    )
                    .await;
                format_execution_result(&result)
            }
        };

        transcript.push(Message::function_result(call.name.clone(), result_text));
    }

    async fn request_completion(
        &self,
        transcript: &Transcript,
        turn_len: usize,
        options: &TurnOptions,
    ) -> Result<Completion, CompletionError> {
        let request_messages = assemble_request(transcript, turn_len, options);
        let functions = advertised_functions(&self.functions.registry().schemas());
        self.client.complete(request_messages, functions).await
    }
}

fn assemble_request(
    transcript: &Transcript,
    turn_len: usize,
    options: &TurnOptions,
) -> Vec<WireMessage> {
    let messages = transcript.messages();

    let selected: Vec<Message> = if options.include_history {
        messages.to_vec()
    } else {
        // Single-turn mode: system message plus everything this turn added,
        // which is always the last `turn_len` entries.
        let tail_from = messages.len().saturating_sub(turn_len).max(1);
        let mut single = vec![messages[0].clone()];
        single.extend(messages[tail_from..].iter().cloned());
        single
    };

    let budgeted = match options.token_budget {
        Some(budget) => select_within_token_budget(&selected, budget),
        None => selected,
    };

    budgeted.iter().map(Message::to_wire).collect()
}

fn advertised_functions(schemas: &[FunctionSchema]) -> Vec<FunctionDecl> {
    schemas
        .iter()
        .map(|schema| FunctionDecl {
            name: schema.name.clone(),
            description: schema.description.clone(),
            parameters: serde_json::to_value(&schema.parameters)
                .unwrap_or_else(|_| Value::Object(serde_json::Map::new())),
        })
        .collect()
}

/// Success results are stringified naturally: objects and arrays as
/// pretty-printed JSON, primitives as their bare form. Failures use a fixed
/// `Error (kind): message` shape.
fn format_execution_result(result: &ExecutionResult) -> String {
    if result.success {
        match &result.result {
            Some(Value::String(text)) => text.clone(),
            Some(value @ (Value::Object(_) | Value::Array(_))) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Some(value) => value.to_string(),
            None => String::new(),
        }
    } else {
        match &result.error {
            Some(failure) => format_failure_text(failure.kind.as_str(), &failure.message),
            None => format_failure_text("unexpected_error", "function failed without detail"),
        }
    }
}

fn format_failure_text(kind: &str, message: &str) -> String {
    format!("Error ({kind}): {message}")
}
