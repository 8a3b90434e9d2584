//! Retrying completion client: one logical request per call, transient
//! failures hidden behind the retry policy.

use std::sync::Arc;
use std::time::Duration;

use futures_timer::Delay;

use crate::{
    ClientConfig, CompletionBackend, CompletionError, CompletionHooks, CompletionRequest,
    FinishReason, FunctionCallRequest, FunctionDecl, NoopCompletionHooks, RetryPolicy, Usage,
    WireMessage, WireRole, execute_with_retry,
};

/// The raw model choice for one request, plus usage metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: Option<String>,
    pub function_call: Option<FunctionCallRequest>,
    pub finish_reason: FinishReason,
    pub usage: Usage,
    pub model: String,
}

impl Completion {
    pub fn is_function_call(&self) -> bool {
        self.function_call.is_some()
    }
}

#[derive(Clone)]
pub struct RetryingClient {
    backend: Arc<dyn CompletionBackend>,
    config: ClientConfig,
    policy: RetryPolicy,
    hooks: Arc<dyn CompletionHooks>,
}

impl std::fmt::Debug for RetryingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingClient")
            .field("config", &self.config)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl RetryingClient {
    /// Sampling parameters are validated here, once, not per call.
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        config: ClientConfig,
    ) -> Result<Self, CompletionError> {
        let config = config.validated()?;

        Ok(Self {
            backend,
            config,
            policy: RetryPolicy::default(),
            hooks: Arc::new(NoopCompletionHooks),
        })
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn CompletionHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn complete(
        &self,
        messages: Vec<WireMessage>,
        functions: Vec<FunctionDecl>,
    ) -> Result<Completion, CompletionError> {
        validate_transcript(&messages)?;

        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages,
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_output_tokens,
            functions,
            function_call_mode: "auto".to_string(),
        };

        let response = execute_with_retry(
            "complete",
            &self.policy,
            self.hooks.as_ref(),
            |_attempt| self.backend.complete(request.clone()),
            |delay: Duration| Delay::new(delay),
        )
        .await?;

        let model = response.model;
        let usage = response.usage;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::other("completion response contained no choices"))?;

        Ok(Completion {
            content: choice.message.content,
            function_call: choice.message.function_call,
            finish_reason: FinishReason::parse(&choice.finish_reason),
            usage,
            model,
        })
    }
}

fn validate_transcript(messages: &[WireMessage]) -> Result<(), CompletionError> {
    if messages.is_empty() {
        return Err(CompletionError::bad_request(
            "request transcript must not be empty",
        ));
    }

    for (index, message) in messages.iter().enumerate() {
        let function_call_only =
            message.role == WireRole::Assistant && message.function_call.is_some();

        if message.content.is_empty() && !function_call_only {
            return Err(CompletionError::bad_request(format!(
                "transcript entry {index} has no content"
            )));
        }
    }

    Ok(())
}
