//! Facade-owned builder wiring the registry, client, and orchestrator.

use std::sync::Arc;

use pchat::{ChatOrchestrator, ChatPolicy};
use pcommon::ConversationId;
use pcompletion::{
    ClientConfig, CompletionBackend, CompletionError, CompletionHooks, RetryPolicy, RetryingClient,
};
use pfunctions::{FunctionRegistry, FunctionRuntime, FunctionRuntimeHooks};

pub struct AgentBuilder {
    backend: Arc<dyn CompletionBackend>,
    config: ClientConfig,
    registry: FunctionRegistry,
    chat_policy: ChatPolicy,
    retry_policy: Option<RetryPolicy>,
    completion_hooks: Option<Arc<dyn CompletionHooks>>,
    function_hooks: Option<Arc<dyn FunctionRuntimeHooks>>,
    system_prompt: Option<String>,
    conversation_id: Option<ConversationId>,
}

impl AgentBuilder {
    pub fn new(backend: Arc<dyn CompletionBackend>, config: ClientConfig) -> Self {
        Self {
            backend,
            config,
            registry: FunctionRegistry::new(),
            chat_policy: ChatPolicy::default(),
            retry_policy: None,
            completion_hooks: None,
            function_hooks: None,
            system_prompt: None,
            conversation_id: None,
        }
    }

    pub fn conversation_id(mut self, conversation_id: impl Into<ConversationId>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    /// Registration happens at setup time, before any dispatch; the built
    /// orchestrator holds the registry behind an `Arc` for execution only.
    pub fn registry(mut self, registry: FunctionRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn chat_policy(mut self, chat_policy: ChatPolicy) -> Self {
        self.chat_policy = chat_policy;
        self
    }

    pub fn retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = Some(retry_policy);
        self
    }

    pub fn completion_hooks(mut self, hooks: Arc<dyn CompletionHooks>) -> Self {
        self.completion_hooks = Some(hooks);
        self
    }

    pub fn function_hooks(mut self, hooks: Arc<dyn FunctionRuntimeHooks>) -> Self {
        self.function_hooks = Some(hooks);
        self
    }

    pub fn system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn build(self) -> Result<ChatOrchestrator, CompletionError> {
        let mut client = RetryingClient::new(self.backend, self.config)?;
        if let Some(retry_policy) = self.retry_policy {
            client = client.with_policy(retry_policy);
        }

        if let Some(hooks) = self.completion_hooks {
            client = client.with_hooks(hooks);
        }

        let mut runtime = FunctionRuntime::new(Arc::new(self.registry));
        if let Some(hooks) = self.function_hooks {
            runtime = runtime.with_hooks(hooks);
        }

        let mut builder = ChatOrchestrator::builder(client, runtime).policy(self.chat_policy);
        if let Some(system_prompt) = self.system_prompt {
            builder = builder.system_prompt(system_prompt);
        }

        if let Some(conversation_id) = self.conversation_id {
            builder = builder.conversation_id(conversation_id);
        }

        Ok(builder.build())
    }
}

/// Convenience constructor for the HTTP completion backend.
#[cfg(feature = "http-backend")]
pub fn http_backend(
    base_url: impl Into<String>,
    api_key: Option<&str>,
) -> Arc<dyn CompletionBackend> {
    let mut backend =
        pcompletion::HttpCompletionBackend::new(reqwest::Client::new(), base_url);
    if let Some(api_key) = api_key {
        backend = backend.with_api_key(api_key);
    }

    Arc::new(backend)
}
