//! Bounded transcript with count- and token-budget eviction.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::{Message, Role};

pub const DEFAULT_MAX_TRANSCRIPT_LEN: usize = 20;

/// Flat per-message overhead added to the content estimate.
const MESSAGE_OVERHEAD_TOKENS: usize = 10;

/// Rough token cost of one message: `ceil(utf8_len / 4)` plus overhead, plus
/// the serialized function-call payload at the same 4-bytes-per-token rate.
/// Advisory only; used for trimming and stats, never for billing.
pub fn estimate_message_tokens(message: &Message) -> usize {
    let mut tokens = message.content.len().div_ceil(4) + MESSAGE_OVERHEAD_TOKENS;

    if let Some(function_call) = &message.function_call {
        let serialized = serde_json::to_string(function_call).unwrap_or_default();
        tokens += serialized.len() / 4;
    }

    tokens
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationStats {
    pub system_messages: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub function_messages: usize,
    pub total_messages: usize,
    pub estimated_tokens: usize,
    #[serde(with = "started_at_millis")]
    pub started_at: SystemTime,
}

mod started_at_millis {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = value
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

/// Append-only message history, except for eviction-based trimming. The
/// seeded system message is index 0 and is never evicted.
#[derive(Debug, Clone)]
pub struct Transcript {
    entries: Vec<Message>,
    started_at: SystemTime,
    max_len: usize,
}

impl Transcript {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self::with_max_len(system_prompt, DEFAULT_MAX_TRANSCRIPT_LEN)
    }

    pub fn with_max_len(system_prompt: impl Into<String>, max_len: usize) -> Self {
        Self {
            entries: vec![Message::system(system_prompt)],
            started_at: SystemTime::now(),
            max_len: max_len.max(2),
        }
    }

    /// Truncates back to `[system]`, replacing the system content when a new
    /// prompt is provided.
    pub fn reset(&mut self, system_prompt: Option<&str>) {
        let content = match system_prompt {
            Some(prompt) => prompt.to_string(),
            None => self.entries[0].content.clone(),
        };

        self.entries = vec![Message::system(content)];
        self.started_at = SystemTime::now();
    }

    pub fn push(&mut self, message: Message) {
        self.entries.push(message);
        self.trim_to_max_len();
    }

    fn trim_to_max_len(&mut self) {
        if self.entries.len() <= self.max_len {
            return;
        }

        let keep_from = self.entries.len() - (self.max_len - 1);
        let mut trimmed = Vec::with_capacity(self.max_len);
        trimmed.push(self.entries[0].clone());
        trimmed.extend(self.entries[keep_from..].iter().cloned());
        self.entries = trimmed;
    }

    /// Alternate, token-based eviction: greedily keeps the most recent
    /// messages whose cumulative estimate fits `budget`, after the system
    /// message has been charged against it.
    pub fn trim_to_token_limit(&mut self, budget: usize) {
        self.entries = select_within_token_budget(&self.entries, budget);
    }

    pub fn messages(&self) -> &[Message] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn started_at(&self) -> SystemTime {
        self.started_at
    }

    pub fn stats(&self) -> ConversationStats {
        let mut stats = ConversationStats {
            system_messages: 0,
            user_messages: 0,
            assistant_messages: 0,
            function_messages: 0,
            total_messages: self.entries.len(),
            estimated_tokens: 0,
            started_at: self.started_at,
        };

        for message in &self.entries {
            match message.role {
                Role::System => stats.system_messages += 1,
                Role::User => stats.user_messages += 1,
                Role::Assistant => stats.assistant_messages += 1,
                Role::Function => stats.function_messages += 1,
            }

            stats.estimated_tokens += estimate_message_tokens(message);
        }

        stats
    }
}

/// Shared by the mutating trim and the per-request assembly in the
/// orchestrator. The system message is always preserved first.
pub(crate) fn select_within_token_budget(messages: &[Message], budget: usize) -> Vec<Message> {
    let Some((system, rest)) = messages.split_first() else {
        return Vec::new();
    };

    let mut remaining = budget.saturating_sub(estimate_message_tokens(system));
    let mut kept_tail = Vec::new();

    for message in rest.iter().rev() {
        let cost = estimate_message_tokens(message);
        if cost > remaining {
            break;
        }

        remaining -= cost;
        kept_tail.push(message.clone());
    }

    kept_tail.reverse();

    let mut selected = Vec::with_capacity(kept_tail.len() + 1);
    selected.push(system.clone());
    selected.extend(kept_tail);
    selected
}

#[cfg(test)]
mod tests {
    use pcompletion::FunctionCallRequest;

    use super::*;

    #[test]
    fn transcript_starts_with_the_system_message() {
        let transcript = Transcript::new("be helpful");

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].role, Role::System);
        assert_eq!(transcript.messages()[0].content, "be helpful");
    }

    #[test]
    fn count_trim_keeps_system_plus_most_recent() {
        let mut transcript = Transcript::new("system prompt");

        for index in 0..50 {
            transcript.push(Message::user(format!("u{index}")));
            transcript.push(Message::assistant(format!("a{index}")));
        }

        transcript.push(Message::user("latest"));

        assert_eq!(transcript.len(), DEFAULT_MAX_TRANSCRIPT_LEN);
        assert_eq!(transcript.messages()[0].role, Role::System);
        assert_eq!(transcript.messages()[0].content, "system prompt");
        assert_eq!(
            transcript.messages().last().expect("transcript should not be empty").content,
            "latest"
        );
    }

    #[test]
    fn reset_keeps_or_replaces_the_system_prompt() {
        let mut transcript = Transcript::new("original");
        transcript.push(Message::user("hello"));

        transcript.reset(None);
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].content, "original");

        transcript.reset(Some("replacement"));
        assert_eq!(transcript.messages()[0].content, "replacement");
    }

    #[test]
    fn token_estimate_adds_overhead_and_function_payload() {
        let plain = Message::user("abcdefgh");
        assert_eq!(estimate_message_tokens(&plain), 8_usize.div_ceil(4) + 10);

        let call = Message::function_call(FunctionCallRequest {
            name: "get_time".to_string(),
            arguments: "{\"zone\":\"UTC\"}".to_string(),
        });
        assert!(estimate_message_tokens(&call) > 10);
    }

    #[test]
    fn token_trim_prefers_recent_messages_and_keeps_system() {
        let mut transcript = Transcript::with_max_len("sys", 100);
        for index in 0..10 {
            transcript.push(Message::user(format!("message number {index}")));
        }

        let system_cost = estimate_message_tokens(&transcript.messages()[0]);
        let per_message = estimate_message_tokens(&transcript.messages()[1]);
        transcript.trim_to_token_limit(system_cost + per_message * 3);

        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript.messages()[0].role, Role::System);
        assert_eq!(transcript.messages()[3].content, "message number 9");
        assert_eq!(transcript.messages()[1].content, "message number 7");
    }

    #[test]
    fn token_trim_with_tiny_budget_still_keeps_system() {
        let mut transcript = Transcript::new("sys");
        transcript.push(Message::user("hello"));

        transcript.trim_to_token_limit(0);

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].role, Role::System);
    }

    #[test]
    fn stats_count_roles_and_tokens_without_mutating() {
        let mut transcript = Transcript::new("sys");
        transcript.push(Message::user("hi"));
        transcript.push(Message::assistant("hello"));
        transcript.push(Message::function_result("get_time", "12:00"));

        let stats = transcript.stats();
        assert_eq!(stats.system_messages, 1);
        assert_eq!(stats.user_messages, 1);
        assert_eq!(stats.assistant_messages, 1);
        assert_eq!(stats.function_messages, 1);
        assert_eq!(stats.total_messages, 4);
        assert!(stats.estimated_tokens >= 40);
        assert_eq!(transcript.len(), 4);
    }
}
