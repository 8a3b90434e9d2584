//! Structured conversation export for the persistence collaborator.
//!
//! A plain serializable record: ordered messages, derived stats, and the
//! active model configuration. No binary or proprietary framing.

use pcommon::ConversationId;
use pcompletion::ClientConfig;
use serde::{Deserialize, Serialize};

use crate::{ConversationStats, Message, Role};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfigExport {
    pub model: String,
    pub temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
}

impl From<&ClientConfig> for ModelConfigExport {
    fn from(config: &ClientConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationExport {
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
    pub messages: Vec<Message>,
    pub stats: ConversationStats,
    #[serde(rename = "modelConfig")]
    pub model_config: ModelConfigExport,
}

impl ConversationExport {
    pub fn new(
        conversation_id: &ConversationId,
        messages: &[Message],
        stats: ConversationStats,
        config: &ClientConfig,
        include_system: bool,
    ) -> Self {
        let messages = messages
            .iter()
            .filter(|message| include_system || message.role != Role::System)
            .cloned()
            .collect();

        Self {
            conversation_id: conversation_id.to_string(),
            messages,
            stats,
            model_config: ModelConfigExport::from(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use pcompletion::ClientConfig;

    use super::*;
    use crate::Transcript;

    fn conversation() -> ConversationId {
        ConversationId::new("conv-1")
    }

    #[test]
    fn export_optionally_excludes_system_entries() {
        let mut transcript = Transcript::new("sys");
        transcript.push(Message::user("hi"));
        transcript.push(Message::assistant("hello"));

        let config = ClientConfig::new("pm-4");
        let with_system = ConversationExport::new(
            &conversation(),
            transcript.messages(),
            transcript.stats(),
            &config,
            true,
        );
        assert_eq!(with_system.messages.len(), 3);

        let without_system = ConversationExport::new(
            &conversation(),
            transcript.messages(),
            transcript.stats(),
            &config,
            false,
        );
        assert_eq!(without_system.messages.len(), 2);
        assert!(without_system.messages.iter().all(|m| m.role != Role::System));
    }

    #[test]
    fn export_serializes_as_a_plain_record() {
        let transcript = Transcript::new("sys");
        let config = ClientConfig::new("pm-4").with_temperature(0.2);
        let export = ConversationExport::new(
            &conversation(),
            transcript.messages(),
            transcript.stats(),
            &config,
            true,
        );

        let wire = serde_json::to_value(&export).expect("export should serialize");
        assert_eq!(wire["conversationId"], "conv-1");
        assert_eq!(wire["modelConfig"]["model"], "pm-4");
        assert_eq!(wire["messages"][0]["role"], "system");
        assert!(wire["stats"]["estimated_tokens"].is_u64());
    }
}
