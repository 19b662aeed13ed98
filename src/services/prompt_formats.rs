//! Prompt format strategies.
//!
//! `MonolithicFormat` rebuilds agent prompts from the profile; the
//! `ConversationFormat` just attributes every message. Both share the same
//! response normalizer.

use crate::domain::errors::{PromptError, PromptResult};
use crate::domain::models::{
    AgentState, Message, NormalizedResponse, PromptProfile, TemplateType,
};
use crate::domain::ports::PromptFormat;
use crate::services::prompt_builder::{conversation, reply_cue, PromptBuilder};
use crate::services::response_normalizer::ResponseNormalizer;

/// Single flattened prompt rebuilt from profile sections.
#[derive(Debug, Clone, Default)]
pub struct MonolithicFormat {
    builder: PromptBuilder,
    normalizer: ResponseNormalizer,
}

impl MonolithicFormat {
    /// Create a new monolithic format
    pub fn new() -> Self {
        Self::default()
    }
}

impl PromptFormat for MonolithicFormat {
    fn name(&self) -> &'static str {
        "monolithic"
    }

    fn render(
        &self,
        profile: &PromptProfile,
        agent: &AgentState,
        messages: &[Message],
    ) -> PromptResult<String> {
        self.builder.build(profile, agent, messages)
    }

    fn normalize(&self, raw: &str) -> NormalizedResponse {
        self.normalizer.normalize(raw)
    }
}

/// Every message attributed to the profile's display name, followed by the
/// agent's reply cue. No template rebuilding.
#[derive(Debug, Clone, Default)]
pub struct ConversationFormat {
    normalizer: ResponseNormalizer,
}

impl ConversationFormat {
    /// Create a new conversation format
    pub fn new() -> Self {
        Self::default()
    }
}

impl PromptFormat for ConversationFormat {
    fn name(&self) -> &'static str {
        "conversation"
    }

    fn render(
        &self,
        profile: &PromptProfile,
        agent: &AgentState,
        messages: &[Message],
    ) -> PromptResult<String> {
        if messages.is_empty() {
            return Err(PromptError::EmptyConversation);
        }
        let mut prompt = conversation(messages, &profile.send_as);
        prompt.push_str(&reply_cue(profile, agent));
        Ok(prompt)
    }

    fn normalize(&self, raw: &str) -> NormalizedResponse {
        self.normalizer.normalize(raw)
    }
}

/// Select the format strategy for a profile's template type.
pub fn format_for(template_type: TemplateType) -> Box<dyn PromptFormat> {
    match template_type {
        TemplateType::Monolithic => Box::new(MonolithicFormat::new()),
        TemplateType::Conversation => Box::new(ConversationFormat::new()),
    }
}
