//! Prompt format port
//!
//! A prompt format owns both directions of a template: flattening a chat
//! conversation into the prompt string a model expects, and recovering the
//! structured reply from whatever the model wrote back.

use crate::domain::errors::PromptResult;
use crate::domain::models::{AgentState, Message, NormalizedResponse, PromptProfile};

/// Strategy for one prompt layout.
pub trait PromptFormat: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Build the prompt string for `messages`.
    ///
    /// Fails only when `messages` is empty; profile gaps degrade to empty
    /// sections.
    fn render(
        &self,
        profile: &PromptProfile,
        agent: &AgentState,
        messages: &[Message],
    ) -> PromptResult<String>;

    /// Recover a structured reply from raw model output. Never fails; an
    /// unrecoverable reply comes back as [`NormalizedResponse::Raw`].
    fn normalize(&self, raw: &str) -> NormalizedResponse;
}
