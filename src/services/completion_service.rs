//! Completion service: one request through render → generate → normalize.

use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::domain::errors::{CompletionError, PromptResult};
use crate::domain::models::{
    AgentState, GenerationConfig, Message, NormalizedResponse, PromptProfile,
};
use crate::domain::ports::{GenerateRequest, PromptFormat, TextGenError, TextGenerator};
use crate::services::prompt_formats::format_for;

/// Turns chat conversations into completions from a text-generation backend.
///
/// Profile and agent state are read once at construction and shared
/// immutably across requests.
pub struct CompletionService {
    generator: Arc<dyn TextGenerator>,
    format: Box<dyn PromptFormat>,
    profile: Arc<PromptProfile>,
    agent: AgentState,
    generation: GenerationConfig,
}

impl CompletionService {
    /// Create a service using the format selected by the profile.
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        profile: Arc<PromptProfile>,
        agent: AgentState,
        generation: GenerationConfig,
    ) -> Self {
        let format = format_for(profile.template_type);
        info!(format = format.name(), "completion service ready");
        Self {
            generator,
            format,
            profile,
            agent,
            generation,
        }
    }

    /// Replace the prompt format strategy.
    #[must_use]
    pub fn with_format(mut self, format: Box<dyn PromptFormat>) -> Self {
        self.format = format;
        self
    }

    /// Name of the active prompt format.
    pub fn format_name(&self) -> &'static str {
        self.format.name()
    }

    /// Render the prompt for `messages` without sending it.
    pub fn render(&self, messages: &[Message]) -> PromptResult<String> {
        self.format.render(&self.profile, &self.agent, messages)
    }

    /// Resolve caller parameters against the configured defaults.
    ///
    /// A missing token budget uses the default; a temperature at or below the
    /// configured floor is raised to it.
    pub fn generation_params(&self, temperature: Option<f32>, max_tokens: Option<u32>) -> (f32, u32) {
        let temperature = temperature
            .unwrap_or(self.generation.default_temperature)
            .max(self.generation.min_temperature);
        let max_tokens = max_tokens.unwrap_or(self.generation.default_max_tokens);
        (temperature, max_tokens)
    }

    /// Render, generate and normalize one completion.
    #[instrument(skip(self, messages), fields(messages = messages.len()))]
    pub async fn complete(
        &self,
        messages: &[Message],
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> Result<NormalizedResponse, CompletionError> {
        let (temperature, max_tokens) = self.generation_params(temperature, max_tokens);
        let prompt = self.render(messages)?;
        debug!(%prompt, temperature, max_tokens, "reshaped messages");

        let request = GenerateRequest {
            prompt,
            temperature,
            max_tokens,
        };
        let raw = self.generator.generate(&request).await?;
        debug!(%raw, "received completion");

        let normalized = self.format.normalize(&raw);
        if matches!(normalized, NormalizedResponse::Raw(_)) {
            info!("completion could not be normalized, returning raw text");
        }
        Ok(normalized)
    }

    /// Embed `text` with the backend.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, TextGenError> {
        self.generator.embed(text).await
    }
}
