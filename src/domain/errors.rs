//! Domain errors for prompt rendering and reply normalization.

use thiserror::Error;

use crate::domain::ports::errors::TextGenError;

/// Errors raised while rendering a prompt.
///
/// Profile gaps and extraction misses never surface here; only a caller
/// breaking the rendering contract does.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Cannot render a prompt from an empty conversation")]
    EmptyConversation,
}

/// Internal failures of a normalization stage.
///
/// These stay inside the normalizer: a failing stage hands over to the next
/// one.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Invalid command args: {0}")]
    InvalidArgs(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type PromptResult<T> = Result<T, PromptError>;

/// Errors from a full completion round trip.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Prompt rendering failed: {0}")]
    Prompt(#[from] PromptError),

    #[error("Text generation failed: {0}")]
    Transport(#[from] TextGenError),
}
