//! Text generation port
//!
//! The transport boundary: a finished prompt goes out, raw text comes back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::TextGenError;

/// Parameters for a single completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Flattened prompt
    pub prompt: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,
}

/// Backend that turns prompts into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion; returns the raw model text.
    async fn generate(&self, request: &GenerateRequest) -> Result<String, TextGenError>;

    /// Embed `text` with the backend's embedding model.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, TextGenError>;
}
