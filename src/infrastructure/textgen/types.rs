//! Wire types for the text-generation API.

use serde::{Deserialize, Serialize};

/// `POST /api/v1/generate` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateBody<'a> {
    pub prompt: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// `POST /api/v1/get-embeddings` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingsBody<'a> {
    pub text: &'a str,
}

/// Response envelope shared by both endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ResultsEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// One generated text
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedText {
    pub text: String,
}

/// One embedding vector
#[derive(Debug, Clone, Deserialize)]
pub struct Embedding {
    pub embeddings: Vec<f32>,
}
