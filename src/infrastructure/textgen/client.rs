use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::types::{Embedding, EmbeddingsBody, GenerateBody, GeneratedText, ResultsEnvelope};
use crate::domain::models::TextGenConfig;
use crate::domain::ports::{GenerateRequest, TextGenError, TextGenerator};

const GENERATE_PATH: &str = "/api/v1/generate";
const EMBEDDINGS_PATH: &str = "/api/v1/get-embeddings";

/// Configuration for the text-generation HTTP client
#[derive(Debug, Clone)]
pub struct TextGenClientConfig {
    /// Base URL of the server, without the `/api` suffix
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TextGenClientConfig {
    fn default() -> Self {
        TextGenConfig::default().into()
    }
}

impl From<TextGenConfig> for TextGenClientConfig {
    fn from(config: TextGenConfig) -> Self {
        Self {
            base_url: config.base_url,
            timeout_secs: config.timeout_secs,
        }
    }
}

impl From<&TextGenConfig> for TextGenClientConfig {
    fn from(config: &TextGenConfig) -> Self {
        config.clone().into()
    }
}

/// HTTP client for a local text-generation server
pub struct TextGenClient {
    http_client: ReqwestClient,
    base_url: String,
}

impl TextGenClient {
    /// Create a new client
    pub fn new(config: TextGenClientConfig) -> Result<Self, TextGenError> {
        info!(
            base_url = %config.base_url,
            timeout_secs = config.timeout_secs,
            "Initializing text-generation client"
        );

        let http_client = ReqwestClient::builder()
            .pool_max_idle_per_host(4)
            .timeout(Duration::from_secs(config.timeout_secs))
            .tcp_nodelay(true)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// POST `body` to `path` and return the success body as text.
    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<String, TextGenError> {
        let response = self
            .http_client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(TextGenError::from_status(status, body));
        }

        Ok(response.text().await?)
    }

    /// Take the first entry of a results envelope.
    fn first_result<T: DeserializeOwned>(body: &str) -> Result<T, TextGenError> {
        let envelope: ResultsEnvelope<T> = serde_json::from_str(body)
            .map_err(|err| TextGenError::UnexpectedResponse(err.to_string()))?;
        envelope
            .results
            .into_iter()
            .next()
            .ok_or_else(|| TextGenError::UnexpectedResponse("empty results list".to_string()))
    }
}

#[async_trait]
impl TextGenerator for TextGenClient {
    #[instrument(skip(self, request), fields(max_tokens = request.max_tokens))]
    async fn generate(&self, request: &GenerateRequest) -> Result<String, TextGenError> {
        let body = GenerateBody {
            prompt: &request.prompt,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };
        let text = self.post(GENERATE_PATH, &body).await?;

        // A success status with a non-JSON body yields no completion.
        if serde_json::from_str::<serde_json::Value>(&text).is_err() {
            warn!(body = %text, "generate returned a non-JSON body");
            return Ok(String::new());
        }

        let generated: GeneratedText = Self::first_result(&text)?;
        debug!(chars = generated.text.len(), "generated text");
        Ok(generated.text)
    }

    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, TextGenError> {
        let body = self.post(EMBEDDINGS_PATH, &EmbeddingsBody { text }).await?;
        let embedding: Embedding = Self::first_result(&body)?;
        Ok(embedding.embeddings)
    }
}
