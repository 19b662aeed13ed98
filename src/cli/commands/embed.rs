//! `embed`: fetch an embedding vector from the text-generation server.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::read_input;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::domain::ports::TextGenerator;
use crate::infrastructure::textgen::{TextGenClient, TextGenClientConfig};

#[derive(Args, Debug)]
pub struct EmbedArgs {
    /// Text to embed; read from --input or standard input when omitted
    pub text: Option<String>,

    /// File holding the text to embed
    #[arg(short, long, conflicts_with = "text")]
    pub input: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct EmbedOutput {
    pub dimensions: usize,
    pub embedding: Vec<f32>,
}

impl CommandOutput for EmbedOutput {
    fn to_human(&self) -> String {
        let preview: Vec<String> = self
            .embedding
            .iter()
            .take(8)
            .map(|value| format!("{value:.4}"))
            .collect();
        let more = if self.dimensions > preview.len() { ", ..." } else { "" };
        format!("{} dimensions: [{}{more}]", self.dimensions, preview.join(", "))
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "dimensions": self.dimensions,
            "embedding": self.embedding,
        })
    }
}

pub async fn execute(args: EmbedArgs, config: &Config, json_mode: bool) -> Result<()> {
    let text = match args.text {
        Some(text) => text,
        None => read_input(args.input.as_deref())?,
    };

    let client = TextGenClient::new(TextGenClientConfig::from(&config.textgen))
        .context("Failed to create text-generation client")?;
    let embedding = client.embed(&text).await.context("Embedding failed")?;

    let result = EmbedOutput {
        dimensions: embedding.len(),
        embedding,
    };
    output(&result, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_output_human_preview() {
        let output = EmbedOutput {
            dimensions: 10,
            embedding: vec![0.5; 10],
        };
        let human = output.to_human();
        assert!(human.starts_with("10 dimensions: [0.5000"));
        assert!(human.ends_with(", ...]"));

        let short = EmbedOutput {
            dimensions: 2,
            embedding: vec![1.0, 2.0],
        };
        assert_eq!(short.to_human(), "2 dimensions: [1.0000, 2.0000]");
    }
}
