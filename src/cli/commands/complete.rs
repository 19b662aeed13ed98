//! `complete`: render, generate and normalize in one round trip.

use anyhow::{Context, Result};
use clap::Args;
use std::sync::Arc;

use super::PromptArgs;
use crate::cli::output::{output, ResponseOutput};
use crate::domain::models::Config;
use crate::infrastructure::textgen::{TextGenClient, TextGenClientConfig};
use crate::services::CompletionService;

#[derive(Args, Debug)]
pub struct CompleteArgs {
    #[command(flatten)]
    pub prompt: PromptArgs,

    /// Sampling temperature; raised to the configured minimum
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[arg(long)]
    pub max_tokens: Option<u32>,
}

pub async fn execute(args: CompleteArgs, config: &Config, json_mode: bool) -> Result<()> {
    let messages = args.prompt.load_messages()?;
    let client = TextGenClient::new(TextGenClientConfig::from(&config.textgen))
        .context("Failed to create text-generation client")?;

    let service = CompletionService::new(
        Arc::new(client),
        Arc::new(args.prompt.profile(config)),
        args.prompt.agent(config),
        config.generation.clone(),
    );

    let response = service
        .complete(&messages, args.temperature, args.max_tokens)
        .await
        .context("Completion failed")?;

    output(&ResponseOutput::from(&response), json_mode);
    Ok(())
}
