//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::complete::CompleteArgs;
use crate::cli::commands::embed::EmbedArgs;
use crate::cli::commands::normalize::NormalizeArgs;
use crate::cli::commands::render::RenderArgs;

#[derive(Parser, Debug)]
#[command(name = "textgen-bridge")]
#[command(about = "Prompt builder and response normalizer for local text-generation servers", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .textgen/config.yaml and .textgen/local.yaml)
    #[arg(short, long, global = true, env = "TEXTGEN_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reshape a chat conversation into a single prompt
    Render(RenderArgs),

    /// Normalize a raw model reply into the structured response format
    Normalize(NormalizeArgs),

    /// Render, send to the text-generation server and normalize the reply
    Complete(CompleteArgs),

    /// Embed text with the text-generation server
    Embed(EmbedArgs),
}
