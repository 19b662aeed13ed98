//! textgen-bridge CLI entry point.

use anyhow::Result;
use clap::Parser;

use textgen_bridge::cli::commands::{complete, embed, normalize, render};
use textgen_bridge::cli::{handle_error, Cli, Commands};
use textgen_bridge::domain::models::Config;
use textgen_bridge::infrastructure::config::ConfigLoader;
use textgen_bridge::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli.command, cli.config.as_deref(), cli.json).await {
        handle_error(err, cli.json);
    }
}

async fn run(command: Commands, config_path: Option<&std::path::Path>, json: bool) -> Result<()> {
    let config: Config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))?;

    match command {
        Commands::Render(args) => render::execute(args, &config, json).await,
        Commands::Normalize(args) => normalize::execute(args, json).await,
        Commands::Complete(args) => complete::execute(args, &config, json).await,
        Commands::Embed(args) => embed::execute(args, &config, json).await,
    }
}
