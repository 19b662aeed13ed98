//! CLI command implementations.

pub mod complete;
pub mod embed;
pub mod normalize;
pub mod render;

use anyhow::{Context, Result};
use clap::Args;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::domain::models::{AgentState, Config, Message, PromptProfile};
use crate::infrastructure::templates::ProfileLoader;

/// Conversation and prompt options shared by `render` and `complete`.
#[derive(Args, Debug)]
pub struct PromptArgs {
    /// JSON file holding the conversation as `[{"role": ..., "content": ...}]`
    #[arg(short, long)]
    pub messages: PathBuf,

    /// Prompt profile (YAML or JSON); overrides `profile_path` from config
    #[arg(short, long)]
    pub profile: Option<PathBuf>,

    /// Agent name; overrides `agent.name` from config
    #[arg(long)]
    pub agent_name: Option<String>,

    /// Agent role; overrides `agent.role` from config
    #[arg(long)]
    pub agent_role: Option<String>,

    /// Agent goal, repeatable; replaces `agent.goals` from config
    #[arg(long = "goal")]
    pub goals: Vec<String>,
}

impl PromptArgs {
    /// Agent state from config with command-line overrides applied.
    pub fn agent(&self, config: &Config) -> AgentState {
        let mut agent = config.agent.clone();
        if let Some(name) = &self.agent_name {
            agent.name.clone_from(name);
        }
        if let Some(role) = &self.agent_role {
            agent.role.clone_from(role);
        }
        if !self.goals.is_empty() {
            agent.goals.clone_from(&self.goals);
        }
        agent
    }

    /// The profile named on the command line or in config, else the built-in one.
    pub fn profile(&self, config: &Config) -> PromptProfile {
        let path = self.profile.as_deref().or(config.profile_path.as_deref());
        ProfileLoader::load_or_builtin(path)
    }

    /// Read the conversation file.
    pub fn load_messages(&self) -> Result<Vec<Message>> {
        load_messages(&self.messages)
    }
}

/// Read a conversation from a JSON file.
pub fn load_messages(path: &Path) -> Result<Vec<Message>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read messages file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid messages file: {}", path.display()))
}

/// Read `path`, or standard input when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read standard input")?;
            Ok(buffer)
        }
    }
}
