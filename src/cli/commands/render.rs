//! `render`: reshape a conversation into a prompt without sending it.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use super::PromptArgs;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::services::format_for;

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub prompt: PromptArgs,
}

#[derive(Debug, Serialize)]
pub struct RenderOutput {
    pub format: String,
    pub prompt: String,
}

impl CommandOutput for RenderOutput {
    fn to_human(&self) -> String {
        self.prompt.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "format": self.format,
            "prompt": self.prompt,
        })
    }
}

pub async fn execute(args: RenderArgs, config: &Config, json_mode: bool) -> Result<()> {
    let result = render(&args, config)?;
    output(&result, json_mode);
    Ok(())
}

fn render(args: &RenderArgs, config: &Config) -> Result<RenderOutput> {
    let messages = args.prompt.load_messages()?;
    let profile = args.prompt.profile(config);
    let agent = args.prompt.agent(config);

    let format = format_for(profile.template_type);
    let prompt = format
        .render(&profile, &agent, &messages)
        .context("Failed to render prompt")?;

    Ok(RenderOutput {
        format: format.name().to_string(),
        prompt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_render_with_builtin_profile() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"role": "system", "content": "You are Bob, a helper"}}, {{"role": "user", "content": "hi"}}]"#
        )
        .unwrap();
        file.flush().unwrap();

        let args = RenderArgs {
            prompt: PromptArgs {
                messages: file.path().to_path_buf(),
                profile: None,
                agent_name: Some("Bob".to_string()),
                agent_role: Some("a helper".to_string()),
                goals: vec!["Say hello".to_string()],
            },
        };

        let result = render(&args, &Config::default()).unwrap();
        assert_eq!(result.format, "monolithic");
        assert!(result.prompt.starts_with("You are Bob, a helper"));
        assert!(result.prompt.contains("1. Say hello"));
        assert!(result.prompt.ends_with("Bob: "));
        assert_eq!(result.to_json()["format"], "monolithic");
    }
}
