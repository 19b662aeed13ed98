//! Profile-driven prompt builder.
//!
//! Rebuilds an agent's chat conversation into one monolithic prompt string:
//! profile sections, agent identity and goals, dynamic content mined from the
//! upstream system message, then the conversation history.
//!
//! The capture patterns below are a contract with whatever produces the
//! system message. If the upstream prompt wording changes, the OS
//! description and command list silently drop out of the rebuilt prompt.

use regex::Regex;
use tracing::debug;

use crate::domain::errors::{PromptError, PromptResult};
use crate::domain::models::{AgentState, Message, PromptProfile};
use crate::services::text::{
    attribution, flatten, inline_list, numbered_list, unescape_newlines,
};

/// Captures the OS description from the upstream system message.
pub const OS_PATTERN: &str = r"(?s)The OS you are running on is:(.*?)\n\nGOALS";

/// Captures the command listing from the upstream system message.
pub const COMMANDS_PATTERN: &str = r"(?s)Commands:(.*?)Resources:";

/// Leading `<number>.` markers inside a flattened command listing. A marker
/// followed by a digit is a decimal and does not split.
const COMMAND_NUMBER_PATTERN: &str = r"(?:^|\s)\d+\.";

/// System messages starting with this (after flattening) are agent prompts.
const AGENT_PROMPT_PREFIX: &str = "You are";

/// Builds monolithic prompts from a profile, agent state and conversation.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    os_pattern: Regex,
    commands_pattern: Regex,
    command_number_pattern: Regex,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new() -> Self {
        Self {
            os_pattern: Regex::new(OS_PATTERN).unwrap(),
            commands_pattern: Regex::new(COMMANDS_PATTERN).unwrap(),
            command_number_pattern: Regex::new(COMMAND_NUMBER_PATTERN).unwrap(),
        }
    }

    /// Build the prompt string for `messages`.
    ///
    /// The first message is the system message. When it is not an agent
    /// prompt the conversation is returned flattened and attributed, without
    /// any template rebuilding.
    pub fn build(
        &self,
        profile: &PromptProfile,
        agent: &AgentState,
        messages: &[Message],
    ) -> PromptResult<String> {
        let (system, history) = messages
            .split_first()
            .ok_or(PromptError::EmptyConversation)?;

        if !is_agent_system_prompt(&system.content) {
            debug!("system message is not an agent prompt, rendering plain conversation");
            return Ok(conversation(messages, &profile.send_as));
        }
        debug!(
            messages = messages.len(),
            "system message is an agent prompt, rebuilding from profile"
        );

        let mut prompt = unescape_newlines(&profile.prescript);
        prompt.push_str(&attribution(&unescape_newlines(&profile.send_as)));
        prompt.push_str(&self.agent_profile(profile, agent, &system.content));
        prompt.push_str(&constraints(profile));
        prompt.push_str(&self.commands(profile, &system.content));
        prompt.push_str(&resources(profile));
        prompt.push_str(&performance_evaluation(profile));
        prompt.push_str(&response_format(profile));
        prompt.push_str(&history_section(profile, history));

        if !profile.postscript.trim().is_empty() {
            prompt.push_str(&attribution(&unescape_newlines(&profile.send_as)));
            prompt.push_str(&unescape_newlines(&profile.postscript));
            prompt.push_str("\n\n");
        }
        prompt.push_str(&reply_cue(profile, agent));

        Ok(prompt)
    }

    /// Lead-in, identity, guidance, OS description and goals.
    fn agent_profile(&self, profile: &PromptProfile, agent: &AgentState, system: &str) -> String {
        let strings = &profile.strings;
        let goals: Vec<&str> = agent.goals.iter().map(|goal| goal.trim()).collect();

        let mut section = unescape_newlines(&strings.lead_in);
        section.push_str(&agent.name);
        section.push_str(", ");
        section.push_str(&unescape_newlines(&agent.role));
        section.push_str(&unescape_newlines(&inline_list(&strings.general_guidance)));
        section.push_str(&unescape_newlines(&strings.os_prompt));
        section.push_str(&self.extract(&self.os_pattern, system, "os"));
        section.push_str(&unescape_newlines(&strings.goal_label));
        section.push_str(&unescape_newlines(&inline_list(&strings.goals)));
        section.push_str(&numbered_list(&goals));
        section
    }

    /// Commands label plus the command list recovered from the system message.
    fn commands(&self, profile: &PromptProfile, system: &str) -> String {
        let listing = self.extract(&self.commands_pattern, system, "commands");
        let commands = self.split_commands(&listing);

        let mut section = unescape_newlines(&profile.strings.commands_label);
        section.push_str(&numbered_list(&commands));
        section
    }

    /// Split a flattened listing on its `<number>.` markers.
    fn split_commands<'a>(&self, listing: &'a str) -> Vec<&'a str> {
        let mut commands = Vec::new();
        let mut start = 0;
        for marker in self.command_number_pattern.find_iter(listing) {
            let decimal = listing[marker.end()..].starts_with(|c: char| c.is_ascii_digit());
            if decimal {
                continue;
            }
            commands.push(&listing[start..marker.start()]);
            start = marker.end();
        }
        commands.push(&listing[start..]);

        commands
            .into_iter()
            .map(str::trim)
            .filter(|command| !command.is_empty())
            .collect()
    }

    /// First capture group of `pattern` in `source`, trimmed and flattened.
    fn extract(&self, pattern: &Regex, source: &str, what: &str) -> String {
        match pattern.captures(source).and_then(|captures| captures.get(1)) {
            Some(capture) => flatten(capture.as_str()),
            None => {
                debug!(section = what, "pattern did not match the system message");
                String::new()
            }
        }
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a system message is an agent prompt that can be rebuilt.
pub fn is_agent_system_prompt(content: &str) -> bool {
    flatten(content).starts_with(AGENT_PROMPT_PREFIX)
}

/// Render messages as `"{name}: {flattened content}\n\n"` lines.
pub fn conversation(messages: &[Message], send_as: &str) -> String {
    let name = attribution(&unescape_newlines(send_as));
    messages
        .iter()
        .map(|message| format!("{name}{}\n\n", flatten(&message.content)))
        .collect()
}

/// `"{name}: "` cue inviting the model to answer as the agent.
pub fn reply_cue(profile: &PromptProfile, agent: &AgentState) -> String {
    if profile.ai_name.is_empty() {
        attribution(&agent.name)
    } else {
        attribution(&unescape_newlines(&profile.ai_name))
    }
}

fn constraints(profile: &PromptProfile) -> String {
    labeled_list(
        &profile.strings.constraints_label,
        &profile.strings.constraints,
    )
}

fn resources(profile: &PromptProfile) -> String {
    labeled_list(&profile.strings.resources_label, &profile.strings.resources)
}

fn performance_evaluation(profile: &PromptProfile) -> String {
    labeled_list(
        &profile.strings.performance_eval_label,
        &profile.strings.performance_eval,
    )
}

fn labeled_list(label: &str, items: &[String]) -> String {
    let mut section = unescape_newlines(label);
    section.push_str(&unescape_newlines(&numbered_list(items)));
    section
}

/// Label, pre-prompt, the format template itself, post-prompt.
fn response_format(profile: &PromptProfile) -> String {
    let strings = &profile.strings;
    let template = match profile.response_format() {
        Some(serde_json::Value::String(raw)) => raw.clone(),
        Some(value) => serde_json::to_string(value).unwrap_or_default(),
        None => String::new(),
    };

    let mut section = unescape_newlines(&strings.response_format_label);
    section.push_str(&unescape_newlines(&strings.response_format_pre_prompt));
    section.push_str(&template);
    section.push_str(&unescape_newlines(&strings.response_format_post_prompt));
    section
}

/// History after the system message, minus the configured trailing messages,
/// wrapped in the profile's history markers.
fn history_section(profile: &PromptProfile, history: &[Message]) -> String {
    let keep = history.len().saturating_sub(profile.strip_messages_from_end);
    let history = &history[..keep];

    if history.is_empty() {
        return unescape_newlines(&profile.history_none);
    }

    let mut section = unescape_newlines(&profile.history_start);
    section.push_str(&conversation(history, &profile.send_as));
    section.push_str(&unescape_newlines(&profile.history_end));
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ProfileStrings;

    const SYSTEM: &str = "You are Bob, an assistant.\n\nThe OS you are running on is: Ubuntu 22.04\n   LTS\n\nGOALS:\n\n1. Do X\n\nCommands:\n1. search: \"search\", args: \"query\"\n2. write\n\nResources:\n1. Internet";

    fn agent() -> AgentState {
        AgentState::new("Bob", "an assistant").with_goal("  Do X  ")
    }

    #[test]
    fn test_detects_agent_prompt_after_flattening() {
        assert!(is_agent_system_prompt("\n\n   You are\nBob"));
        assert!(!is_agent_system_prompt("Pretend you are a pirate"));
        assert!(!is_agent_system_prompt(""));
    }

    #[test]
    fn test_extracts_os_description() {
        let builder = PromptBuilder::new();
        let profile = PromptProfile {
            strings: ProfileStrings {
                os_prompt: "OS: ".to_string(),
                ..ProfileStrings::default()
            },
            ..PromptProfile::default()
        };

        let section = builder.agent_profile(&profile, &agent(), SYSTEM);
        assert_eq!(section, "Bob, an assistantOS: Ubuntu 22.04 LTS1. Do X\n");
    }

    #[test]
    fn test_commands_are_renumbered() {
        let builder = PromptBuilder::new();
        let profile = PromptProfile {
            strings: ProfileStrings {
                commands_label: "Commands:\n".to_string(),
                ..ProfileStrings::default()
            },
            ..PromptProfile::default()
        };

        assert_eq!(
            builder.commands(&profile, SYSTEM),
            "Commands:\n1. search: \"search\", args: \"query\"\n2. write\n"
        );
    }

    #[test]
    fn test_command_numbers_inside_words_do_not_split() {
        let builder = PromptBuilder::new();
        let system = "You are X\n\nCommands:\n1. install v2.0 package\n2. run\n\nResources:";
        let section = builder.commands(&PromptProfile::default(), system);
        assert_eq!(section, "1. install v2.0 package\n2. run\n");
    }

    #[test]
    fn test_command_markers_without_space_split() {
        let builder = PromptBuilder::new();
        assert_eq!(builder.split_commands("1.search 2.write"), vec!["search", "write"]);
        assert_eq!(
            builder.split_commands("1. wait 1.5 seconds 2. run"),
            vec!["wait 1.5 seconds", "run"]
        );
    }

    #[test]
    fn test_missing_patterns_contribute_nothing() {
        let builder = PromptBuilder::new();
        let profile = PromptProfile::default();
        assert_eq!(builder.commands(&profile, "You are nobody"), "");
        assert_eq!(
            builder.agent_profile(&profile, &AgentState::new("A", "r"), "You are nobody"),
            "A, r"
        );
    }

    #[test]
    fn test_history_strip_and_markers() {
        let profile = PromptProfile {
            history_start: "<history>\n".to_string(),
            history_end: "</history>\n".to_string(),
            history_none: "(no history)\n".to_string(),
            strip_messages_from_end: 1,
            ..PromptProfile::default()
        };
        let history = vec![Message::user("first"), Message::assistant("second")];

        assert_eq!(
            history_section(&profile, &history),
            "<history>\nfirst\n\n</history>\n"
        );
        assert_eq!(history_section(&profile, &history[..1]), "(no history)\n");
    }

    #[test]
    fn test_strip_count_larger_than_history() {
        let profile = PromptProfile {
            strip_messages_from_end: 10,
            history_none: "none".to_string(),
            ..PromptProfile::default()
        };
        assert_eq!(history_section(&profile, &[Message::user("x")]), "none");
    }

    #[test]
    fn test_response_format_section() {
        let profile = PromptProfile {
            response_format: Some(serde_json::json!({"command": {"name": ""}})),
            strings: ProfileStrings {
                response_format_label: "FORMAT:\\n".to_string(),
                response_format_post_prompt: "\nOK".to_string(),
                ..ProfileStrings::default()
            },
            ..PromptProfile::default()
        };
        assert_eq!(
            response_format(&profile),
            "FORMAT:\n{\"command\":{\"name\":\"\"}}\nOK"
        );
    }

    #[test]
    fn test_string_template_is_rendered_raw() {
        let profile = PromptProfile {
            response_format: Some(serde_json::json!("plan_summary: ...\\n")),
            ..PromptProfile::default()
        };
        assert_eq!(response_format(&profile), "plan_summary: ...\\n");
    }

    #[test]
    fn test_prescript_postscript_and_cue() {
        let builder = PromptBuilder::new();
        let profile = PromptProfile {
            prescript: "PRE\n".to_string(),
            postscript: "Continue.".to_string(),
            send_as: "USER".to_string(),
            ai_name: "ASSISTANT".to_string(),
            ..PromptProfile::default()
        };
        let messages = vec![Message::system("You are Bob"), Message::user("hi")];

        let prompt = builder.build(&profile, &agent(), &messages).unwrap();
        assert!(prompt.starts_with("PRE\nUSER: Bob, an assistant"));
        assert!(prompt.ends_with("USER: hi\n\nUSER: Continue.\n\nASSISTANT: "));
    }

    #[test]
    fn test_empty_conversation_is_rejected() {
        let builder = PromptBuilder::new();
        let result = builder.build(&PromptProfile::default(), &agent(), &[]);
        assert!(matches!(result, Err(PromptError::EmptyConversation)));
    }
}
