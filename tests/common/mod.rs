//! Common test utilities for integration tests
//!
//! Shared fixtures for the prompt builder, normalizer and transport tests.

#![allow(dead_code)]

use textgen_bridge::domain::models::{AgentState, Message, ProfileStrings, PromptProfile};

/// Upstream agent system message with OS, goals, commands and resources.
pub const AGENT_SYSTEM_PROMPT: &str = "You are Bob, an assistant.\n\n\
The OS you are running on is: Ubuntu 22.04\n\n\
GOALS:\n\n1. Do X\n\n\
Commands:\n1. search\n2. write\n\n\
Resources:\n1. Internet access";

/// Agent matching [`AGENT_SYSTEM_PROMPT`].
pub fn agent() -> AgentState {
    AgentState::new("Bob", "an assistant").with_goal("Do X")
}

/// System message plus one user turn.
pub fn agent_conversation() -> Vec<Message> {
    vec![Message::system(AGENT_SYSTEM_PROMPT), Message::user("hi")]
}

/// Profile with every section labeled, so sections are easy to locate.
pub fn labeled_profile() -> PromptProfile {
    PromptProfile {
        send_as: "USER".to_string(),
        ai_name: "ASSISTANT".to_string(),
        history_start: "\\n--HISTORY--\\n".to_string(),
        history_end: "--END HISTORY--\\n".to_string(),
        strings: ProfileStrings {
            lead_in: "You are ".to_string(),
            os_prompt: "\\nOS: ".to_string(),
            goal_label: "\\nGOALS:\\n".to_string(),
            constraints_label: "\\nCONSTRAINTS:\\n".to_string(),
            constraints: vec!["be safe".to_string()],
            commands_label: "\\nCOMMANDS:\\n".to_string(),
            resources_label: "\\nRESOURCES:\\n".to_string(),
            ..ProfileStrings::default()
        },
        ..PromptProfile::default()
    }
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
