//! Agent identity supplied by the host framework.

use serde::{Deserialize, Serialize};

/// Name, role and goals of the agent a prompt is built for.
///
/// Read-only from the prompt builder's perspective; callers thread it
/// explicitly instead of relying on global settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AgentState {
    /// Agent name, e.g. "Entrepreneur-GPT"
    #[serde(default)]
    pub name: String,

    /// One-line description of the agent's role
    #[serde(default)]
    pub role: String,

    /// Ordered goals
    #[serde(default)]
    pub goals: Vec<String>,
}

impl AgentState {
    /// Create an agent state with no goals.
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            goals: Vec::new(),
        }
    }

    /// Append a goal.
    #[must_use]
    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goals.push(goal.into());
        self
    }
}
