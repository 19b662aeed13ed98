//! Reply shapes: the structured contract handed back to the agent framework
//! and the friendlier "simple" shape models often produce instead.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The `thoughts` + `command` object the agent framework consumes.
///
/// Every field is always present; recovered replies leave what they could
/// not find empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredResponse {
    #[serde(default)]
    pub thoughts: Thoughts,

    #[serde(default)]
    pub command: Command,
}

/// Reasoning half of a [`StructuredResponse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thoughts {
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub reasoning: String,

    /// Bulleted plan, one `" - item"` line per step
    #[serde(default)]
    pub plan: String,

    #[serde(default)]
    pub criticism: String,

    /// Summary meant to be spoken to the user
    #[serde(default)]
    pub speak: String,
}

/// Command half of a [`StructuredResponse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub args: BTreeMap<String, String>,
}

impl StructuredResponse {
    /// Serialize to the JSON string handed back to the framework.
    pub fn to_json(&self) -> String {
        // Only string fields and string maps; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Keys that identify a [`SimpleResponse`] in a parsed reply.
///
/// `reasoning` and `args` are shared with other shapes and do not count.
pub const SIMPLE_RESPONSE_KEYS: [&str; 6] = [
    "plan_summary",
    "next_steps",
    "considerations",
    "tts_msg",
    "command_name",
    "command_args",
];

/// Alternate reply shape:
/// `{plan_summary, reasoning, next_steps, considerations, tts_msg, command_name, args}`.
///
/// Values are kept untyped because models emit strings, lists and mappings
/// interchangeably for the same key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimpleResponse {
    #[serde(default)]
    pub plan_summary: Option<Value>,

    #[serde(default)]
    pub reasoning: Option<Value>,

    #[serde(default)]
    pub next_steps: Option<Value>,

    #[serde(default)]
    pub considerations: Option<Value>,

    #[serde(default)]
    pub tts_msg: Option<Value>,

    #[serde(default)]
    pub command_name: Option<Value>,

    /// Sequence of `{name, value}` pairs, or a plain mapping
    #[serde(default, alias = "command_args")]
    pub args: Option<Value>,
}

impl SimpleResponse {
    /// Whether a parsed mapping looks like a simple response.
    pub fn is_simple_shape(map: &serde_json::Map<String, Value>) -> bool {
        SIMPLE_RESPONSE_KEYS.iter().any(|key| map.contains_key(*key))
    }
}

/// One `{name, value}` entry of a simple response's `args`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleArg {
    pub name: String,
    pub value: Value,
}

/// Outcome of normalizing a model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedResponse {
    /// The reply was recovered, fully or partially
    Structured(StructuredResponse),
    /// Normalization was not possible; the original reply, unchanged
    Raw(String),
}

impl NormalizedResponse {
    /// The structured response, if normalization succeeded.
    pub const fn as_structured(&self) -> Option<&StructuredResponse> {
        match self {
            Self::Structured(response) => Some(response),
            Self::Raw(_) => None,
        }
    }

    /// Text returned to the agent framework.
    pub fn reply_text(&self) -> String {
        match self {
            Self::Structured(response) => response.to_json(),
            Self::Raw(raw) => raw.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_defaults_fill_missing_fields() {
        let response: StructuredResponse =
            serde_json::from_str(r#"{"command": {"name": "noop"}}"#).unwrap();
        assert_eq!(response.command.name, "noop");
        assert!(response.command.args.is_empty());
        assert_eq!(response.thoughts, Thoughts::default());
    }

    #[test]
    fn test_reply_text() {
        let raw = NormalizedResponse::Raw("nope".to_string());
        assert_eq!(raw.reply_text(), "nope");
        assert!(raw.as_structured().is_none());

        let structured = NormalizedResponse::Structured(StructuredResponse::default());
        let text = structured.reply_text();
        assert!(text.contains("\"thoughts\""));
        assert!(text.contains("\"args\":{}"));
    }

    #[test]
    fn test_simple_shape_detection() {
        let map = serde_json::json!({"plan_summary": "x"});
        assert!(SimpleResponse::is_simple_shape(map.as_object().unwrap()));

        let map = serde_json::json!({"reasoning": "x", "args": []});
        assert!(!SimpleResponse::is_simple_shape(map.as_object().unwrap()));
    }

    #[test]
    fn test_command_args_alias() {
        let simple: SimpleResponse =
            serde_json::from_str(r#"{"command_args": [{"name": "q", "value": "x"}]}"#).unwrap();
        assert!(simple.args.is_some());
    }
}
