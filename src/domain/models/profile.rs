//! Prompt profile: the user-supplied description of the monolithic template.
//!
//! Profiles are advisory. Every key is optional, and a key holding a value of
//! the wrong shape deserializes to its empty default instead of failing the
//! whole document, so a partially broken profile still renders.

use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};

/// Which prompt layout a profile asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    /// Single flattened prompt rebuilt from profile sections
    #[default]
    Monolithic,
    /// Plain attributed conversation
    Conversation,
}

impl TemplateType {
    /// Parse a `template_type` value. Blank selects the default layout and
    /// any unrecognized name falls back to the conversation layout.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() || name.eq_ignore_ascii_case("monolithic") {
            Self::Monolithic
        } else {
            Self::Conversation
        }
    }
}

/// Prompt profile loaded once per session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PromptProfile {
    /// Prompt layout
    #[serde(default, deserialize_with = "lenient::template_type")]
    pub template_type: TemplateType,

    /// Text prepended to the whole assembled prompt
    #[serde(default, deserialize_with = "lenient::text")]
    pub prescript: String,

    /// Text appended after the history section
    #[serde(default, deserialize_with = "lenient::text")]
    pub postscript: String,

    /// Display name used to attribute prompt text and history lines
    #[serde(default, deserialize_with = "lenient::text")]
    pub send_as: String,

    /// Name the model should answer as; falls back to the agent name
    #[serde(default, deserialize_with = "lenient::text")]
    pub ai_name: String,

    /// Number of trailing history messages to leave out
    #[serde(default, deserialize_with = "lenient::count")]
    pub strip_messages_from_end: usize,

    /// Marker placed before a non-empty history
    #[serde(default, deserialize_with = "lenient::text")]
    pub history_start: String,

    /// Marker placed after a non-empty history
    #[serde(default, deserialize_with = "lenient::text")]
    pub history_end: String,

    /// Marker used in place of an empty history
    #[serde(default, deserialize_with = "lenient::text")]
    pub history_none: String,

    /// Response-format template, rendered into the prompt verbatim
    #[serde(
        default,
        deserialize_with = "lenient::template",
        skip_serializing_if = "Option::is_none"
    )]
    pub response_format: Option<serde_json::Value>,

    /// Section labels and literal content
    #[serde(default, deserialize_with = "lenient::section")]
    pub strings: ProfileStrings,
}

/// Labels and literal lists for each prompt section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProfileStrings {
    #[serde(default, deserialize_with = "lenient::text")]
    pub lead_in: String,

    #[serde(default, deserialize_with = "lenient::list")]
    pub general_guidance: Vec<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub os_prompt: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub goal_label: String,

    /// Extra goal text placed before the agent's numbered goals
    #[serde(default, deserialize_with = "lenient::list")]
    pub goals: Vec<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub constraints_label: String,

    #[serde(default, deserialize_with = "lenient::list")]
    pub constraints: Vec<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub commands_label: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub resources_label: String,

    #[serde(default, deserialize_with = "lenient::list")]
    pub resources: Vec<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub performance_eval_label: String,

    #[serde(default, deserialize_with = "lenient::list")]
    pub performance_eval: Vec<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub response_format_label: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub response_format_pre_prompt: String,

    /// Older profiles keep the template here instead of at the top level
    #[serde(
        default,
        deserialize_with = "lenient::template",
        skip_serializing_if = "Option::is_none"
    )]
    pub response_format: Option<serde_json::Value>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub response_format_post_prompt: String,
}

impl PromptProfile {
    /// The response-format template, preferring the top-level key.
    pub fn response_format(&self) -> Option<&serde_json::Value> {
        self.response_format
            .as_ref()
            .or(self.strings.response_format.as_ref())
    }

    /// Profile used when none is configured or the configured one is unreadable.
    pub fn builtin() -> Self {
        Self {
            template_type: TemplateType::Monolithic,
            strings: ProfileStrings {
                lead_in: "You are ".to_string(),
                goal_label: "\n\nGOALS:\n\n".to_string(),
                constraints_label: "\nConstraints:\n".to_string(),
                constraints: to_strings(&[
                    "~4000 word limit for short term memory. Your short term memory is short, so immediately save important information to files.",
                    "If you are unsure how you previously did something or want to recall past events, thinking about similar events will help you remember.",
                    "No user assistance",
                    "Exclusively use the commands listed in double quotes e.g. \"command name\"",
                ]),
                commands_label: "\nCommands:\n".to_string(),
                resources_label: "\nResources:\n".to_string(),
                resources: to_strings(&[
                    "Internet access for searches and information gathering.",
                    "Long Term memory management.",
                    "GPT-3.5 powered Agents for delegation of simple tasks.",
                ]),
                performance_eval_label: "\nPerformance Evaluation:\n".to_string(),
                performance_eval: to_strings(&[
                    "Continuously review and analyze your actions to ensure you are performing to the best of your abilities.",
                    "Constructively self-criticize your big-picture behavior constantly.",
                    "Reflect on past decisions and strategies to refine your approach.",
                    "Every command has a cost, so be smart and efficient. Aim to complete tasks in the least number of steps.",
                    "Write all code to a file.",
                ]),
                response_format_pre_prompt:
                    "\nYou should only respond in JSON format as described below \nResponse Format: \n"
                        .to_string(),
                response_format_post_prompt:
                    " \nEnsure the response can be parsed by Python json.loads".to_string(),
                ..ProfileStrings::default()
            },
            response_format: Some(serde_json::json!({
                "thoughts": {
                    "text": "thought",
                    "reasoning": "reasoning",
                    "plan": "- short bulleted\n- list that conveys\n- long-term plan",
                    "criticism": "constructive self-criticism",
                    "speak": "thoughts summary to say to user"
                },
                "command": {
                    "name": "command name",
                    "args": {
                        "arg name": "value"
                    }
                }
            })),
            history_start: "\n\n".to_string(),
            history_none: "\n\n".to_string(),
            ..Self::default()
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

/// Deserializers that never reject a value; shapes they cannot use become
/// the field's empty default.
mod lenient {
    use super::{Deserialize, Deserializer, IgnoredAny, TemplateType};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Integer(i64),
        Float(f64),
        Flag(bool),
        Other(IgnoredAny),
    }

    impl Scalar {
        fn into_text(self) -> Option<String> {
            match self {
                Self::Text(text) => Some(text),
                Self::Integer(n) => Some(n.to_string()),
                Self::Float(n) => Some(n.to_string()),
                Self::Flag(b) => Some(b.to_string()),
                Self::Other(_) => None,
            }
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextList {
        Items(Vec<Scalar>),
        Single(Scalar),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Shaped<T> {
        Valid(T),
        Other(IgnoredAny),
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(Scalar::deserialize(deserializer)?
            .into_text()
            .unwrap_or_default())
    }

    pub fn list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        Ok(match TextList::deserialize(deserializer)? {
            TextList::Items(items) => items.into_iter().filter_map(Scalar::into_text).collect(),
            TextList::Single(item) => item.into_text().into_iter().collect(),
        })
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
        Ok(match Scalar::deserialize(deserializer)? {
            Scalar::Integer(n) => usize::try_from(n).unwrap_or(0),
            Scalar::Float(n) if n.is_finite() && n > 0.0 => n as usize,
            Scalar::Text(text) => text.trim().parse().unwrap_or(0),
            _ => 0,
        })
    }

    pub fn template_type<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<TemplateType, D::Error> {
        let name = text(deserializer)?;
        Ok(TemplateType::from_name(&name))
    }

    pub fn template<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<serde_json::Value>, D::Error> {
        Ok(match Shaped::<serde_json::Value>::deserialize(deserializer)? {
            Shaped::Valid(serde_json::Value::Null) | Shaped::Other(_) => None,
            Shaped::Valid(value) => Some(value),
        })
    }

    pub fn section<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(match Shaped::<T>::deserialize(deserializer)? {
            Shaped::Valid(value) => value,
            Shaped::Other(_) => T::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let profile: PromptProfile = serde_yaml::from_str("{}").unwrap();
        assert_eq!(profile, PromptProfile::default());
        assert_eq!(profile.template_type, TemplateType::Monolithic);
    }

    #[test]
    fn test_yaml_profile_parsing() {
        let yaml = r####"
template_type: monolithic
send_as: "### Instruction"
strip_messages_from_end: 2
strings:
  lead_in: "You are "
  constraints:
    - be safe
    - be brief
"####;
        let profile: PromptProfile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(profile.send_as, "### Instruction");
        assert_eq!(profile.strip_messages_from_end, 2);
        assert_eq!(profile.strings.constraints, vec!["be safe", "be brief"]);
    }

    #[test]
    fn test_malformed_fields_fall_back_to_defaults() {
        let yaml = r"
prescript:
  nested: map
strip_messages_from_end: lots
strings: just a string
";
        let profile: PromptProfile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(profile.prescript, "");
        assert_eq!(profile.strip_messages_from_end, 0);
        assert_eq!(profile.strings, ProfileStrings::default());
    }

    #[test]
    fn test_scalar_coercions() {
        let yaml = r#"
postscript: 42
strip_messages_from_end: "3"
strings:
  resources: single resource
  performance_eval: [1, true, {skip: me}, text]
"#;
        let profile: PromptProfile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(profile.postscript, "42");
        assert_eq!(profile.strip_messages_from_end, 3);
        assert_eq!(profile.strings.resources, vec!["single resource"]);
        assert_eq!(profile.strings.performance_eval, vec!["1", "true", "text"]);
    }

    #[test]
    fn test_template_type_fallback() {
        assert_eq!(TemplateType::from_name("Monolithic"), TemplateType::Monolithic);
        assert_eq!(TemplateType::from_name(""), TemplateType::Monolithic);
        assert_eq!(TemplateType::from_name("segmented"), TemplateType::Conversation);

        let profile: PromptProfile = serde_json::from_str(r#"{"template_type": "chat"}"#).unwrap();
        assert_eq!(profile.template_type, TemplateType::Conversation);
    }

    #[test]
    fn test_response_format_lookup_prefers_top_level() {
        let mut profile = PromptProfile::default();
        assert!(profile.response_format().is_none());

        profile.strings.response_format = Some(serde_json::json!("nested"));
        assert_eq!(profile.response_format(), Some(&serde_json::json!("nested")));

        profile.response_format = Some(serde_json::json!("top"));
        assert_eq!(profile.response_format(), Some(&serde_json::json!("top")));
    }

    #[test]
    fn test_builtin_profile() {
        let profile = PromptProfile::builtin();
        assert_eq!(profile.strings.lead_in, "You are ");
        assert_eq!(profile.strings.constraints.len(), 4);
        assert!(profile.response_format().is_some());
    }
}
