//! Chat messages exchanged with the agent framework.

use serde::{Deserialize, Serialize};

/// A single chat message.
///
/// Conversations are ordered slices of messages; the first entry is always
/// treated as the system message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author role (`system`, `user`, `assistant`, ...)
    pub role: String,

    /// Message body
    #[serde(default)]
    pub content: String,
}

impl Message {
    /// Create a message with an arbitrary role.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a `system` message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    /// Create a `user` message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create an `assistant` message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        assert_eq!(Message::system("a").role, "system");
        assert_eq!(Message::user("b").role, "user");
        assert_eq!(Message::assistant("c").content, "c");
    }

    #[test]
    fn test_message_missing_content_defaults_empty() {
        let msg: Message = serde_json::from_str(r#"{"role": "user"}"#).unwrap();
        assert_eq!(msg.content, "");
    }
}
