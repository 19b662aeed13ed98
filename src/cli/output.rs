//! Output formatting utilities for the CLI.

use serde::Serialize;

use crate::domain::models::NormalizedResponse;

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// A normalized reply as printed by `normalize` and `complete`.
#[derive(Debug, Serialize)]
pub struct ResponseOutput {
    /// Whether the reply was recovered into the structured format
    pub normalized: bool,
    /// Structured response, or the raw reply when not normalized
    pub response: serde_json::Value,
}

impl From<&NormalizedResponse> for ResponseOutput {
    fn from(response: &NormalizedResponse) -> Self {
        match response {
            NormalizedResponse::Structured(structured) => Self {
                normalized: true,
                response: serde_json::to_value(structured).unwrap_or_default(),
            },
            NormalizedResponse::Raw(raw) => Self {
                normalized: false,
                response: serde_json::Value::String(raw.clone()),
            },
        }
    }
}

impl CommandOutput for ResponseOutput {
    fn to_human(&self) -> String {
        match &self.response {
            serde_json::Value::String(raw) if !self.normalized => raw.clone(),
            value => serde_json::to_string_pretty(value).unwrap_or_default(),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "normalized": self.normalized,
            "response": self.response,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::StructuredResponse;

    #[test]
    fn test_response_output_structured() {
        let mut structured = StructuredResponse::default();
        structured.command.name = "noop".to_string();
        let output = ResponseOutput::from(&NormalizedResponse::Structured(structured));

        assert!(output.normalized);
        assert_eq!(output.to_json()["response"]["command"]["name"], "noop");
        assert!(output.to_human().contains("\"noop\""));
    }

    #[test]
    fn test_response_output_raw() {
        let output = ResponseOutput::from(&NormalizedResponse::Raw("plain text".to_string()));

        assert!(!output.normalized);
        assert_eq!(output.to_human(), "plain text");
        assert_eq!(output.to_json()["response"], "plain text");
    }
}
