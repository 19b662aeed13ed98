//! String helpers shared by the prompt builder and the response normalizer.

use serde_json::Value;

/// Collapse every whitespace run, newlines included, into a single space.
pub fn flatten(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turn literal `\n` escape sequences into real newlines.
pub fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// `"{n}. {item}\n"` for each item, numbered from 1.
pub fn numbered_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}\n", i + 1, item.as_ref()))
        .collect()
}

/// Each item followed by a single space, on one line.
pub fn inline_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| format!("{} ", item.as_ref()))
        .collect()
}

/// `"{name}: "`, or nothing when there is no name to attribute to.
pub fn attribution(name: &str) -> String {
    if name.is_empty() {
        String::new()
    } else {
        format!("{name}: ")
    }
}

/// Render a JSON value as plain text: strings unquoted, null as empty,
/// everything else as compact JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string(value).unwrap_or_default()
        }
    }
}

/// Coerce a string, list or mapping into `" - item\n"` bullet lines.
///
/// Strings are split on dash-led words, lists give one bullet per item and
/// mappings one `key: value` bullet per entry. Other scalars become a single
/// bullet.
pub fn bullet_list(value: &Value) -> String {
    let items: Vec<String> = match value {
        Value::Null => Vec::new(),
        Value::String(text) => dash_segments(text),
        Value::Array(items) => items.iter().map(value_text).collect(),
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| format!("{key}: {}", value_text(value)))
            .collect(),
        Value::Bool(_) | Value::Number(_) => vec![value.to_string()],
    };

    items.iter().map(|item| format!(" - {item}\n")).collect()
}

/// Split prose like `"- first step - second step"` into its dash-delimited
/// segments. Hyphens inside words do not split.
fn dash_segments(text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in text.split_whitespace() {
        if word.starts_with('-') {
            if !current.is_empty() {
                segments.push(current.join(" "));
                current.clear();
            }
            let rest = word.trim_start_matches('-');
            if !rest.is_empty() {
                current.push(rest);
            }
        } else {
            current.push(word);
        }
    }
    if !current.is_empty() {
        segments.push(current.join(" "));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten() {
        assert_eq!(flatten("  a\n\n b\t c  "), "a b c");
        assert_eq!(flatten("\n \t"), "");
    }

    #[test]
    fn test_numbered_list() {
        assert_eq!(numbered_list(&["a", "b"]), "1. a\n2. b\n");
        assert_eq!(numbered_list::<&str>(&[]), "");
    }

    #[test]
    fn test_inline_list_and_attribution() {
        assert_eq!(inline_list(&["one", "two"]), "one two ");
        assert_eq!(attribution("Bob"), "Bob: ");
        assert_eq!(attribution(""), "");
    }

    #[test]
    fn test_unescape_newlines() {
        assert_eq!(unescape_newlines(r"GOALS:\n\n"), "GOALS:\n\n");
    }

    #[test]
    fn test_bullet_list_from_string() {
        assert_eq!(
            bullet_list(&json!("- search the web - write a well-known summary")),
            " - search the web\n - write a well-known summary\n"
        );
        assert_eq!(bullet_list(&json!("just one step")), " - just one step\n");
        assert_eq!(bullet_list(&json!("")), "");
    }

    #[test]
    fn test_bullet_list_from_list_and_map() {
        assert_eq!(bullet_list(&json!(["a", 2])), " - a\n - 2\n");
        assert_eq!(
            bullet_list(&json!({"first": "look", "then": "leap"})),
            " - first: look\n - then: leap\n"
        );
        assert_eq!(bullet_list(&json!(null)), "");
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!("x")), "x");
        assert_eq!(value_text(&json!(null)), "");
        assert_eq!(value_text(&json!(3)), "3");
        assert_eq!(value_text(&json!({"a": 1})), r#"{"a":1}"#);
    }
}
