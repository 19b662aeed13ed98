//! Response normalizer.
//!
//! Recovers a [`StructuredResponse`] from raw model output. Local models
//! rarely produce clean JSON, so the reply is run through progressively
//! looser strategies until one succeeds:
//!
//! 1. strict JSON (after stripping a markdown code fence)
//! 2. simple-response coercion for the `plan_summary`/`command_name` shape
//! 3. text cleanup of human-labeled replies followed by a YAML parse, then a
//!    field-by-field parse when the document as a whole is not valid YAML
//! 4. per-field regex recovery of quoted `"key": "value"` pairs
//!
//! The last stage cannot fail, so every reply comes back structured; fields
//! nothing could recover are left empty.

use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::domain::errors::NormalizeError;
use crate::domain::models::{
    NormalizedResponse, SimpleArg, SimpleResponse, StructuredResponse,
};
use crate::services::text::{bullet_list, flatten, value_text};

const TEMPLATE_START: &str = "--START TEMPLATE--";
const TEMPLATE_END: &str = "--END TEMPLATE--";

/// Field every cleaned-up reply must start with.
const PRIMARY_FIELD: &str = "plan_summary";

/// Field whose block value may be a bare `key: value` mapping.
const ARGS_FIELD: &str = "args";

/// Human-readable labels and the canonical field token they map to.
const FIELD_LABELS: [(&str, &str); 7] = [
    (r"(?i)plan[ _]summary\s*:", "plan_summary:"),
    (r"(?i)\breasoning\s*:", "reasoning:"),
    (r"(?i)next[ _]steps\s*:", "next_steps:"),
    (r"(?i)\bconsiderations\s*:", "considerations:"),
    (r"(?i)tts[ _]msg\s*:|tts[ _]message\s*:", "tts_msg:"),
    (r"(?i)command[ _]name\s*:", "command_name:"),
    (r"(?i)\b(?:command[ _])?args\s*:", "args:"),
];

/// Canonical tokens that must start a line.
const FIELD_TOKENS: &str =
    "plan_summary|reasoning|next_steps|considerations|tts_msg|command_name|args";

/// Characters YAML reads as syntax at the start of a plain scalar.
const YAML_INDICATORS: [char; 9] = ['*', '&', '!', '%', '@', '`', '?', '|', '>'];

/// Structured-response fields recovered by the regex stage, in order:
/// text, reasoning, plan, criticism, speak, command name.
const RECOVERED_FIELDS: [&str; 6] = ["text", "reasoning", "plan", "criticism", "speak", "name"];

/// Normalizes raw model output into the structured response contract.
#[derive(Debug, Clone)]
pub struct ResponseNormalizer {
    labels: Vec<(Regex, &'static str)>,
    token_line: Regex,
    field_line: Regex,
    bare_key_line: Regex,
    recovered: Vec<Regex>,
}

impl ResponseNormalizer {
    /// Create a new response normalizer
    pub fn new() -> Self {
        Self {
            labels: FIELD_LABELS
                .iter()
                .map(|(pattern, token)| (Regex::new(pattern).unwrap(), *token))
                .collect(),
            token_line: Regex::new(&format!(r"([^\n])[ \t]*\b({FIELD_TOKENS}):")).unwrap(),
            field_line: Regex::new(&format!(r"^({FIELD_TOKENS}):[ \t]*(.*)$")).unwrap(),
            bare_key_line: Regex::new(r"^[A-Za-z_][\w \-]*:(?:\s|$)").unwrap(),
            recovered: RECOVERED_FIELDS
                .iter()
                .map(|field| {
                    Regex::new(&format!(
                        r#"["']{field}["']\s*:\s*["']((?:[^"\\]|\\.)*)["']"#
                    ))
                    .unwrap()
                })
                .collect(),
        }
    }

    /// Normalize a raw reply. Never fails.
    pub fn normalize(&self, raw: &str) -> NormalizedResponse {
        if let Some(response) = parse_strict(raw) {
            debug!(stage = "strict", "normalized reply");
            return NormalizedResponse::Structured(response);
        }

        match self.parse_relaxed(raw) {
            Ok(Some(response)) => {
                debug!(stage = "relaxed", "normalized reply");
                return NormalizedResponse::Structured(response);
            }
            Ok(None) => {}
            Err(err) => debug!(error = %err, "relaxed parse failed"),
        }

        debug!(stage = "regex", "falling back to field recovery");
        NormalizedResponse::Structured(self.recover_fields(raw))
    }

    /// Clean up the reply text and parse it as YAML. Replies without any
    /// field label are left to the regex stage.
    fn parse_relaxed(&self, raw: &str) -> Result<Option<StructuredResponse>, NormalizeError> {
        let fields = self.labeled_fields(raw);
        if fields.is_empty() {
            return Ok(None);
        }
        let fields = anchor_primary(fields);
        let cleaned = render(&fields);
        debug!(cleaned = %cleaned, "cleaned reply for relaxed parse");

        match serde_yaml::from_str::<serde_yaml::Value>(&cleaned) {
            Ok(yaml) if yaml.is_mapping() => match serde_json::to_value(&yaml)? {
                Value::Object(map) => Ok(Some(from_mapping(&map))),
                _ => Ok(None),
            },
            Ok(_) => Ok(None),
            Err(err) => {
                debug!(error = %err, "cleaned reply is not YAML, parsing field by field");
                Ok(Some(from_mapping(&field_map(&fields))))
            }
        }
    }

    /// Textual repairs that turn a labeled free-text reply into YAML.
    pub fn clean_up(&self, raw: &str) -> String {
        render(&anchor_primary(self.labeled_fields(raw)))
    }

    /// Split the reply into canonical fields, one per label. Text before
    /// the first label is dropped; blank lines are skipped.
    fn labeled_fields(&self, raw: &str) -> Vec<Field> {
        let mut text = template_interior(raw).replace("\\n", "\n");
        for (pattern, token) in &self.labels {
            text = pattern.replace_all(&text, *token).into_owned();
        }
        text = self
            .token_line
            .replace_all(&text, "${1}\n${2}:")
            .into_owned();

        let mut fields: Vec<Field> = Vec::new();
        for line in text.lines().map(str::trim_end) {
            if let Some(captures) = self.field_line.captures(line) {
                fields.push(Field::new(&captures[1], captures[2].trim()));
            } else if let Some(field) = fields.last_mut() {
                if !line.trim().is_empty() {
                    let line = if field.token == ARGS_FIELD
                        && field.value.is_empty()
                        && self.bare_key_line.is_match(line)
                    {
                        format!("  {line}")
                    } else {
                        line.to_string()
                    };
                    field.lines.push(line);
                }
            }
        }
        fields
    }

    /// Last resort: pull each field out of the flattened reply with a
    /// quoted-key/quoted-value pattern. Fields that do not match stay empty.
    fn recover_fields(&self, raw: &str) -> StructuredResponse {
        let flat = flatten(raw);
        let mut values = self.recovered.iter().map(|pattern| {
            pattern
                .captures(&flat)
                .and_then(|captures| captures.get(1))
                .map(|capture| decode_escapes(capture.as_str()))
                .unwrap_or_default()
        });

        let mut next = || values.next().unwrap_or_default();
        let mut response = StructuredResponse::default();
        response.thoughts.text = next();
        response.thoughts.reasoning = next();
        response.thoughts.plan = next();
        response.thoughts.criticism = next();
        response.thoughts.speak = next();
        response.command.name = next();
        response
    }
}

impl Default for ResponseNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// One labeled field of a free-text reply: the text after its label and
/// any lines that follow before the next label.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Field {
    token: String,
    value: String,
    lines: Vec<String>,
}

impl Field {
    fn new(token: &str, value: &str) -> Self {
        Self {
            token: token.to_string(),
            value: value.to_string(),
            lines: Vec::new(),
        }
    }

    /// The field as one YAML `token: value` entry.
    ///
    /// Well-formed block lists, mappings and block scalars are kept as
    /// blocks; anything else is folded onto one line and quoted.
    fn to_yaml(&self) -> String {
        if self.lines.is_empty() {
            return scalar_entry(&self.token, &self.value);
        }
        if !self.is_block() {
            return scalar_entry(&self.token, &self.text());
        }

        let mut entry = format!("{}:", self.token);
        if !self.value.is_empty() {
            entry.push(' ');
            entry.push_str(&self.value);
        }
        for line in &self.lines {
            entry.push('\n');
            entry.push_str(&block_line(line));
        }
        entry
    }

    fn is_block(&self) -> bool {
        let indented = |line: &String| line.starts_with([' ', '\t']);
        if is_block_scalar_header(&self.value) {
            return self.lines.iter().all(indented);
        }
        self.value.is_empty()
            && self
                .lines
                .iter()
                .all(|line| indented(line) || list_item(line).is_some())
    }

    /// Inline value and continuation lines joined into one line of text.
    fn text(&self) -> String {
        std::iter::once(unquoted(&self.value))
            .chain(self.lines.iter().map(|line| line.trim().to_string()))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Drop fields before the primary one, or prepend an empty primary field
/// when the reply has none.
fn anchor_primary(mut fields: Vec<Field>) -> Vec<Field> {
    match fields.iter().position(|field| field.token == PRIMARY_FIELD) {
        Some(start) => {
            fields.drain(..start);
        }
        None => fields.insert(0, Field::new(PRIMARY_FIELD, "\"\"")),
    }
    fields
}

fn render(fields: &[Field]) -> String {
    fields.iter().map(Field::to_yaml).collect::<Vec<_>>().join("\n")
}

/// Parse each field on its own, keeping its text when even that fails.
fn field_map(fields: &[Field]) -> Map<String, Value> {
    fields
        .iter()
        .map(|field| {
            let value = serde_yaml::from_str::<serde_yaml::Value>(&field.to_yaml())
                .ok()
                .and_then(|yaml| serde_json::to_value(yaml).ok())
                .and_then(|mut entry| entry.get_mut(field.token.as_str()).map(Value::take))
                .unwrap_or_else(|| Value::String(field.text()));
            (field.token.clone(), value)
        })
        .collect()
}

/// `token: value`, single-quoting any value that is not already a quoted
/// scalar or a well-formed flow collection.
fn scalar_entry(token: &str, value: &str) -> String {
    if value.is_empty() {
        format!("{token}:")
    } else if is_quoted_scalar(value) || is_flow_collection(value) {
        format!("{token}: {value}")
    } else {
        format!("{token}: {}", single_quoted(value))
    }
}

/// A block line with any list item YAML would misread quoted.
fn block_line(line: &str) -> String {
    match list_item(line) {
        Some((indent, item)) if needs_quotes_in_block(item) => {
            format!("{indent}- {}", single_quoted(item))
        }
        _ => line.to_string(),
    }
}

/// Split `"  - item"` into its indentation and item text.
fn list_item(line: &str) -> Option<(&str, &str)> {
    let item = line.trim_start();
    let indent = &line[..line.len() - item.len()];
    if item == "-" {
        Some((indent, ""))
    } else {
        item.strip_prefix("- ").map(|rest| (indent, rest.trim()))
    }
}

/// Whether a block list item starts with something YAML treats as syntax.
fn needs_quotes_in_block(item: &str) -> bool {
    item.starts_with(YAML_INDICATORS)
        || item.starts_with("- ")
        || item.contains(" #")
        || (item.starts_with(['[', '{']) && !is_flow_collection(item))
        || (item.starts_with(['"', '\'']) && !is_quoted_scalar(item))
}

fn is_block_scalar_header(value: &str) -> bool {
    matches!(value, "|" | "|-" | "|+" | ">" | ">-" | ">+")
}

fn is_quoted_scalar(value: &str) -> bool {
    value.starts_with(['"', '\''])
        && serde_yaml::from_str::<serde_yaml::Value>(value).is_ok_and(|yaml| yaml.is_string())
}

fn is_flow_collection(value: &str) -> bool {
    value.starts_with(['[', '{'])
        && serde_yaml::from_str::<serde_yaml::Value>(value)
            .is_ok_and(|yaml| yaml.is_sequence() || yaml.is_mapping())
}

/// The text of a quoted scalar, or the value itself.
fn unquoted(value: &str) -> String {
    if is_quoted_scalar(value) {
        if let Ok(serde_yaml::Value::String(text)) = serde_yaml::from_str(value) {
            return text;
        }
    }
    value.to_string()
}

fn single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Parse the reply as a JSON mapping.
fn parse_strict(raw: &str) -> Option<StructuredResponse> {
    let cleaned = strip_markdown_code_blocks(raw);
    match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Object(map)) => Some(from_mapping(&map)),
        Ok(_) => None,
        Err(err) => {
            debug!(error = %err, "reply is not strict JSON");
            None
        }
    }
}

/// Route a parsed mapping to the structured or simple-response conversion.
fn from_mapping(map: &Map<String, Value>) -> StructuredResponse {
    let structured = map.contains_key("thoughts") || map.contains_key("command");
    if SimpleResponse::is_simple_shape(map) && !structured {
        coerce_simple(map)
    } else {
        structured_from_map(map)
    }
}

/// Read a structured-response mapping, stringifying non-string values and
/// leaving missing fields empty.
fn structured_from_map(map: &Map<String, Value>) -> StructuredResponse {
    let thoughts = map.get("thoughts").and_then(Value::as_object);
    let command = map.get("command").and_then(Value::as_object);
    let field = |section: Option<&Map<String, Value>>, key: &str| {
        section
            .and_then(|section| section.get(key))
            .map(value_text)
            .unwrap_or_default()
    };

    let mut response = StructuredResponse::default();
    response.thoughts.text = field(thoughts, "text");
    response.thoughts.reasoning = field(thoughts, "reasoning");
    response.thoughts.plan = field(thoughts, "plan");
    response.thoughts.criticism = field(thoughts, "criticism");
    response.thoughts.speak = field(thoughts, "speak");
    response.command.name = field(command, "name");
    if let Some(args) = command
        .and_then(|command| command.get("args"))
        .and_then(Value::as_object)
    {
        response.command.args = args
            .iter()
            .map(|(name, value)| (name.clone(), value_text(value)))
            .collect();
    }
    response
}

/// Map a simple response into the structured shape.
///
/// On any conversion error the whole simple response is kept, serialized,
/// in `thoughts.text` so nothing the model said is lost.
fn coerce_simple(map: &Map<String, Value>) -> StructuredResponse {
    let mut response = StructuredResponse::default();
    if let Err(err) = apply_simple(map, &mut response) {
        warn!(error = %err, "could not convert simple response, keeping it as text");
        response.thoughts.text = serde_json::to_string_pretty(map).unwrap_or_default();
    }
    response
}

fn apply_simple(
    map: &Map<String, Value>,
    response: &mut StructuredResponse,
) -> Result<(), NormalizeError> {
    let simple: SimpleResponse = serde_json::from_value(Value::Object(map.clone()))?;

    if let Some(summary) = &simple.plan_summary {
        response.thoughts.text = value_text(summary);
    }
    if let Some(reasoning) = &simple.reasoning {
        response.thoughts.reasoning = value_text(reasoning);
    }
    if let Some(steps) = &simple.next_steps {
        response.thoughts.plan = bullet_list(steps);
    }
    if let Some(considerations) = &simple.considerations {
        response.thoughts.criticism = bullet_list(considerations);
    }
    if let Some(tts) = &simple.tts_msg {
        response.thoughts.speak = value_text(tts);
    }
    if let Some(name) = &simple.command_name {
        response.command.name = value_text(name);
    }
    if let Some(args) = &simple.args {
        merge_args(args, &mut response.command.args)?;
    }
    Ok(())
}

/// Merge `[{name, value}, ...]` (or a plain mapping) into a flat arg map.
fn merge_args(args: &Value, into: &mut BTreeMap<String, String>) -> Result<(), NormalizeError> {
    match args {
        Value::Array(items) => {
            for item in items {
                let arg: SimpleArg = serde_json::from_value(item.clone())
                    .map_err(|err| NormalizeError::InvalidArgs(err.to_string()))?;
                into.insert(arg.name, value_text(&arg.value));
            }
            Ok(())
        }
        Value::Object(map) => {
            for (name, value) in map {
                into.insert(name.clone(), value_text(value));
            }
            Ok(())
        }
        Value::Null => Ok(()),
        other => Err(NormalizeError::InvalidArgs(format!(
            "expected a list of name/value pairs, got {other}"
        ))),
    }
}

/// Decode JSON string escapes in a captured value, keeping it as-is when it
/// is not a valid JSON string body.
fn decode_escapes(captured: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{captured}\""))
        .unwrap_or_else(|_| captured.to_string())
}

/// Keep only the text between the template delimiters, when present.
fn template_interior(raw: &str) -> &str {
    let text = raw
        .find(TEMPLATE_START)
        .map_or(raw, |start| &raw[start + TEMPLATE_START.len()..]);
    text.find(TEMPLATE_END).map_or(text, |end| &text[..end])
}

/// Strip markdown code blocks from output
///
/// Models often wrap JSON in a fenced block even when told not to:
/// - ```json\n{...}\n```
/// - ```\n{...}\n```
fn strip_markdown_code_blocks(output: &str) -> String {
    let trimmed = output.trim();

    if trimmed.len() >= 6 && trimmed.starts_with("```") && trimmed.ends_with("```") {
        let start = trimmed.find('\n').map_or(3, |pos| pos + 1);
        let end = trimmed.rfind("\n```").unwrap_or(trimmed.len() - 3);
        if start <= end {
            return trimmed[start..end].trim().to_string();
        }
    }

    trimmed.to_string()
}
