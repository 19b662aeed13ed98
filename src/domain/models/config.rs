use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::agent::AgentState;

/// Main configuration structure for textgen-bridge
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Text-generation API connection
    #[serde(default)]
    pub textgen: TextGenConfig,

    /// Generation parameter defaults
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Prompt profile file (YAML or JSON); the built-in profile is used when unset
    #[serde(default)]
    pub profile_path: Option<PathBuf>,

    /// Agent the prompts are built for
    #[serde(default)]
    pub agent: AgentState,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Text-generation API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TextGenConfig {
    /// Base URL of the text-generation server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

const fn default_timeout_secs() -> u64 {
    300
}

impl Default for TextGenConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Generation parameter defaults applied when the caller leaves them out
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GenerationConfig {
    /// Token budget when the caller passes none
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Temperature when the caller passes none
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Floor for the temperature; the server rejects 0.0
    #[serde(default = "default_min_temperature")]
    pub min_temperature: f32,
}

const fn default_max_tokens() -> u32 {
    600
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_min_temperature() -> f32 {
    0.01
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_max_tokens: default_max_tokens(),
            default_temperature: default_temperature(),
            min_temperature: default_min_temperature(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Log file rotation: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
