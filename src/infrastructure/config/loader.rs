use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Environment variable prefix; `__` separates nested keys.
const ENV_PREFIX: &str = "TEXTGEN_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Base URL cannot be empty")]
    EmptyBaseUrl,

    #[error("Invalid base URL: {0}. Must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Invalid default_max_tokens: {0}. Must be at least 1")]
    InvalidMaxTokens(u32),

    #[error("Invalid min_temperature: {0}. Must be positive")]
    InvalidMinTemperature(f32),

    #[error("Invalid default_temperature: {0}. Cannot be negative")]
    InvalidTemperature(f32),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .textgen/config.yaml (project config)
    /// 3. .textgen/local.yaml (local overrides, optional)
    /// 4. Environment variables (TEXTGEN_* prefix)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".textgen/config.yaml"))
            .merge(Yaml::file(".textgen/local.yaml"))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring environment
    /// overrides.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let base_url = config.textgen.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_string()));
        }
        if config.textgen.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.textgen.timeout_secs));
        }

        let generation = &config.generation;
        if generation.default_max_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens(generation.default_max_tokens));
        }
        if generation.min_temperature <= 0.0 {
            return Err(ConfigError::InvalidMinTemperature(generation.min_temperature));
        }
        if generation.default_temperature < 0.0 {
            return Err(ConfigError::InvalidTemperature(generation.default_temperature));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}
