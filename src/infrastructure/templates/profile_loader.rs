//! Prompt profile loader from YAML or JSON files

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::models::PromptProfile;

/// Profile loading errors
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Failed to read profile file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON profile: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse YAML profile: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Loader for prompt profiles
///
/// Files ending in `.json` are read as JSON; anything else as YAML.
pub struct ProfileLoader;

impl ProfileLoader {
    /// Load a profile from a file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<PromptProfile, ProfileError> {
        let path = path.as_ref();
        debug!("Loading prompt profile from: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::load_from_json(&content)
        } else {
            Self::load_from_yaml(&content)
        }
    }

    /// Parse a profile from a YAML string. An empty document is an empty profile.
    pub fn load_from_yaml(yaml: &str) -> Result<PromptProfile, ProfileError> {
        if yaml.trim().is_empty() {
            return Ok(PromptProfile::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a profile from a JSON string
    pub fn load_from_json(json: &str) -> Result<PromptProfile, ProfileError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load the configured profile, or the built-in one when no path is set.
    ///
    /// A profile that cannot be read or parsed is logged and replaced by the
    /// built-in profile; prompt building never fails on profile content.
    pub fn load_or_builtin(path: Option<&Path>) -> PromptProfile {
        let Some(path) = path else {
            debug!("no prompt profile configured, using built-in profile");
            return PromptProfile::builtin();
        };

        match Self::load_from_file(path) {
            Ok(profile) => {
                info!(
                    path = %path.display(),
                    template_type = ?profile.template_type,
                    "loaded prompt profile"
                );
                profile
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "could not load prompt profile, using built-in profile"
                );
                PromptProfile::builtin()
            }
        }
    }
}
