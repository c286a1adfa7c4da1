//! TOML-based configuration for the unfolder.
//!
//! Example configuration (`r2rml-unfold.toml`):
//! ```toml
//! [unfold]
//! dialect = "postgres"          # postgres | mysql | tsql | duckdb
//! alias_prefix = "T"            # from-item aliases: T1, T2, ...
//! on_alias_collision = "rename" # rename | keep
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::sql::dialect::Dialect;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "R2RML_UNFOLD_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "r2rml-unfold.toml";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Unfolding configuration.
    pub unfold: UnfoldSettings,
}

/// What to do when a synthesized column alias is already bound to a
/// different column of the same query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasCollisionPolicy {
    /// Append `_2`, `_3`, ... until the alias is free.
    #[default]
    Rename,
    /// Keep the alias as generated and log a warning.
    Keep,
}

/// Unfolding configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UnfoldSettings {
    /// Dialect produced queries are tagged with.
    pub dialect: Dialect,

    /// Prefix of generated from-item aliases.
    pub alias_prefix: String,

    pub on_alias_collision: AliasCollisionPolicy,
}

impl Default for UnfoldSettings {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            alias_prefix: "T".to_string(),
            on_alias_collision: AliasCollisionPolicy::default(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `R2RML_UNFOLD_CONFIG`
    /// 2. `./r2rml-unfold.toml`
    /// 3. `~/.config/r2rml-unfold/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        // Check environment variable first
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(&path);
        }

        // Check local directory
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        // Check user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("r2rml-unfold").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Return defaults if no config file found
        Ok(Settings::default())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        let prefix = &self.unfold.alias_prefix;
        if prefix.is_empty() {
            return Err(SettingsError::InvalidConfig(
                "unfold.alias_prefix must not be empty".to_string(),
            ));
        }
        if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(SettingsError::InvalidConfig(format!(
                "unfold.alias_prefix must be alphanumeric, got '{prefix}'"
            )));
        }
        Ok(())
    }
}
