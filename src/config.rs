//! Configuration handling for the notes front end
//!
//! Configuration is read from a TOML file (`--config <path>`, else
//! `notes.toml` in the user config directory) and then overridden by
//! environment variables:
//!
//! | Variable | Key |
//! |----------|-----|
//! | `NOTES_MODE` | `mode` |
//! | `NOTES_DEV_PATH` | `dev_path` |
//! | `NOTES_PROD_PATH` | `prod_path` |

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{TimeDisplay, DEFAULT_FOLDER_NAME};
use crate::store::StoreOptions;

pub const ENV_MODE: &str = "NOTES_MODE";
pub const ENV_DEV_PATH: &str = "NOTES_DEV_PATH";
pub const ENV_PROD_PATH: &str = "NOTES_PROD_PATH";

const CONFIG_FILE: &str = "notes.toml";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Build mode, selecting which base path applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Mode::Development),
            "production" | "prod" => Ok(Mode::Production),
            other => Err(ConfigError::Invalid(format!(
                "unknown mode '{}', expected 'development' or 'production'",
                other
            ))),
        }
    }
}

/// Effective configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build mode
    pub mode: Mode,

    /// Base path used in development mode
    pub dev_path: String,

    /// Base path used in production mode
    pub prod_path: String,

    /// Display name of the catch-all folder
    pub default_folder_name: String,

    /// Zone used when rendering timestamps
    pub time_display: TimeDisplay,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Development,
            dev_path: "/".to_string(),
            prod_path: "/".to_string(),
            default_folder_name: DEFAULT_FOLDER_NAME.to_string(),
            time_display: TimeDisplay::Local,
        }
    }
}

impl Config {
    /// Loads configuration from the given file (or the default location)
    /// and applies environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the default config file location
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "notes", "notes-store")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Parses a config file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::parse(&content).context("Failed to parse config")
    }

    /// Parses configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Applies `NOTES_*` overrides using the given variable lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup(ENV_MODE) {
            self.mode = mode.parse()?;
        }
        if let Some(path) = lookup(ENV_DEV_PATH) {
            self.dev_path = path;
        }
        if let Some(path) = lookup(ENV_PROD_PATH) {
            self.prod_path = path;
        }
        Ok(())
    }

    /// Rejects values the front end cannot use
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_folder_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_folder_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Base path for the current mode
    pub fn base_path(&self) -> &str {
        match self.mode {
            Mode::Development => &self.dev_path,
            Mode::Production => &self.prod_path,
        }
    }

    /// Options for constructing a store
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            default_folder_name: self.default_folder_name.clone(),
            time_display: self.time_display,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.mode, Mode::Development);
        assert_eq!(config.base_path(), "/");
        assert_eq!(config.default_folder_name, "Все заметки");
        assert_eq!(config.time_display, TimeDisplay::Local);
    }

    #[test]
    fn parse_config() {
        let toml = r#"
mode = "production"
dev_path = "/dev/"
prod_path = "/notes/"
default_folder_name = "All notes"
time_display = "utc"
"#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.mode, Mode::Production);
        assert_eq!(config.base_path(), "/notes/");
        assert_eq!(config.default_folder_name, "All notes");
        assert_eq!(config.time_display, TimeDisplay::Utc);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = Config::parse("dev_path = \"/local/\"\n").unwrap();
        assert_eq!(config.base_path(), "/local/");
        assert_eq!(config.prod_path, "/");
        assert_eq!(config.default_folder_name, DEFAULT_FOLDER_NAME);
    }

    #[test]
    fn parse_error() {
        let err = Config::parse("mode = \"staging\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                (ENV_MODE, "prod"),
                (ENV_PROD_PATH, "/app/"),
            ]))
            .unwrap();

        assert_eq!(config.mode, Mode::Production);
        assert_eq!(config.base_path(), "/app/");
        assert_eq!(config.dev_path, "/");
    }

    #[test]
    fn env_rejects_unknown_mode() {
        let mut config = Config::default();
        let err = config.apply_env(env(&[(ENV_MODE, "staging")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn empty_folder_name_is_invalid() {
        let config = Config {
            default_folder_name: "  ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_file_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.toml");
        fs::write(&path, "default_folder_name = \"Inbox\"\n").unwrap();

        let config = Config::load_file(&path).unwrap();
        assert_eq!(config.default_folder_name, "Inbox");
        assert_eq!(config.store_options().default_folder_name, "Inbox");
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load_file(&dir.path().join("missing.toml")).is_err());
    }
}
