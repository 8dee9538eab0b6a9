//! Configuration management for Hondana.
//!
//! Handles loading, saving, and validating configuration from
//! platform-specific config directories.

use crate::error::ConfigError;
use crate::store::HISTORY_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application name used for config directory.
const APP_NAME: &str = "Hondana";

/// Default config filename.
const CONFIG_FILENAME: &str = "config.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reading state storage settings.
    pub storage: StorageConfig,

    /// Listing sizes for the terminal views.
    pub display: DisplayConfig,
}

/// Where and how reading state is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the favorites and history files.
    /// Defaults to a `data` directory next to the config file.
    pub data_directory: Option<PathBuf>,

    /// Number of reading history entries kept (1-20).
    pub history_limit: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_directory: None,
            history_limit: HISTORY_LIMIT,
        }
    }
}

/// Listing sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// History entries shown under "Continue reading".
    pub recent_history: usize,

    /// Titles shown under "Popular".
    pub popular_count: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            recent_history: 3,
            popular_count: 8,
        }
    }
}

impl Config {
    /// Returns the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Returns the full path to the config file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join(CONFIG_FILENAME))
    }

    /// Loads configuration from the default location.
    ///
    /// If the config file doesn't exist, creates a default one.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Saves configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limit = self.storage.history_limit;
        if limit == 0 || limit > HISTORY_LIMIT {
            return Err(ConfigError::InvalidValue {
                key: "storage.history_limit".to_string(),
                message: format!("must be between 1 and {}", HISTORY_LIMIT),
            });
        }

        Ok(())
    }

    /// Returns the effective data directory, using config or default.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref dir) = self.storage.data_directory {
            Ok(dir.clone())
        } else {
            Ok(Self::config_dir()?.join("data"))
        }
    }
}
