//! Application configuration
//!
//! Loaded from a JSON file. Every field has a default, and a missing file
//! yields the default configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "PAGECOUNT_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file; `~` and `$VARS` are expanded
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default `env_logger` filter when `RUST_LOG` is unset
    pub level: String,
    /// Log at debug level regardless of `level`
    pub verbose: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            verbose: false,
        }
    }
}

impl LogConfig {
    /// Effective filter string
    pub fn filter(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.level
        }
    }
}

impl AppConfig {
    /// Load from a specific file; a missing file gives the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("[config] {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content).map_err(|e| {
            Error::config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        log::debug!("[config] Loaded {}", path.display());
        Ok(config)
    }
}

/// Get config file path
/// Priority: PAGECOUNT_CONFIG env var > default config directory
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return expand_path(&path);
    }

    let dirs = directories::ProjectDirs::from("com", "pagecount", "Pagecount")
        .ok_or_else(|| Error::config("Could not determine project directories"))?;

    Ok(dirs.config_dir().join("pagecount.json"))
}

/// Expand `~` and environment variables in a configured path
pub fn expand_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path)
        .map_err(|e| Error::config(format!("Cannot expand path '{}': {}", path, e)))?;
    Ok(PathBuf::from(expanded.as_ref()))
}
