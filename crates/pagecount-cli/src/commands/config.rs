//! Config commands
//!
//! Commands for inspecting CLI configuration.

use anyhow::Result;
use clap::Subcommand;
use pagecount_core::config::{expand_path, get_config_path};
use pagecount_core::db::{get_db_path, DB_PATH_ENV};
use pagecount_core::AppConfig;
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;

use super::Context;
use crate::output::print_output;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration and where each value comes from
    Show,
}

/// Where the loaded config file was selected from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Flag,
    Env,
    Default,
}

impl ConfigSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigSource::Flag => "flag",
            ConfigSource::Env => "env",
            ConfigSource::Default => "default",
        }
    }
}

/// Config file that was loaded at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    pub source: ConfigSource,
}

impl ConfigLocation {
    /// Resolve the config file from the `--config` value and the
    /// `PAGECOUNT_CONFIG` value.
    ///
    /// clap fills `--config` from the env var, so a flag value equal to the
    /// env value counts as coming from the environment.
    pub fn resolve(flag: Option<&str>, env: Option<&str>) -> Result<Self> {
        match flag {
            Some(path) => Ok(Self {
                path: expand_path(path)?,
                source: if env == Some(path) {
                    ConfigSource::Env
                } else {
                    ConfigSource::Flag
                },
            }),
            None => Ok(Self {
                path: get_config_path()?,
                source: ConfigSource::Default,
            }),
        }
    }
}

/// Config row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

pub async fn execute(ctx: &Context, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => show_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let rows = config_rows(&ctx.config, &ctx.config_location);
    print_output(&rows, ctx.format)?;
    Ok(())
}

fn config_rows(config: &AppConfig, location: &ConfigLocation) -> Vec<ConfigRow> {
    let mut rows = Vec::new();

    rows.push(ConfigRow {
        key: "config_file".to_string(),
        value: location.path.to_string_lossy().to_string(),
        source: location.source.as_str().to_string(),
    });

    let db_path = get_db_path(config.database.path.as_deref())
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| "Unknown".to_string());
    let db_source = if std::env::var(DB_PATH_ENV).is_ok() {
        "env"
    } else if config.database.path.is_some() {
        "config"
    } else {
        "default"
    };
    rows.push(ConfigRow {
        key: "database.path".to_string(),
        value: db_path,
        source: db_source.to_string(),
    });

    rows.push(ConfigRow {
        key: "log.level".to_string(),
        value: config.log.filter().to_string(),
        source: if std::env::var("RUST_LOG").is_ok() {
            "overridden by RUST_LOG"
        } else {
            "config"
        }
        .to_string(),
    });

    rows
}
