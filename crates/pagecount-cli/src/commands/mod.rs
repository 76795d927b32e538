//! CLI commands module
//!
//! Contains all CLI command implementations.

pub mod catalog;
pub mod config;
pub mod counters;
pub mod report;

use pagecount_core::{AppConfig, Database};

use self::config::ConfigLocation;
use crate::output::OutputFormat;

/// Shared context for all commands
pub struct Context {
    pub db: Database,
    pub config: AppConfig,
    pub config_location: ConfigLocation,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl Context {
    /// Progress messages are suppressed in quiet mode and for JSON output
    pub fn silent(&self) -> bool {
        self.quiet || self.format == OutputFormat::Json
    }
}
