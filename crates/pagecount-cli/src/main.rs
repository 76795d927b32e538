//! Pagecount CLI - printer usage counters and billing reports
//!
//! A command-line interface for recording counter readings, managing the
//! printer catalog, and generating usage reports.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::config::ConfigLocation;
use pagecount_core::config::{AppConfig, CONFIG_PATH_ENV};
use pagecount_core::db::DB_PATH_ENV;

#[derive(Parser)]
#[command(name = "pagecount")]
#[command(author, version, about = "Printer usage counters and reports CLI", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: table (default) or json
    #[arg(long, global = true, default_value = "table")]
    format: output::OutputFormat,

    /// Suppress progress messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Override database path (or set PAGECOUNT_DB_PATH env var)
    #[arg(long, env = "PAGECOUNT_DB_PATH", global = true)]
    db: Option<String>,

    /// Override config file path (or set PAGECOUNT_CONFIG env var)
    #[arg(long, env = "PAGECOUNT_CONFIG", global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate usage reports for a period
    Report {
        #[command(subcommand)]
        action: commands::report::ReportAction,
    },

    /// Record and inspect counter readings
    Counters {
        #[command(subcommand)]
        action: commands::counters::CountersAction,
    },

    /// Manage enterprises, areas, printers and users
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_config = std::env::var(CONFIG_PATH_ENV).ok();
    let config_location = ConfigLocation::resolve(cli.config.as_deref(), env_config.as_deref())?;
    let mut config = AppConfig::load_from(&config_location.path)?;
    if cli.verbose {
        config.log.verbose = true;
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log.filter()),
    )
    .init();

    // Set up database path if provided
    if let Some(db_path) = &cli.db {
        std::env::set_var(DB_PATH_ENV, db_path);
    }

    // Initialize database
    let db = pagecount_core::Database::new(&config).await?;

    // Create context for commands
    let ctx = commands::Context {
        db,
        config,
        config_location,
        format: cli.format,
        quiet: cli.quiet,
    };

    // Execute command
    match cli.command {
        Commands::Report { action } => commands::report::execute(&ctx, action).await,
        Commands::Counters { action } => commands::counters::execute(&ctx, action).await,
        Commands::Catalog { action } => commands::catalog::execute(&ctx, action).await,
        Commands::Config { action } => commands::config::execute(&ctx, action).await,
    }
}
