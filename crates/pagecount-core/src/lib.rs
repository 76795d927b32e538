//! # pagecount-core
//!
//! Core logic for Pagecount - printer usage reports from stored counter readings.
//!
//! This crate provides:
//! - Database operations (`db` module)
//! - Data models (`models` module)
//! - Reconciliation, aggregation and report services (`services` module)
//! - Configuration loading (`config` module)
//! - Unified error handling (`error` module)

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

// Re-exports for convenience
pub use config::AppConfig;
pub use db::Database;
pub use error::{Error, Result};

// Re-export commonly used types from models
pub use models::{
    ActivePair, Area, CounterGroup, CounterReading, CounterSet, Enterprise, Meter, Printer,
    PrinterListing, Record, StoredReading, User,
};

// Re-export commonly used types from services
pub use services::{
    aggregate, build_report, reconcile, AreaTotal, DateRange, DetailRow, EnterpriseTotal,
    Interval, ReconcileOutcome, Report, SnapshotStore, SqliteSnapshotStore, Summary, TableRow,
    UsageRow,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
pub fn version() -> &'static str {
    VERSION
}
