//! Database module - SQLx with SQLite

use crate::config::{expand_path, AppConfig};
use crate::error::{Error, Result};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::PathBuf;

/// Environment variable overriding the database location
pub const DB_PATH_ENV: &str = "PAGECOUNT_DB_PATH";

/// Database state
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    /// Create a new database connection using the configured path
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let db_path = get_db_path(config.database.path.as_deref())?;
        Self::open(db_path).await
    }

    /// Create a new database connection with a specific path
    pub async fn open(db_path: PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
        log::info!("Connecting to database: {}", db_path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<()> {
        log::info!("Running database migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS enterprises (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                sort_order INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS areas (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                sort_order INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS printers (
                id INTEGER PRIMARY KEY,
                ip TEXT NOT NULL UNIQUE,
                enterprise_id INTEGER NOT NULL,
                area_id INTEGER NOT NULL,
                sort_order INTEGER NOT NULL DEFAULT 0,
                counter INTEGER,
                counter_updated_at TEXT,
                FOREIGN KEY (enterprise_id) REFERENCES enterprises(id),
                FOREIGN KEY (area_id) REFERENCES areas(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                code INTEGER NOT NULL UNIQUE,
                name TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // One reading per printer/user/day; later readings of the same day replace it
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS counters (
                printer_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                time TEXT NOT NULL,
                copier_bw INTEGER NOT NULL DEFAULT 0,
                copier_color INTEGER NOT NULL DEFAULT 0,
                printer_bw INTEGER NOT NULL DEFAULT 0,
                printer_color INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (printer_id) REFERENCES printers(id),
                FOREIGN KEY (user_id) REFERENCES users(id),
                UNIQUE(printer_id, user_id, date)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_counters_date ON counters(date)")
            .execute(&self.pool)
            .await?;

        log::info!("Database migrations completed");
        Ok(())
    }
}

/// Get database file path
/// Priority: PAGECOUNT_DB_PATH env var > configured path > default app data directory
pub fn get_db_path(configured: Option<&str>) -> Result<PathBuf> {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }

    if let Some(path) = configured {
        return expand_path(path);
    }

    let dirs = directories::ProjectDirs::from("com", "pagecount", "Pagecount")
        .ok_or_else(|| Error::config("Could not determine project directories"))?;

    Ok(dirs.data_dir().join("pagecount.db"))
}
