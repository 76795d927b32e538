//! Snapshot Store
//!
//! Read and write access to stored counter readings. Reports only need the
//! read contract of [`SnapshotStore`]; the SQLite implementation also
//! persists readings collected from devices.

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::models::{ActivePair, CounterGroup, CounterReading, StoredReading};
use crate::services::period::DateRange;

/// Source of counter snapshots for report building
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Printer/user pairs with at least one reading inside `range`, ordered
    /// by enterprise, area, printer and user name
    async fn active_pairs(&self, range: &DateRange) -> Result<Vec<ActivePair>>;

    /// Latest reading of the pair dated on or before `as_of`
    async fn get_snapshot(
        &self,
        printer_id: i64,
        user_id: i64,
        as_of: NaiveDate,
    ) -> Result<Option<CounterGroup>>;
}

/// SQLite-backed snapshot store
pub struct SqliteSnapshotStore {
    pool: SqlitePool,
}

impl SqliteSnapshotStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store readings, replacing any reading of the same printer/user/day.
    ///
    /// Runs in a single transaction: either every reading is stored or none is.
    pub async fn store_readings(&self, readings: &[CounterReading]) -> Result<usize> {
        if readings.is_empty() {
            log::debug!("[snapshot] No readings to store");
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;

        for reading in readings {
            let result = sqlx::query(
                r#"INSERT INTO counters
                   (printer_id, user_id, date, time,
                    copier_bw, copier_color, printer_bw, printer_color)
                   VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                   ON CONFLICT(printer_id, user_id, date) DO UPDATE SET
                   time = excluded.time,
                   copier_bw = excluded.copier_bw,
                   copier_color = excluded.copier_color,
                   printer_bw = excluded.printer_bw,
                   printer_color = excluded.printer_color"#,
            )
            .bind(reading.printer_id)
            .bind(reading.user_id)
            .bind(reading.taken_at.format("%Y-%m-%d").to_string())
            .bind(reading.taken_at.format("%H:%M:%S").to_string())
            .bind(i64::from(reading.copier.monochrome))
            .bind(i64::from(reading.copier.color))
            .bind(i64::from(reading.printer.monochrome))
            .bind(i64::from(reading.printer.color))
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() != 1 {
                return Err(Error::internal(format!(
                    "Storing reading for printer {} / user {} changed {} rows",
                    reading.printer_id,
                    reading.user_id,
                    result.rows_affected()
                )));
            }
        }

        tx.commit().await?;

        log::info!("[snapshot] Stored {} readings", readings.len());
        Ok(readings.len())
    }

    /// Record a printer's total page counter
    pub async fn set_printer_counter(&self, printer_id: i64, counter: u32) -> Result<()> {
        let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let result = sqlx::query(
            "UPDATE printers SET counter = ?, counter_updated_at = ? WHERE id = ?",
        )
        .bind(i64::from(counter))
        .bind(&now)
        .bind(printer_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() != 1 {
            return Err(Error::not_found(format!("printer {}", printer_id)));
        }

        log::debug!("[snapshot] Printer {} counter set to {}", printer_id, counter);
        Ok(())
    }

    /// All readings of a printer/user pair, newest first
    pub async fn list_readings(
        &self,
        printer_id: i64,
        user_id: i64,
    ) -> Result<Vec<StoredReading>> {
        let rows = sqlx::query_as::<_, StoredReading>(
            r#"SELECT printer_id, user_id, date, time,
                      copier_bw, copier_color, printer_bw, printer_color
               FROM counters
               WHERE printer_id = ? AND user_id = ?
               ORDER BY date DESC"#,
        )
        .bind(printer_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl SnapshotStore for SqliteSnapshotStore {
    async fn active_pairs(&self, range: &DateRange) -> Result<Vec<ActivePair>> {
        let pairs = sqlx::query_as::<_, ActivePair>(
            r#"SELECT c.printer_id, c.user_id,
                      e.name AS enterprise, a.name AS area, u.name AS "user"
               FROM counters c
               JOIN printers p ON c.printer_id = p.id
               JOIN users u ON c.user_id = u.id
               JOIN enterprises e ON p.enterprise_id = e.id
               JOIN areas a ON p.area_id = a.id
               WHERE c.date >= ? AND c.date <= ?
               GROUP BY c.printer_id, c.user_id
               ORDER BY e.sort_order, a.sort_order, p.sort_order, u.name, c.printer_id, c.user_id"#,
        )
        .bind(range.from.format("%Y-%m-%d").to_string())
        .bind(range.thru.format("%Y-%m-%d").to_string())
        .fetch_all(&self.pool)
        .await?;

        log::debug!("[snapshot] {} active pairs in {}", pairs.len(), range);
        Ok(pairs)
    }

    async fn get_snapshot(
        &self,
        printer_id: i64,
        user_id: i64,
        as_of: NaiveDate,
    ) -> Result<Option<CounterGroup>> {
        let row = sqlx::query_as::<_, StoredReading>(
            r#"SELECT printer_id, user_id, date, time,
                      copier_bw, copier_color, printer_bw, printer_color
               FROM counters
               WHERE printer_id = ? AND user_id = ? AND date <= ?
               ORDER BY date DESC
               LIMIT 1"#,
        )
        .bind(printer_id)
        .bind(user_id)
        .bind(as_of.format("%Y-%m-%d").to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.to_counter_group()).transpose()
    }
}
