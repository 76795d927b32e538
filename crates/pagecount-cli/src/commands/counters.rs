//! Counter commands
//!
//! Record readings collected from printers and inspect stored readings.

use anyhow::Result;
use chrono::{NaiveDateTime, NaiveTime, Timelike};
use clap::Subcommand;
use pagecount_core::{CounterReading, CounterSet, SqliteSnapshotStore, StoredReading};
use serde::Serialize;
use tabled::Tabled;

use super::report::parse_date;
use super::Context;
use crate::output::{print_output, print_single, print_success};

#[derive(Subcommand)]
pub enum CountersAction {
    /// Store a reading; a later reading on the same day replaces it
    Add {
        /// Printer id
        #[arg(short, long)]
        printer: i64,

        /// User id
        #[arg(short, long)]
        user: i64,

        /// Reading date (YYYY-MM-DD, today, yesterday), defaults to today
        #[arg(short, long)]
        date: Option<String>,

        /// Reading time (HH:MM[:SS]), defaults to now
        #[arg(short, long)]
        time: Option<String>,

        /// Copier monochrome meter
        #[arg(long, default_value = "0")]
        copier_bw: u32,

        /// Copier color meter
        #[arg(long, default_value = "0")]
        copier_color: u32,

        /// Printer monochrome meter
        #[arg(long, default_value = "0")]
        printer_bw: u32,

        /// Printer color meter
        #[arg(long, default_value = "0")]
        printer_color: u32,
    },

    /// List stored readings of a printer/user pair, newest first
    List {
        /// Printer id
        #[arg(short, long)]
        printer: i64,

        /// User id
        #[arg(short, long)]
        user: i64,
    },

    /// Record a printer's total page counter
    SetTotal {
        /// Printer id
        #[arg(short, long)]
        printer: i64,

        /// Total pages printed
        #[arg(short, long)]
        counter: u32,
    },
}

/// Stored reading row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct ReadingRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Time")]
    pub time: String,
    #[tabled(rename = "Copier B/W")]
    pub copier_bw: i64,
    #[tabled(rename = "Copier Color")]
    pub copier_color: i64,
    #[tabled(rename = "Printer B/W")]
    pub printer_bw: i64,
    #[tabled(rename = "Printer Color")]
    pub printer_color: i64,
}

impl From<StoredReading> for ReadingRow {
    fn from(r: StoredReading) -> Self {
        Self {
            date: r.date,
            time: r.time,
            copier_bw: r.copier_bw,
            copier_color: r.copier_color,
            printer_bw: r.printer_bw,
            printer_color: r.printer_color,
        }
    }
}

impl From<&CounterReading> for ReadingRow {
    fn from(r: &CounterReading) -> Self {
        Self {
            date: r.taken_at.format("%Y-%m-%d").to_string(),
            time: r.taken_at.format("%H:%M:%S").to_string(),
            copier_bw: i64::from(r.copier.monochrome),
            copier_color: i64::from(r.copier.color),
            printer_bw: i64::from(r.printer.monochrome),
            printer_color: i64::from(r.printer.color),
        }
    }
}

pub async fn execute(ctx: &Context, action: CountersAction) -> Result<()> {
    let store = SqliteSnapshotStore::new(ctx.db.pool.clone());

    match action {
        CountersAction::Add {
            printer,
            user,
            date,
            time,
            copier_bw,
            copier_color,
            printer_bw,
            printer_color,
        } => {
            let taken_at = resolve_timestamp(date.as_deref(), time.as_deref())?;
            let reading = CounterReading {
                printer_id: printer,
                user_id: user,
                taken_at,
                copier: CounterSet::new(copier_bw, copier_color),
                printer: CounterSet::new(printer_bw, printer_color),
            };
            store.store_readings(std::slice::from_ref(&reading)).await?;
            print_success(
                &format!("Stored reading for printer {} / user {}", printer, user),
                ctx.quiet,
            );

            // Show the stored reading
            if !ctx.quiet {
                print_single(&ReadingRow::from(&reading), ctx.format)?;
            }
            Ok(())
        }
        CountersAction::List { printer, user } => {
            let rows: Vec<ReadingRow> = store
                .list_readings(printer, user)
                .await?
                .into_iter()
                .map(ReadingRow::from)
                .collect();
            print_output(&rows, ctx.format)
        }
        CountersAction::SetTotal { printer, counter } => {
            store.set_printer_counter(printer, counter).await?;
            print_success(
                &format!("Printer {} total counter set to {}", printer, counter),
                ctx.quiet,
            );
            Ok(())
        }
    }
}

/// Combine the optional date and time arguments, defaulting to now
fn resolve_timestamp(date: Option<&str>, time: Option<&str>) -> Result<NaiveDateTime> {
    let now = chrono::Local::now().naive_local();

    let date = match date {
        Some(d) => parse_date(d, now.date())?,
        None => now.date(),
    };
    let time = match time {
        Some(t) => parse_time(t)?,
        None => now.time().with_nanosecond(0).unwrap_or(now.time()),
    };

    Ok(date.and_time(time))
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| anyhow::anyhow!("Invalid time format: {}. Use HH:MM or HH:MM:SS", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_formats() {
        assert_eq!(parse_time("18:30").unwrap().to_string(), "18:30:00");
        assert_eq!(parse_time("07:05:09").unwrap().to_string(), "07:05:09");
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("noon").is_err());
    }

    #[test]
    fn test_resolve_timestamp_explicit() {
        let ts = resolve_timestamp(Some("2025-03-31"), Some("19:00")).unwrap();
        assert_eq!(ts.to_string(), "2025-03-31 19:00:00");
    }

    #[test]
    fn test_resolve_timestamp_defaults_to_today() {
        let today = chrono::Local::now().date_naive();
        let ts = resolve_timestamp(None, Some("08:00")).unwrap();
        assert_eq!(ts.date(), today);
    }

    #[test]
    fn test_reading_row_from_new_reading() {
        let reading = CounterReading {
            printer_id: 1,
            user_id: 2,
            taken_at: resolve_timestamp(Some("2025-03-31"), Some("19:00")).unwrap(),
            copier: CounterSet::new(140, 14),
            printer: CounterSet::new(20, 0),
        };
        let row = ReadingRow::from(&reading);
        assert_eq!(row.date, "2025-03-31");
        assert_eq!(row.time, "19:00:00");
        assert_eq!((row.copier_bw, row.copier_color), (140, 14));
        assert_eq!(row.printer_bw, 20);
    }

    #[test]
    fn test_reading_row_from_stored() {
        let row = ReadingRow::from(StoredReading {
            printer_id: 1,
            user_id: 2,
            date: "2025-03-31".to_string(),
            time: "19:00:00".to_string(),
            copier_bw: 10,
            copier_color: 1,
            printer_bw: 20,
            printer_color: 2,
        });
        assert_eq!(row.date, "2025-03-31");
        assert_eq!(row.printer_bw, 20);
    }
}
