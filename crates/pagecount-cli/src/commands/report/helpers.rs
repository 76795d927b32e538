//! Report helper functions
//!
//! Shared utilities for report commands.

use anyhow::Result;
use chrono::NaiveDate;
use pagecount_core::{build_report, DateRange, Interval, Report, SqliteSnapshotStore};

use super::types::PeriodArgs;
use crate::commands::Context;
use crate::output::print_info;

/// Resolve the report period relative to `today`.
///
/// An explicit interval wins, then `--from`/`--thru`; with neither the
/// report covers last month.
pub fn resolve_range(period: &PeriodArgs, today: NaiveDate) -> Result<DateRange> {
    if let Some(interval) = period.interval {
        return Ok(interval.resolve(today));
    }

    let from = period
        .from
        .as_deref()
        .map(|s| parse_date(s, today))
        .transpose()?;
    let thru = period
        .thru
        .as_deref()
        .map(|s| parse_date(s, today))
        .transpose()?;

    let range = DateRange::from_bounds(from, thru)?;
    Ok(range.unwrap_or_else(|| Interval::default().resolve(today)))
}

/// Parse date string supporting `today` and `yesterday`
pub fn parse_date(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    if s == "today" {
        return Ok(today);
    }
    if s == "yesterday" {
        return Ok(today - chrono::Duration::days(1));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date format: {}. Use YYYY-MM-DD", s))
}

/// Resolve the period and build the report from the database
pub async fn load_report(ctx: &Context, period: &PeriodArgs) -> Result<Report> {
    let today = chrono::Local::now().date_naive();
    let range = resolve_range(period, today)?;

    print_info(
        &format!("Counters {} ({})", range.label(), range),
        ctx.silent(),
    );

    let store = SqliteSnapshotStore::new(ctx.db.pool.clone());
    let report = build_report(&store, range).await?;
    Ok(report)
}
