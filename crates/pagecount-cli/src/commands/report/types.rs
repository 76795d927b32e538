//! Report types
//!
//! Types for report commands.

use clap::{Args, Subcommand};
use pagecount_core::{CounterGroup, DetailRow, Interval, TableRow, UsageRow};
use serde::Serialize;
use tabled::Tabled;

#[derive(Subcommand)]
pub enum ReportAction {
    /// Show monochrome/color totals per area and per enterprise
    Summary {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Show per-user meter usage
    Usage {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Show opening, closing and reported readings of every user
    Detail {
        #[command(flatten)]
        period: PeriodArgs,
    },
}

/// Report period selection; defaults to last month
#[derive(Debug, Clone, Default, Args)]
pub struct PeriodArgs {
    /// Named interval: today, yesterday, this-week, last-week,
    /// last-two-weeks, this-month, last-month
    #[arg(short, long, conflicts_with_all = ["from", "thru"])]
    pub interval: Option<Interval>,

    /// First day (YYYY-MM-DD, today, yesterday)
    #[arg(short, long)]
    pub from: Option<String>,

    /// Last day (YYYY-MM-DD, today, yesterday)
    #[arg(short, long)]
    pub thru: Option<String>,
}

/// Totals row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct TotalsRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Monochrome")]
    pub monochrome: u64,
    #[tabled(rename = "Color")]
    pub color: u64,
}

impl From<TableRow> for TotalsRow {
    fn from(row: TableRow) -> Self {
        Self {
            name: row.label,
            monochrome: row.monochrome,
            color: row.color,
        }
    }
}

/// Usage row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct UsageDisplayRow {
    #[tabled(rename = "Enterprise")]
    pub enterprise: String,
    #[tabled(rename = "Area")]
    pub area: String,
    #[tabled(rename = "User")]
    pub user: String,
    #[tabled(rename = "Copier B/W")]
    pub copier_bw: u32,
    #[tabled(rename = "Copier Color")]
    pub copier_color: u32,
    #[tabled(rename = "Printer B/W")]
    pub printer_bw: u32,
    #[tabled(rename = "Printer Color")]
    pub printer_color: u32,
}

impl From<UsageRow> for UsageDisplayRow {
    fn from(row: UsageRow) -> Self {
        Self {
            enterprise: row.enterprise,
            area: row.area,
            user: row.user,
            copier_bw: row.copier_monochrome,
            copier_color: row.copier_color,
            printer_bw: row.printer_monochrome,
            printer_color: row.printer_color,
        }
    }
}

/// Detail row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct DetailDisplayRow {
    #[tabled(rename = "Enterprise")]
    pub enterprise: String,
    #[tabled(rename = "Area")]
    pub area: String,
    #[tabled(rename = "User")]
    pub user: String,
    #[tabled(rename = "First")]
    pub first: String,
    #[tabled(rename = "Last")]
    pub last: String,
    #[tabled(rename = "Reported")]
    pub reported: String,
    #[tabled(rename = "Outcome")]
    pub outcome: String,
}

impl From<DetailRow> for DetailDisplayRow {
    fn from(row: DetailRow) -> Self {
        Self {
            enterprise: row.enterprise,
            area: row.area,
            user: row.user,
            first: row
                .first
                .as_ref()
                .map(format_reading)
                .unwrap_or_else(|| "-".to_string()),
            last: format_reading(&row.last),
            reported: format_meters(&row.reported),
            outcome: row.outcome.label(),
        }
    }
}

/// Meters as `copier b/w / copier color / printer b/w / printer color`
pub fn format_meters(group: &CounterGroup) -> String {
    format!(
        "{}/{}/{}/{}",
        group.copier.monochrome, group.copier.color, group.printer.monochrome, group.printer.color
    )
}

fn format_reading(group: &CounterGroup) -> String {
    format!("{} {}", group.timestamp.format("%Y-%m-%d"), format_meters(group))
}
