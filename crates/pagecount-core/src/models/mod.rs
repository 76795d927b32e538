//! Data models for pagecount
//!
//! Counter values (`CounterSet`, `CounterGroup`), the reconciled `Record`,
//! and the row types that map onto the SQLite tables.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use crate::error::{Error, Result};
use crate::services::reconcile::{reconcile, ReconcileOutcome};

// ============ Counters ============

/// Monochrome and color meters of one subsystem (copier or printer)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CounterSet {
    pub monochrome: u32,
    pub color: u32,
}

impl CounterSet {
    pub fn new(monochrome: u32, color: u32) -> Self {
        Self { monochrome, color }
    }

    pub fn total(&self) -> u64 {
        u64::from(self.monochrome) + u64::from(self.color)
    }
}

/// One full reading of a device for one user.
///
/// The same shape is used for the reported usage of a record, in which case
/// the meters hold a difference rather than an absolute reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CounterGroup {
    pub timestamp: NaiveDateTime,
    pub copier: CounterSet,
    pub printer: CounterSet,
}

impl CounterGroup {
    pub fn new(timestamp: NaiveDateTime, copier: CounterSet, printer: CounterSet) -> Self {
        Self {
            timestamp,
            copier,
            printer,
        }
    }

    /// Build a group from meter values given in [`Meter::ALL`] order
    pub fn from_meters(timestamp: NaiveDateTime, meters: [u32; 4]) -> Self {
        Self {
            timestamp,
            copier: CounterSet::new(meters[0], meters[1]),
            printer: CounterSet::new(meters[2], meters[3]),
        }
    }

    /// Value of a single meter
    pub fn meter(&self, meter: Meter) -> u32 {
        match meter {
            Meter::CopierMonochrome => self.copier.monochrome,
            Meter::CopierColor => self.copier.color,
            Meter::PrinterMonochrome => self.printer.monochrome,
            Meter::PrinterColor => self.printer.color,
        }
    }

    /// Copier plus printer monochrome pages
    pub fn monochrome(&self) -> u64 {
        u64::from(self.copier.monochrome) + u64::from(self.printer.monochrome)
    }

    /// Copier plus printer color pages
    pub fn color(&self) -> u64 {
        u64::from(self.copier.color) + u64::from(self.printer.color)
    }

    /// Sum of all four meters
    pub fn total(&self) -> u64 {
        self.copier.total() + self.printer.total()
    }
}

/// The four meters of a reading, in the order reconciliation evaluates them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Meter {
    CopierMonochrome,
    CopierColor,
    PrinterMonochrome,
    PrinterColor,
}

impl Meter {
    pub const ALL: [Meter; 4] = [
        Meter::CopierMonochrome,
        Meter::CopierColor,
        Meter::PrinterMonochrome,
        Meter::PrinterColor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Meter::CopierMonochrome => "copier_monochrome",
            Meter::CopierColor => "copier_color",
            Meter::PrinterMonochrome => "printer_monochrome",
            Meter::PrinterColor => "printer_color",
        }
    }
}

impl fmt::Display for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============ Record ============

/// Usage of one device/user pair over a reporting period.
///
/// The reported counters are computed once from `(first, last)` when the
/// record is built; the record exposes read accessors only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    enterprise: String,
    area: String,
    user: String,
    first: Option<CounterGroup>,
    last: CounterGroup,
    #[serde(rename = "final")]
    reported: CounterGroup,
    outcome: ReconcileOutcome,
}

impl Record {
    pub fn new(
        enterprise: impl Into<String>,
        area: impl Into<String>,
        user: impl Into<String>,
        first: Option<CounterGroup>,
        last: CounterGroup,
    ) -> Self {
        let reconciliation = reconcile(first.as_ref(), &last);

        Self {
            enterprise: enterprise.into(),
            area: area.into(),
            user: user.into(),
            first,
            last,
            reported: reconciliation.counters,
            outcome: reconciliation.outcome,
        }
    }

    pub fn enterprise(&self) -> &str {
        &self.enterprise
    }

    pub fn area(&self) -> &str {
        &self.area
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn first(&self) -> Option<&CounterGroup> {
        self.first.as_ref()
    }

    pub fn last(&self) -> &CounterGroup {
        &self.last
    }

    /// Counters reported for the period (delta, or `last` on fallback)
    pub fn final_counters(&self) -> &CounterGroup {
        &self.reported
    }

    pub fn outcome(&self) -> ReconcileOutcome {
        self.outcome
    }

    /// Whether the record has any usage to bill
    pub fn is_reportable(&self) -> bool {
        self.reported.total() > 0
    }
}

// ============ Database rows ============

/// Enterprise model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Enterprise {
    pub id: i64,
    pub name: String,
    pub sort_order: i64,
}

/// Area model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Area {
    pub id: i64,
    pub name: String,
    pub sort_order: i64,
}

/// Printer model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Printer {
    pub id: i64,
    pub ip: String,
    pub enterprise_id: i64,
    pub area_id: i64,
    pub sort_order: i64,
    pub counter: Option<i64>,
    pub counter_updated_at: Option<String>,
}

/// Printer joined with its enterprise and area names
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PrinterListing {
    pub id: i64,
    pub ip: String,
    pub enterprise: String,
    pub area: String,
    pub counter: Option<i64>,
    pub counter_updated_at: Option<String>,
}

/// User model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub code: i64,
    pub name: String,
}

/// A (printer, user) pair with readings inside a period, names resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ActivePair {
    pub printer_id: i64,
    pub user_id: i64,
    pub enterprise: String,
    pub area: String,
    pub user: String,
}

/// A reading collected from a device, ready to be stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterReading {
    pub printer_id: i64,
    pub user_id: i64,
    pub taken_at: NaiveDateTime,
    pub copier: CounterSet,
    pub printer: CounterSet,
}

/// Row of the `counters` table
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StoredReading {
    pub printer_id: i64,
    pub user_id: i64,
    pub date: String,
    pub time: String,
    pub copier_bw: i64,
    pub copier_color: i64,
    pub printer_bw: i64,
    pub printer_color: i64,
}

impl StoredReading {
    /// Convert the row into a counter group.
    ///
    /// Fails with a validation error when a stored value cannot be a meter
    /// reading (negative or wider than 32 bits) or the date/time is malformed.
    pub fn to_counter_group(&self) -> Result<CounterGroup> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|_| {
            Error::validation(format!(
                "invalid reading date '{}' for printer {} / user {}",
                self.date, self.printer_id, self.user_id
            ))
        })?;
        let time = chrono::NaiveTime::parse_from_str(&self.time, "%H:%M:%S").map_err(|_| {
            Error::validation(format!(
                "invalid reading time '{}' for printer {} / user {}",
                self.time, self.printer_id, self.user_id
            ))
        })?;

        let meters = [
            self.meter_value("copier_bw", self.copier_bw)?,
            self.meter_value("copier_color", self.copier_color)?,
            self.meter_value("printer_bw", self.printer_bw)?,
            self.meter_value("printer_color", self.printer_color)?,
        ];

        Ok(CounterGroup::from_meters(date.and_time(time), meters))
    }

    fn meter_value(&self, column: &str, value: i64) -> Result<u32> {
        u32::try_from(value).map_err(|_| {
            Error::validation(format!(
                "counter {} = {} out of range for printer {} / user {}",
                column, value, self.printer_id, self.user_id
            ))
        })
    }
}
