//! Report periods
//!
//! Named intervals and explicit date ranges for counter reports. Weeks run
//! Monday to Sunday.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Inclusive range of report dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub thru: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, thru: NaiveDate) -> Result<Self> {
        if from > thru {
            return Err(Error::validation(format!(
                "start date {} is after end date {}",
                from, thru
            )));
        }
        Ok(Self { from, thru })
    }

    /// Range from optional bounds; a single bound means that single day
    pub fn from_bounds(from: Option<NaiveDate>, thru: Option<NaiveDate>) -> Result<Option<Self>> {
        match (from, thru) {
            (Some(from), Some(thru)) => Self::new(from, thru).map(Some),
            (Some(day), None) | (None, Some(day)) => Self::new(day, day).map(Some),
            (None, None) => Ok(None),
        }
    }

    /// Date used to look up the reading that opens the period
    pub fn opening_date(&self) -> NaiveDate {
        self.from - Duration::days(1)
    }

    /// Whether the range covers exactly one calendar month
    pub fn is_whole_month(&self) -> bool {
        self.from == first_of_month(self.from) && self.thru == last_of_month(self.from)
    }

    /// Short name for the period: `YYYY-MM` for a whole month, otherwise
    /// `YYYY-MM-DD_YYYY-MM-DD`
    pub fn label(&self) -> String {
        if self.is_whole_month() {
            self.from.format("%Y-%m").to_string()
        } else {
            format!("{}_{}", self.from.format("%Y-%m-%d"), self.thru.format("%Y-%m-%d"))
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.from, self.thru)
    }
}

/// Named report interval relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    LastTwoWeeks,
    ThisMonth,
    #[default]
    LastMonth,
}

impl Interval {
    pub const ALL: [Interval; 7] = [
        Interval::Today,
        Interval::Yesterday,
        Interval::ThisWeek,
        Interval::LastWeek,
        Interval::LastTwoWeeks,
        Interval::ThisMonth,
        Interval::LastMonth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Today => "today",
            Interval::Yesterday => "yesterday",
            Interval::ThisWeek => "this-week",
            Interval::LastWeek => "last-week",
            Interval::LastTwoWeeks => "last-two-weeks",
            Interval::ThisMonth => "this-month",
            Interval::LastMonth => "last-month",
        }
    }

    /// Resolve the interval to a date range relative to `today`
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        let monday = monday_of(today);
        let (from, thru) = match self {
            Interval::Today => (today, today),
            Interval::Yesterday => {
                let day = today - Duration::days(1);
                (day, day)
            }
            Interval::ThisWeek => (monday, monday + Duration::days(6)),
            Interval::LastWeek => (monday - Duration::days(7), monday - Duration::days(1)),
            Interval::LastTwoWeeks => (monday - Duration::days(14), monday - Duration::days(1)),
            Interval::ThisMonth => (first_of_month(today), last_of_month(today)),
            Interval::LastMonth => {
                let previous = first_of_month(today) - Duration::days(1);
                (first_of_month(previous), previous)
            }
        };
        DateRange { from, thru }
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Interval::ALL
            .iter()
            .copied()
            .find(|i| i.as_str() == normalized)
            .ok_or_else(|| {
                let names: Vec<&str> = Interval::ALL.iter().map(|i| i.as_str()).collect();
                format!("Invalid interval: {}. Use one of: {}", s, names.join(", "))
            })
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    // 32 days past the 1st always lands in the following month
    let next_month = first_of_month(date) + Duration::days(32);
    first_of_month(next_month) - Duration::days(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // 2025-06-18 is a Wednesday
    const TODAY: &str = "2025-06-18";

    #[test]
    fn test_today_and_yesterday() {
        let today = d(TODAY);
        assert_eq!(Interval::Today.resolve(today), DateRange { from: today, thru: today });
        assert_eq!(
            Interval::Yesterday.resolve(today),
            DateRange { from: d("2025-06-17"), thru: d("2025-06-17") }
        );
    }

    #[test]
    fn test_weeks_run_monday_to_sunday() {
        let today = d(TODAY);
        assert_eq!(
            Interval::ThisWeek.resolve(today),
            DateRange { from: d("2025-06-16"), thru: d("2025-06-22") }
        );
        assert_eq!(
            Interval::LastWeek.resolve(today),
            DateRange { from: d("2025-06-09"), thru: d("2025-06-15") }
        );
        assert_eq!(
            Interval::LastTwoWeeks.resolve(today),
            DateRange { from: d("2025-06-02"), thru: d("2025-06-15") }
        );
    }

    #[test]
    fn test_week_resolution_on_sunday() {
        let sunday = d("2025-06-22");
        assert_eq!(Interval::ThisWeek.resolve(sunday).from, d("2025-06-16"));
    }

    #[test]
    fn test_months() {
        let today = d(TODAY);
        assert_eq!(
            Interval::ThisMonth.resolve(today),
            DateRange { from: d("2025-06-01"), thru: d("2025-06-30") }
        );
        assert_eq!(
            Interval::LastMonth.resolve(today),
            DateRange { from: d("2025-05-01"), thru: d("2025-05-31") }
        );
    }

    #[test]
    fn test_last_month_across_year_and_leap_february() {
        assert_eq!(
            Interval::LastMonth.resolve(d("2025-01-10")),
            DateRange { from: d("2024-12-01"), thru: d("2024-12-31") }
        );
        assert_eq!(
            Interval::LastMonth.resolve(d("2024-03-31")),
            DateRange { from: d("2024-02-01"), thru: d("2024-02-29") }
        );
    }

    #[test]
    fn test_interval_from_str() {
        assert_eq!("last-month".parse::<Interval>().unwrap(), Interval::LastMonth);
        assert_eq!("THIS_WEEK".parse::<Interval>().unwrap(), Interval::ThisWeek);
        let err = "fortnight".parse::<Interval>().unwrap_err();
        assert!(err.contains("fortnight"));
        assert!(err.contains("last-two-weeks"));
    }

    #[test]
    fn test_default_interval_is_last_month() {
        assert_eq!(Interval::default(), Interval::LastMonth);
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        assert!(DateRange::new(d("2025-06-02"), d("2025-06-01")).is_err());
        assert!(DateRange::new(d("2025-06-01"), d("2025-06-01")).is_ok());
    }

    #[test]
    fn test_single_bound_means_single_day() {
        let range = DateRange::from_bounds(Some(d("2025-06-03")), None).unwrap().unwrap();
        assert_eq!(range.from, range.thru);
        let range = DateRange::from_bounds(None, Some(d("2025-06-04"))).unwrap().unwrap();
        assert_eq!(range.from, d("2025-06-04"));
        assert!(DateRange::from_bounds(None, None).unwrap().is_none());
    }

    #[test]
    fn test_opening_date_is_day_before_start() {
        let range = DateRange::new(d("2025-03-01"), d("2025-03-31")).unwrap();
        assert_eq!(range.opening_date(), d("2025-02-28"));
    }

    #[test]
    fn test_label() {
        let month = DateRange::new(d("2025-02-01"), d("2025-02-28")).unwrap();
        assert_eq!(month.label(), "2025-02");
        let partial = DateRange::new(d("2025-02-03"), d("2025-02-09")).unwrap();
        assert_eq!(partial.label(), "2025-02-03_2025-02-09");
    }
}
