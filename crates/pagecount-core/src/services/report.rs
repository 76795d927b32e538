//! Report Builder
//!
//! Gathers one record per active printer/user pair from a snapshot store
//! and folds them into the summary tables.

use serde::Serialize;

use crate::error::Result;
use crate::models::Record;
use crate::services::aggregate::{aggregate, detail_rows, usage_rows, DetailRow, Summary, UsageRow};
use crate::services::period::DateRange;
use crate::services::reconcile::ReconcileOutcome;
use crate::services::snapshot::SnapshotStore;

/// A built counter report
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub range: DateRange,
    pub records: Vec<Record>,
    pub summary: Summary,
}

impl Report {
    pub fn usage_rows(&self) -> Vec<UsageRow> {
        usage_rows(&self.records)
    }

    pub fn detail_rows(&self) -> Vec<DetailRow> {
        detail_rows(&self.records)
    }

    /// Records whose counters were reset during the period
    pub fn reset_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome(), ReconcileOutcome::Reset { .. }))
            .count()
    }
}

/// Build one record per active pair, in the store's ordering
pub async fn gather_records<S>(store: &S, range: &DateRange) -> Result<Vec<Record>>
where
    S: SnapshotStore + ?Sized,
{
    let pairs = store.active_pairs(range).await?;
    let mut records = Vec::with_capacity(pairs.len());

    for pair in pairs {
        let first = store
            .get_snapshot(pair.printer_id, pair.user_id, range.opening_date())
            .await?;
        let last = match store
            .get_snapshot(pair.printer_id, pair.user_id, range.thru)
            .await?
        {
            Some(last) => last,
            None => {
                log::warn!(
                    "[report] No reading for printer {} / user {} up to {}, skipping",
                    pair.printer_id,
                    pair.user_id,
                    range.thru
                );
                continue;
            }
        };

        let record = Record::new(pair.enterprise, pair.area, pair.user, first, last);
        match record.outcome() {
            ReconcileOutcome::Reset { meter } => log::info!(
                "[report] Counter reset on printer {} / user {} ({}), reporting last reading",
                pair.printer_id,
                pair.user_id,
                meter
            ),
            ReconcileOutcome::NoPriorReading => log::debug!(
                "[report] No prior reading for printer {} / user {}",
                pair.printer_id,
                pair.user_id
            ),
            ReconcileOutcome::OutOfOrder => log::debug!(
                "[report] Prior reading not older than last for printer {} / user {}",
                pair.printer_id,
                pair.user_id
            ),
            ReconcileOutcome::Delta => {}
        }
        records.push(record);
    }

    Ok(records)
}

/// Gather records for `range` and aggregate them
pub async fn build_report<S>(store: &S, range: DateRange) -> Result<Report>
where
    S: SnapshotStore + ?Sized,
{
    let records = gather_records(store, &range).await?;
    let summary = aggregate(&records);

    log::info!(
        "[report] {} records, {} with usage, {} areas for {}",
        records.len(),
        records.iter().filter(|r| r.is_reportable()).count(),
        summary.areas.len(),
        range
    );

    Ok(Report {
        range,
        records,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivePair, CounterGroup};
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::collections::HashMap;

    /// In-memory store keyed by (printer, user)
    #[derive(Default)]
    struct MemoryStore {
        pairs: Vec<ActivePair>,
        readings: HashMap<(i64, i64), Vec<CounterGroup>>,
    }

    impl MemoryStore {
        fn add(&mut self, printer_id: i64, user_id: i64, enterprise: &str, area: &str, user: &str) {
            self.pairs.push(ActivePair {
                printer_id,
                user_id,
                enterprise: enterprise.to_string(),
                area: area.to_string(),
                user: user.to_string(),
            });
        }

        fn reading(&mut self, printer_id: i64, user_id: i64, at: &str, meters: [u32; 4]) {
            let ts = NaiveDateTime::parse_from_str(at, "%Y-%m-%d %H:%M:%S").unwrap();
            self.readings
                .entry((printer_id, user_id))
                .or_default()
                .push(CounterGroup::from_meters(ts, meters));
        }
    }

    #[async_trait]
    impl SnapshotStore for MemoryStore {
        async fn active_pairs(&self, _range: &DateRange) -> Result<Vec<ActivePair>> {
            Ok(self.pairs.clone())
        }

        async fn get_snapshot(
            &self,
            printer_id: i64,
            user_id: i64,
            as_of: NaiveDate,
        ) -> Result<Option<CounterGroup>> {
            Ok(self
                .readings
                .get(&(printer_id, user_id))
                .and_then(|rs| {
                    rs.iter()
                        .filter(|g| g.timestamp.date() <= as_of)
                        .max_by_key(|g| g.timestamp)
                })
                .copied())
        }
    }

    fn march() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_build_report_uses_opening_and_closing_readings() {
        let mut store = MemoryStore::default();
        store.add(1, 1, "Acme", "Sales", "ana");
        store.reading(1, 1, "2025-02-27 18:00:00", [90, 9, 190, 19]);
        store.reading(1, 1, "2025-02-28 18:00:00", [100, 10, 200, 20]);
        store.reading(1, 1, "2025-03-15 18:00:00", [120, 12, 210, 22]);
        store.reading(1, 1, "2025-03-31 18:00:00", [150, 15, 220, 25]);
        store.reading(1, 1, "2025-04-01 18:00:00", [999, 99, 999, 99]);

        let report = build_report(&store, march()).await.unwrap();
        assert_eq!(report.records.len(), 1);

        let reported = report.records[0].final_counters();
        assert_eq!(reported.copier.monochrome, 50);
        assert_eq!(reported.printer.color, 5);
        assert_eq!(report.summary.areas[0].monochrome, 70);
        assert_eq!(report.summary.areas[0].color, 10);
        assert_eq!(report.reset_count(), 0);
    }

    #[tokio::test]
    async fn test_first_ever_reading_is_reported_whole() {
        let mut store = MemoryStore::default();
        store.add(1, 1, "Acme", "Sales", "new");
        store.reading(1, 1, "2025-03-10 09:00:00", [40, 0, 2, 0]);

        let report = build_report(&store, march()).await.unwrap();
        assert_eq!(report.records[0].outcome(), ReconcileOutcome::NoPriorReading);
        assert_eq!(report.summary.enterprises[0].monochrome, 42);
    }

    #[tokio::test]
    async fn test_reset_is_counted_and_reported_whole() {
        let mut store = MemoryStore::default();
        store.add(1, 1, "Acme", "Sales", "ana");
        store.reading(1, 1, "2025-02-28 18:00:00", [500, 0, 0, 0]);
        store.reading(1, 1, "2025-03-31 18:00:00", [30, 0, 5, 0]);

        let report = build_report(&store, march()).await.unwrap();
        assert_eq!(report.reset_count(), 1);
        assert_eq!(report.summary.areas[0].monochrome, 35);
    }

    #[tokio::test]
    async fn test_pair_without_closing_reading_is_skipped() {
        let mut store = MemoryStore::default();
        store.add(1, 1, "Acme", "Sales", "ghost");
        store.add(2, 1, "Acme", "Sales", "ana");
        store.reading(2, 1, "2025-03-31 18:00:00", [1, 0, 0, 0]);

        let report = build_report(&store, march()).await.unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].user(), "ana");
    }

    #[tokio::test]
    async fn test_idle_users_only_in_detail() {
        let mut store = MemoryStore::default();
        store.add(1, 1, "Acme", "Sales", "idle");
        store.reading(1, 1, "2025-02-28 18:00:00", [10, 0, 0, 0]);
        store.reading(1, 1, "2025-03-31 18:00:00", [10, 0, 0, 0]);

        let report = build_report(&store, march()).await.unwrap();
        assert!(report.summary.is_empty());
        assert!(report.usage_rows().is_empty());
        assert_eq!(report.detail_rows().len(), 1);
    }
}
