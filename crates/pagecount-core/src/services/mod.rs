//! Services module

pub mod aggregate;
pub mod catalog;
pub mod period;
pub mod reconcile;
pub mod report;
pub mod snapshot;

pub use aggregate::{
    aggregate, detail_rows, usage_rows, AreaTotal, DetailRow, EnterpriseTotal, Summary, TableRow,
    UsageRow,
};
pub use period::{DateRange, Interval};
pub use reconcile::{reconcile, ReconcileOutcome, Reconciliation};
pub use report::{build_report, gather_records, Report};
pub use snapshot::{SnapshotStore, SqliteSnapshotStore};
