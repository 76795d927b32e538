//! Counter Reconciliation
//!
//! Turns the prior and current readings of one device/user pair into the
//! usage reported for the period.
//!
//! # Rules
//!
//! - No prior reading, or a prior reading that is not strictly older than
//!   the current one: report the current reading as-is.
//! - Otherwise each meter reports `last - first`, evaluated in
//!   [`Meter::ALL`] order.
//! - If any meter went backwards (the device counters were reset between
//!   the two readings) the whole current reading is reported as-is. The
//!   first decreasing meter stops the evaluation.
//!
//! The result always carries the current reading's timestamp.

use serde::Serialize;
use std::cmp::Ordering;

use crate::models::{CounterGroup, Meter};

/// How the reported counters of a record were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// Per-meter difference between the two readings
    Delta,
    /// No earlier reading exists for the pair
    NoPriorReading,
    /// The earlier reading is not older than the current one
    OutOfOrder,
    /// A meter decreased between readings
    Reset { meter: Meter },
}

impl ReconcileOutcome {
    /// Whether the current reading was reported verbatim
    pub fn is_verbatim(&self) -> bool {
        !matches!(self, ReconcileOutcome::Delta)
    }

    pub fn label(&self) -> String {
        match self {
            ReconcileOutcome::Delta => "delta".to_string(),
            ReconcileOutcome::NoPriorReading => "no prior reading".to_string(),
            ReconcileOutcome::OutOfOrder => "out of order".to_string(),
            ReconcileOutcome::Reset { meter } => format!("reset ({})", meter),
        }
    }
}

/// Reported counters plus the path that produced them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    pub counters: CounterGroup,
    pub outcome: ReconcileOutcome,
}

impl Reconciliation {
    fn verbatim(last: &CounterGroup, outcome: ReconcileOutcome) -> Self {
        Self {
            counters: *last,
            outcome,
        }
    }
}

/// Compute the usage between two readings of the same device/user pair
pub fn reconcile(first: Option<&CounterGroup>, last: &CounterGroup) -> Reconciliation {
    let first = match first {
        None => return Reconciliation::verbatim(last, ReconcileOutcome::NoPriorReading),
        Some(first) if first.timestamp >= last.timestamp => {
            return Reconciliation::verbatim(last, ReconcileOutcome::OutOfOrder)
        }
        Some(first) => first,
    };

    let mut deltas = [0u32; 4];
    for (delta, meter) in deltas.iter_mut().zip(Meter::ALL) {
        let (before, after) = (first.meter(meter), last.meter(meter));
        match after.cmp(&before) {
            Ordering::Greater => *delta = after - before,
            Ordering::Equal => *delta = 0,
            Ordering::Less => {
                return Reconciliation::verbatim(last, ReconcileOutcome::Reset { meter })
            }
        }
    }

    Reconciliation {
        counters: CounterGroup::from_meters(last.timestamp, deltas),
        outcome: ReconcileOutcome::Delta,
    }
}
