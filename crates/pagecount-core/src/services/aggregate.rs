//! Report Aggregation
//!
//! Folds reconciled records into area and enterprise totals, plus the
//! per-user listings shown alongside them.
//!
//! Grouping keeps the first-seen order of the input: callers sort records
//! upstream (enterprise, area, printer, user) and the fold never re-sorts.
//! Only records with non-zero reported usage reach the summary tables.

use serde::Serialize;
use std::collections::HashMap;

use crate::models::{CounterGroup, Record};
use crate::services::reconcile::ReconcileOutcome;

// ============ Types ============

/// Totals of one area within an enterprise
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaTotal {
    pub enterprise: String,
    pub area: String,
    pub monochrome: u64,
    pub color: u64,
}

/// Totals of one enterprise across its areas
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnterpriseTotal {
    pub enterprise: String,
    pub monochrome: u64,
    pub color: u64,
}

/// Output row handed to a rendering sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub label: String,
    pub monochrome: u64,
    pub color: u64,
}

/// Area and enterprise summary tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub areas: Vec<AreaTotal>,
    pub enterprises: Vec<EnterpriseTotal>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Area table rows, labelled `"<enterprise> / <area>"`
    pub fn area_rows(&self) -> Vec<TableRow> {
        self.areas
            .iter()
            .map(|a| TableRow {
                label: format!("{} / {}", a.enterprise, a.area),
                monochrome: a.monochrome,
                color: a.color,
            })
            .collect()
    }

    pub fn enterprise_rows(&self) -> Vec<TableRow> {
        self.enterprises
            .iter()
            .map(|e| TableRow {
                label: e.enterprise.clone(),
                monochrome: e.monochrome,
                color: e.color,
            })
            .collect()
    }
}

/// Per-user usage of a reportable record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageRow {
    pub enterprise: String,
    pub area: String,
    pub user: String,
    pub copier_monochrome: u32,
    pub copier_color: u32,
    pub printer_monochrome: u32,
    pub printer_color: u32,
}

/// Full detail of a record: both readings and the reported counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub enterprise: String,
    pub area: String,
    pub user: String,
    pub first: Option<CounterGroup>,
    pub last: CounterGroup,
    #[serde(rename = "final")]
    pub reported: CounterGroup,
    pub outcome: ReconcileOutcome,
}

// ============ Folding ============

/// Areas of one enterprise in first-seen order
struct EnterpriseGroup<'a> {
    name: &'a str,
    areas: Vec<AreaTotal>,
    area_index: HashMap<&'a str, usize>,
}

impl<'a> EnterpriseGroup<'a> {
    fn new(name: &'a str) -> Self {
        Self {
            name,
            areas: Vec::new(),
            area_index: HashMap::new(),
        }
    }

    fn area_mut(&mut self, area: &'a str) -> &mut AreaTotal {
        let idx = match self.area_index.get(area) {
            Some(&idx) => idx,
            None => {
                self.areas.push(AreaTotal {
                    enterprise: self.name.to_string(),
                    area: area.to_string(),
                    monochrome: 0,
                    color: 0,
                });
                let idx = self.areas.len() - 1;
                self.area_index.insert(area, idx);
                idx
            }
        };
        &mut self.areas[idx]
    }
}

/// Build the area and enterprise tables from reconciled records
pub fn aggregate(records: &[Record]) -> Summary {
    // Pass 1: ordered grouping enterprise -> areas
    let mut groups: Vec<EnterpriseGroup<'_>> = Vec::new();
    let mut group_index: HashMap<&str, usize> = HashMap::new();

    for record in records.iter().filter(|r| r.is_reportable()) {
        let idx = match group_index.get(record.enterprise()) {
            Some(&idx) => idx,
            None => {
                groups.push(EnterpriseGroup::new(record.enterprise()));
                let idx = groups.len() - 1;
                group_index.insert(record.enterprise(), idx);
                idx
            }
        };

        let counters = record.final_counters();
        let area = groups[idx].area_mut(record.area());
        area.monochrome += counters.monochrome();
        area.color += counters.color();
    }

    // Pass 2: flatten into row sequences
    let enterprises = groups
        .iter()
        .map(|group| EnterpriseTotal {
            enterprise: group.name.to_string(),
            monochrome: group.areas.iter().map(|a| a.monochrome).sum(),
            color: group.areas.iter().map(|a| a.color).sum(),
        })
        .collect();
    let areas = groups.into_iter().flat_map(|group| group.areas).collect();

    Summary { areas, enterprises }
}

/// One row per record with usage in the period, input order preserved
pub fn usage_rows(records: &[Record]) -> Vec<UsageRow> {
    records
        .iter()
        .filter(|r| r.is_reportable())
        .map(|r| {
            let counters = r.final_counters();
            UsageRow {
                enterprise: r.enterprise().to_string(),
                area: r.area().to_string(),
                user: r.user().to_string(),
                copier_monochrome: counters.copier.monochrome,
                copier_color: counters.copier.color,
                printer_monochrome: counters.printer.monochrome,
                printer_color: counters.printer.color,
            }
        })
        .collect()
}

/// One row per record, including those without usage
pub fn detail_rows(records: &[Record]) -> Vec<DetailRow> {
    records
        .iter()
        .map(|r| DetailRow {
            enterprise: r.enterprise().to_string(),
            area: r.area().to_string(),
            user: r.user().to_string(),
            first: r.first().copied(),
            last: *r.last(),
            reported: *r.final_counters(),
            outcome: r.outcome(),
        })
        .collect()
}
