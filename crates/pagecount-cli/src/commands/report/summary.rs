//! Report summary command
//!
//! Area and enterprise totals.

use anyhow::Result;
use pagecount_core::{AreaTotal, DateRange, EnterpriseTotal};
use serde::Serialize;

use super::helpers::load_report;
use super::types::{PeriodArgs, TotalsRow};
use crate::commands::Context;
use crate::output::{print_info, print_json, print_section, OutputFormat};

/// JSON shape of the summary command
#[derive(Debug, Serialize)]
struct SummaryOutput<'a> {
    label: String,
    range: &'a DateRange,
    resets: usize,
    areas: &'a [AreaTotal],
    enterprises: &'a [EnterpriseTotal],
}

pub async fn show_summary(ctx: &Context, period: PeriodArgs) -> Result<()> {
    let report = load_report(ctx, &period).await?;

    if ctx.format == OutputFormat::Json {
        return print_json(&SummaryOutput {
            label: report.range.label(),
            range: &report.range,
            resets: report.reset_count(),
            areas: &report.summary.areas,
            enterprises: &report.summary.enterprises,
        });
    }

    if report.summary.is_empty() {
        print_info("No usage recorded in this period.", ctx.quiet);
        return Ok(());
    }

    let summary = &report.summary;
    let areas: Vec<TotalsRow> = summary.area_rows().into_iter().map(Into::into).collect();
    let enterprises: Vec<TotalsRow> = summary
        .enterprise_rows()
        .into_iter()
        .map(Into::into)
        .collect();

    print_section("Areas", &areas, ctx.quiet);
    print_section("Enterprises", &enterprises, ctx.quiet);

    let monochrome: u64 = summary.enterprises.iter().map(|e| e.monochrome).sum();
    let color: u64 = summary.enterprises.iter().map(|e| e.color).sum();
    print_info(
        &format!("\nTotal: {} monochrome, {} color", monochrome, color),
        ctx.quiet,
    );

    let resets = report.reset_count();
    if resets > 0 {
        print_info(
            &format!("{} reading(s) reported whole after a counter reset", resets),
            ctx.quiet,
        );
    }

    Ok(())
}
