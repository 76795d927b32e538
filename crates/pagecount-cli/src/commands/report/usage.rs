//! Report usage command
//!
//! Per-user meter usage for users with activity in the period.

use anyhow::Result;

use super::helpers::load_report;
use super::types::{PeriodArgs, UsageDisplayRow};
use crate::commands::Context;
use crate::output::{print_json, print_output, OutputFormat};

pub async fn show_usage(ctx: &Context, period: PeriodArgs) -> Result<()> {
    let report = load_report(ctx, &period).await?;
    let rows = report.usage_rows();

    if ctx.format == OutputFormat::Json {
        return print_json(&rows);
    }

    let rows: Vec<UsageDisplayRow> = rows.into_iter().map(Into::into).collect();
    print_output(&rows, ctx.format)
}
