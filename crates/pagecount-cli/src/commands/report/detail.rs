//! Report detail command
//!
//! Opening, closing and reported readings of every active user, including
//! users without usage.

use anyhow::Result;

use super::helpers::load_report;
use super::types::{DetailDisplayRow, PeriodArgs};
use crate::commands::Context;
use crate::output::{print_json, print_output, OutputFormat};

pub async fn show_detail(ctx: &Context, period: PeriodArgs) -> Result<()> {
    let report = load_report(ctx, &period).await?;
    let rows = report.detail_rows();

    if ctx.format == OutputFormat::Json {
        return print_json(&rows);
    }

    let rows: Vec<DetailDisplayRow> = rows.into_iter().map(Into::into).collect();
    print_output(&rows, ctx.format)
}
