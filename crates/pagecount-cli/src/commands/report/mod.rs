//! Report commands
//!
//! Commands for generating counter reports: summary, usage, detail.

mod detail;
mod helpers;
mod summary;
mod types;
mod usage;

use anyhow::Result;

use crate::commands::Context;

// Re-export public types
pub use types::ReportAction;
pub(crate) use helpers::parse_date;

pub async fn execute(ctx: &Context, action: ReportAction) -> Result<()> {
    match action {
        ReportAction::Summary { period } => summary::show_summary(ctx, period).await,
        ReportAction::Usage { period } => usage::show_usage(ctx, period).await,
        ReportAction::Detail { period } => detail::show_detail(ctx, period).await,
    }
}
