//! Catalog commands
//!
//! Commands for managing enterprises, areas, printers and users.

use anyhow::Result;
use clap::Subcommand;
use pagecount_core::services::catalog;
use pagecount_core::{Area, Enterprise, PrinterListing, User};
use serde::Serialize;
use tabled::Tabled;

use super::Context;
use crate::output::{print_output, print_success};

#[derive(Subcommand)]
pub enum CatalogAction {
    /// Add an enterprise
    AddEnterprise {
        /// Enterprise name
        name: String,

        /// Position in reports
        #[arg(short, long, default_value = "0")]
        order: i64,
    },

    /// Add an area
    AddArea {
        /// Area name
        name: String,

        /// Position in reports
        #[arg(short, long, default_value = "0")]
        order: i64,
    },

    /// Add a printer to an enterprise area
    AddPrinter {
        /// Network address
        ip: String,

        /// Enterprise id
        #[arg(short, long)]
        enterprise: i64,

        /// Area id
        #[arg(short, long)]
        area: i64,

        /// Position in reports
        #[arg(short, long, default_value = "0")]
        order: i64,
    },

    /// Add a user
    AddUser {
        /// Account code configured on the printers
        code: i64,

        /// User name
        name: String,
    },

    /// List enterprises
    Enterprises,

    /// List areas
    Areas,

    /// List printers with their enterprise, area and total counter
    Printers,

    /// List users
    Users,
}

/// Enterprise or area row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct NamedRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Order")]
    pub sort_order: i64,
}

impl From<Enterprise> for NamedRow {
    fn from(e: Enterprise) -> Self {
        Self {
            id: e.id,
            name: e.name,
            sort_order: e.sort_order,
        }
    }
}

impl From<Area> for NamedRow {
    fn from(a: Area) -> Self {
        Self {
            id: a.id,
            name: a.name,
            sort_order: a.sort_order,
        }
    }
}

/// Printer row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct PrinterRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "IP")]
    pub ip: String,
    #[tabled(rename = "Enterprise")]
    pub enterprise: String,
    #[tabled(rename = "Area")]
    pub area: String,
    #[tabled(rename = "Counter", display_with = "display_or_dash")]
    pub counter: Option<i64>,
    #[tabled(rename = "Updated", display_with = "display_or_dash")]
    pub updated: Option<String>,
}

fn display_or_dash<T: std::fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

impl From<PrinterListing> for PrinterRow {
    fn from(p: PrinterListing) -> Self {
        Self {
            id: p.id,
            ip: p.ip,
            enterprise: p.enterprise,
            area: p.area,
            counter: p.counter,
            updated: p.counter_updated_at,
        }
    }
}

/// User row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct UserRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Code")]
    pub code: i64,
    #[tabled(rename = "Name")]
    pub name: String,
}

impl From<User> for UserRow {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            code: u.code,
            name: u.name,
        }
    }
}

pub async fn execute(ctx: &Context, action: CatalogAction) -> Result<()> {
    let pool = &ctx.db.pool;

    match action {
        CatalogAction::AddEnterprise { name, order } => {
            let id = catalog::add_enterprise(pool, &name, order).await?;
            print_success(&format!("Added enterprise {} (id {})", name, id), ctx.quiet);
        }
        CatalogAction::AddArea { name, order } => {
            let id = catalog::add_area(pool, &name, order).await?;
            print_success(&format!("Added area {} (id {})", name, id), ctx.quiet);
        }
        CatalogAction::AddPrinter {
            ip,
            enterprise,
            area,
            order,
        } => {
            let id = catalog::add_printer(pool, &ip, enterprise, area, order).await?;
            print_success(&format!("Added printer {} (id {})", ip, id), ctx.quiet);
        }
        CatalogAction::AddUser { code, name } => {
            let id = catalog::add_user(pool, code, &name).await?;
            print_success(&format!("Added user {} (id {})", name, id), ctx.quiet);
        }
        CatalogAction::Enterprises => {
            let rows: Vec<NamedRow> = catalog::list_enterprises(pool)
                .await?
                .into_iter()
                .map(NamedRow::from)
                .collect();
            print_output(&rows, ctx.format)?;
        }
        CatalogAction::Areas => {
            let rows: Vec<NamedRow> = catalog::list_areas(pool)
                .await?
                .into_iter()
                .map(NamedRow::from)
                .collect();
            print_output(&rows, ctx.format)?;
        }
        CatalogAction::Printers => {
            let rows: Vec<PrinterRow> = catalog::list_printers(pool)
                .await?
                .into_iter()
                .map(PrinterRow::from)
                .collect();
            print_output(&rows, ctx.format)?;
        }
        CatalogAction::Users => {
            let rows: Vec<UserRow> = catalog::list_users(pool)
                .await?
                .into_iter()
                .map(UserRow::from)
                .collect();
            print_output(&rows, ctx.format)?;
        }
    }

    Ok(())
}
