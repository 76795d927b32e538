//! Catalog of enterprises, areas, printers and users
//!
//! Provides the names and sort orders that reports resolve identities from.

use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::models::{Area, Enterprise, PrinterListing, User};

fn require_name(kind: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation(format!("{} name must not be empty", kind)));
    }
    Ok(())
}

pub async fn add_enterprise(pool: &SqlitePool, name: &str, sort_order: i64) -> Result<i64> {
    require_name("enterprise", name)?;
    let result = sqlx::query("INSERT INTO enterprises (name, sort_order) VALUES (?, ?)")
        .bind(name.trim())
        .bind(sort_order)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn add_area(pool: &SqlitePool, name: &str, sort_order: i64) -> Result<i64> {
    require_name("area", name)?;
    let result = sqlx::query("INSERT INTO areas (name, sort_order) VALUES (?, ?)")
        .bind(name.trim())
        .bind(sort_order)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

/// Add a printer; the enterprise and area must already exist
pub async fn add_printer(
    pool: &SqlitePool,
    ip: &str,
    enterprise_id: i64,
    area_id: i64,
    sort_order: i64,
) -> Result<i64> {
    if ip.trim().is_empty() {
        return Err(Error::validation("printer address must not be empty"));
    }

    let enterprise: Option<(i64,)> = sqlx::query_as("SELECT id FROM enterprises WHERE id = ?")
        .bind(enterprise_id)
        .fetch_optional(pool)
        .await?;
    if enterprise.is_none() {
        return Err(Error::not_found(format!("enterprise {}", enterprise_id)));
    }

    let area: Option<(i64,)> = sqlx::query_as("SELECT id FROM areas WHERE id = ?")
        .bind(area_id)
        .fetch_optional(pool)
        .await?;
    if area.is_none() {
        return Err(Error::not_found(format!("area {}", area_id)));
    }

    let result = sqlx::query(
        "INSERT INTO printers (ip, enterprise_id, area_id, sort_order) VALUES (?, ?, ?, ?)",
    )
    .bind(ip.trim())
    .bind(enterprise_id)
    .bind(area_id)
    .bind(sort_order)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn add_user(pool: &SqlitePool, code: i64, name: &str) -> Result<i64> {
    require_name("user", name)?;
    let result = sqlx::query("INSERT INTO users (code, name) VALUES (?, ?)")
        .bind(code)
        .bind(name.trim())
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn list_enterprises(pool: &SqlitePool) -> Result<Vec<Enterprise>> {
    let rows = sqlx::query_as::<_, Enterprise>(
        "SELECT id, name, sort_order FROM enterprises ORDER BY sort_order, name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_areas(pool: &SqlitePool) -> Result<Vec<Area>> {
    let rows = sqlx::query_as::<_, Area>(
        "SELECT id, name, sort_order FROM areas ORDER BY sort_order, name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Printers with their enterprise and area names, in report order
pub async fn list_printers(pool: &SqlitePool) -> Result<Vec<PrinterListing>> {
    let rows = sqlx::query_as::<_, PrinterListing>(
        r#"SELECT p.id, p.ip, e.name AS enterprise, a.name AS area,
                  p.counter, p.counter_updated_at
           FROM printers p
           JOIN enterprises e ON p.enterprise_id = e.id
           JOIN areas a ON p.area_id = a.id
           ORDER BY e.sort_order, a.sort_order, p.sort_order, p.id"#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query_as::<_, User>("SELECT id, code, name FROM users ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
