use crate::db::target_repository;
use crate::error::AppError;
use crate::models::target::Target;
use crate::operations::category::resolve_category;
use crate::operations::normalize::{parse_amount, parse_id, parse_year};
use rusqlite::Connection;
use tracing::info;

pub fn add_target_db(conn: &Connection, year: &str, category: &str, amount_str: &str) -> Result<i64, AppError> {
    let year = parse_year(year)?;
    let category = resolve_category(conn, category)?;
    let amount = parse_amount(amount_str)?;

    let id = target_repository::add_target(conn, year, &category, &amount)?;
    info!(id, year, category = category.as_str(), %amount, "target added");
    Ok(id)
}

pub fn update_target_db(
    conn: &Connection,
    id: &str,
    year: &str,
    category: &str,
    amount_str: &str,
) -> Result<i64, AppError> {
    let id = parse_id(id)?;
    let year = parse_year(year)?;
    let category = resolve_category(conn, category)?;
    let amount = parse_amount(amount_str)?;

    target_repository::update_target(conn, id, year, &category, &amount)?;
    info!(id, year, category = category.as_str(), %amount, "target updated");
    Ok(id)
}

pub fn delete_target_db(conn: &Connection, id: &str) -> Result<i64, AppError> {
    let id = parse_id(id)?;
    target_repository::delete_target(conn, id)?;
    info!(id, "target deleted");
    Ok(id)
}

pub fn list_targets_db(conn: &Connection) -> Result<Vec<Target>, AppError> {
    target_repository::get_all_targets(conn)
}

/// Loads one row so an update form can start from the stored values.
pub fn find_target_db(conn: &Connection, id: &str) -> Result<Target, AppError> {
    let id = parse_id(id)?;
    target_repository::get_target(conn, id)?.ok_or(AppError::NotFound { entity: "target", id })
}
