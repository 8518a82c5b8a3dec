use crate::db::realization_repository;
use crate::error::AppError;
use crate::models::realization::Realization;
use crate::operations::category::resolve_category;
use crate::operations::normalize::{parse_amount, parse_id, parse_month, parse_year};
use rusqlite::Connection;
use tracing::info;

pub fn add_realization_db(
    conn: &Connection,
    year: &str,
    month: &str,
    category: &str,
    amount_str: &str,
) -> Result<i64, AppError> {
    let year = parse_year(year)?;
    let month = parse_month(month)?;
    let category = resolve_category(conn, category)?;
    let amount = parse_amount(amount_str)?;

    let id = realization_repository::add_realization(conn, year, month, &category, &amount)?;
    info!(id, year, month, category = category.as_str(), %amount, "realization added");
    Ok(id)
}

pub fn update_realization_db(
    conn: &Connection,
    id: &str,
    year: &str,
    month: &str,
    category: &str,
    amount_str: &str,
) -> Result<i64, AppError> {
    let id = parse_id(id)?;
    let year = parse_year(year)?;
    let month = parse_month(month)?;
    let category = resolve_category(conn, category)?;
    let amount = parse_amount(amount_str)?;

    realization_repository::update_realization(conn, id, year, month, &category, &amount)?;
    info!(id, year, month, category = category.as_str(), %amount, "realization updated");
    Ok(id)
}

pub fn delete_realization_db(conn: &Connection, id: &str) -> Result<i64, AppError> {
    let id = parse_id(id)?;
    realization_repository::delete_realization(conn, id)?;
    info!(id, "realization deleted");
    Ok(id)
}

pub fn list_realizations_db(conn: &Connection) -> Result<Vec<Realization>, AppError> {
    realization_repository::get_all_realizations(conn)
}

pub fn find_realization_db(conn: &Connection, id: &str) -> Result<Realization, AppError> {
    let id = parse_id(id)?;
    realization_repository::get_realization(conn, id)?
        .ok_or(AppError::NotFound { entity: "realization", id })
}
