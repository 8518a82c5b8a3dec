use crate::db::decimal_column;
use crate::error::AppError;
use crate::models::target::Target;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

const ENTITY: &str = "target";

fn map_target(row: &Row<'_>) -> rusqlite::Result<Target> {
    Ok(Target::new(
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        decimal_column(row, 3)?,
    ))
}

pub fn add_target(conn: &Connection, year: i32, category: &str, amount: &Decimal) -> Result<i64, AppError> {
    conn.execute(
        "INSERT INTO targets (year, category, amount) VALUES (?1, ?2, ?3)",
        params![year, category, amount.to_string()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_target(
    conn: &Connection,
    id: i64,
    year: i32,
    category: &str,
    amount: &Decimal,
) -> Result<(), AppError> {
    let rows = conn.execute(
        "UPDATE targets SET year = ?1, category = ?2, amount = ?3 WHERE id = ?4",
        params![year, category, amount.to_string(), id],
    )?;
    if rows == 0 {
        return Err(AppError::NotFound { entity: ENTITY, id });
    }
    Ok(())
}

pub fn delete_target(conn: &Connection, id: i64) -> Result<(), AppError> {
    let rows = conn.execute("DELETE FROM targets WHERE id = ?1", [id])?;
    if rows == 0 {
        return Err(AppError::NotFound { entity: ENTITY, id });
    }
    Ok(())
}

pub fn get_target(conn: &Connection, id: i64) -> Result<Option<Target>, AppError> {
    let target = conn
        .query_row(
            "SELECT id, year, category, amount FROM targets WHERE id = ?1",
            [id],
            map_target,
        )
        .optional()?;
    Ok(target)
}

pub fn get_all_targets(conn: &Connection) -> Result<Vec<Target>, AppError> {
    let mut stmt = conn.prepare("SELECT id, year, category, amount FROM targets ORDER BY id ASC")?;
    let targets = stmt
        .query_map([], map_target)?
        .collect::<Result<Vec<Target>, _>>()?;
    Ok(targets)
}

/// Targets for one year, optionally narrowed to one category.
pub fn get_targets_filtered(
    conn: &Connection,
    year: i32,
    category: Option<&str>,
) -> Result<Vec<Target>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT id, year, category, amount FROM targets
         WHERE year = ?1 AND (?2 IS NULL OR category = ?2)
         ORDER BY id ASC",
    )?;
    let targets = stmt
        .query_map(params![year, category], map_target)?
        .collect::<Result<Vec<Target>, _>>()?;
    Ok(targets)
}

pub fn get_target_years(conn: &Connection) -> Result<Vec<i32>, AppError> {
    let mut stmt = conn.prepare("SELECT DISTINCT year FROM targets")?;
    let years = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<i32>, _>>()?;
    Ok(years)
}
