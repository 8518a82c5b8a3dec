use crate::error::AppError;
use rusqlite::{Connection, ErrorCode};

pub fn add_category(conn: &Connection, name: &str) -> Result<(), AppError> {
    match conn.execute("INSERT INTO tax_categories (name) VALUES (?1)", [name]) {
        Ok(_) => Ok(()),
        Err(e) if e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) => {
            Err(AppError::DuplicateCategory {
                name: name.to_string(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

pub fn get_all_categories(conn: &Connection) -> Result<Vec<String>, AppError> {
    let mut stmt = conn.prepare("SELECT name FROM tax_categories ORDER BY rowid ASC")?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(names)
}

/// Removes the category name only. Targets and realizations that still name
/// it are left untouched.
pub fn delete_category(conn: &Connection, name: &str) -> Result<usize, AppError> {
    let rows = conn.execute("DELETE FROM tax_categories WHERE name = ?1", [name])?;
    Ok(rows)
}
