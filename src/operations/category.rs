use crate::db::category_repository;
use crate::error::AppError;
use crate::operations::normalize::require_text;
use rusqlite::Connection;
use tracing::{debug, info};

pub fn list_categories_db(conn: &Connection) -> Result<Vec<String>, AppError> {
    category_repository::get_all_categories(conn)
}

/// Names are stored upper-cased, so `pbb` and `PBB` are the same category.
pub fn add_category_db(conn: &Connection, name: &str) -> Result<String, AppError> {
    let name = require_text("category name", name)?.to_uppercase();
    category_repository::add_category(conn, &name)?;
    info!(category = name.as_str(), "tax category added");
    Ok(name)
}

/// Maps form text to a registered category, ignoring case, and returns the
/// stored spelling. Rows already saved under a since-deleted name are not
/// affected; only new writes must pick a current category.
pub fn resolve_category(conn: &Connection, input: &str) -> Result<String, AppError> {
    let wanted = require_text("category", input)?.to_uppercase();
    category_repository::get_all_categories(conn)?
        .into_iter()
        .find(|name| name.to_uppercase() == wanted)
        .ok_or_else(|| AppError::InvalidInput {
            field: "category",
            reason: format!("'{}' is not a registered tax category", input.trim()),
        })
}

/// Deleting never touches targets or realizations that still use the name.
pub fn delete_category_db(conn: &Connection, name: &str) -> Result<(), AppError> {
    let name = require_text("category name", name)?;
    let removed = category_repository::delete_category(conn, name)?;
    if removed == 0 {
        debug!(category = name, "delete of unknown category ignored");
    } else {
        info!(category = name, "tax category deleted");
    }
    Ok(())
}
