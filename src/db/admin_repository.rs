use crate::error::AppError;
use crate::models::credential::AdminCredential;
use rusqlite::{Connection, params};

pub fn get_credential(conn: &Connection) -> Result<AdminCredential, AppError> {
    let credential = conn.query_row("SELECT username, password FROM admin LIMIT 1", [], |row| {
        Ok(AdminCredential::new(row.get(0)?, row.get(1)?))
    })?;
    Ok(credential)
}

/// Rewrites the only admin row, whatever its current username is.
pub fn update_credential(conn: &Connection, username: &str, password: &str) -> Result<(), AppError> {
    conn.execute(
        "UPDATE admin SET username = ?1, password = ?2",
        params![username, password],
    )?;
    Ok(())
}
