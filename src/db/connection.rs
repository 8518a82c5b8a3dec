use crate::error::AppError;
use rusqlite::{Connection, params};
use std::path::Path;
use tracing::{debug, info};

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_CATEGORIES: [&str; 5] = ["PKB", "BBNKB", "PAP", "PAB", "Opsen MBLB"];

// Category names on target/realization rows are plain text on purpose: rows
// must outlive the category they name.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS admin (
    username TEXT PRIMARY KEY,
    password TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tax_categories (
    name TEXT PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS targets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    year INTEGER NOT NULL,
    category TEXT NOT NULL,
    amount TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS realizations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    year INTEGER NOT NULL,
    month INTEGER NOT NULL,
    category TEXT NOT NULL,
    amount TEXT NOT NULL
);
";

pub fn establish_connection(path: &Path) -> Result<Connection, AppError> {
    let conn = Connection::open(path)?;
    info!(path = %path.display(), "opened tax store");
    prepare_store(&conn)?;
    Ok(conn)
}

#[cfg(test)]
pub fn establish_test_connection() -> Result<Connection, AppError> {
    let conn = Connection::open_in_memory()?;
    prepare_store(&conn)?;
    Ok(conn)
}

fn prepare_store(conn: &Connection) -> Result<(), AppError> {
    conn.execute_batch(SCHEMA)?;
    seed_defaults(conn)
}

/// Seeds the admin account and the default tax categories, each only while
/// its table is still empty.
fn seed_defaults(conn: &Connection) -> Result<(), AppError> {
    let admins: i64 = conn.query_row("SELECT COUNT(*) FROM admin", [], |row| row.get(0))?;
    if admins == 0 {
        conn.execute(
            "INSERT INTO admin (username, password) VALUES (?1, ?2)",
            params![DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD],
        )?;
        info!("seeded default admin account");
    }

    let categories: i64 =
        conn.query_row("SELECT COUNT(*) FROM tax_categories", [], |row| row.get(0))?;
    if categories == 0 {
        for name in DEFAULT_CATEGORIES {
            conn.execute("INSERT INTO tax_categories (name) VALUES (?1)", [name])?;
        }
        info!(count = DEFAULT_CATEGORIES.len(), "seeded default tax categories");
    } else {
        debug!(categories, "tax categories already present, skipping seed");
    }

    Ok(())
}
