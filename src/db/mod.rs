pub mod admin_repository;
pub mod category_repository;
pub mod connection;
pub mod realization_repository;
pub mod target_repository;

use rust_decimal::Decimal;
use rusqlite::Row;
use rusqlite::types::Type;
use std::str::FromStr;

/// Amounts are stored as TEXT so no precision is lost on the way through SQLite.
pub(crate) fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    Decimal::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
