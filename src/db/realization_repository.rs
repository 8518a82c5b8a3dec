use crate::db::decimal_column;
use crate::error::AppError;
use crate::models::realization::Realization;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

const ENTITY: &str = "realization";

fn map_realization(row: &Row<'_>) -> rusqlite::Result<Realization> {
    Ok(Realization::new(
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        decimal_column(row, 4)?,
    ))
}

pub fn add_realization(
    conn: &Connection,
    year: i32,
    month: u32,
    category: &str,
    amount: &Decimal,
) -> Result<i64, AppError> {
    conn.execute(
        "INSERT INTO realizations (year, month, category, amount) VALUES (?1, ?2, ?3, ?4)",
        params![year, month, category, amount.to_string()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_realization(
    conn: &Connection,
    id: i64,
    year: i32,
    month: u32,
    category: &str,
    amount: &Decimal,
) -> Result<(), AppError> {
    let rows = conn.execute(
        "UPDATE realizations SET year = ?1, month = ?2, category = ?3, amount = ?4 WHERE id = ?5",
        params![year, month, category, amount.to_string(), id],
    )?;
    if rows == 0 {
        return Err(AppError::NotFound { entity: ENTITY, id });
    }
    Ok(())
}

pub fn delete_realization(conn: &Connection, id: i64) -> Result<(), AppError> {
    let rows = conn.execute("DELETE FROM realizations WHERE id = ?1", [id])?;
    if rows == 0 {
        return Err(AppError::NotFound { entity: ENTITY, id });
    }
    Ok(())
}

pub fn get_realization(conn: &Connection, id: i64) -> Result<Option<Realization>, AppError> {
    let realization = conn
        .query_row(
            "SELECT id, year, month, category, amount FROM realizations WHERE id = ?1",
            [id],
            map_realization,
        )
        .optional()?;
    Ok(realization)
}

pub fn get_all_realizations(conn: &Connection) -> Result<Vec<Realization>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT id, year, month, category, amount FROM realizations ORDER BY id ASC",
    )?;
    let realizations = stmt
        .query_map([], map_realization)?
        .collect::<Result<Vec<Realization>, _>>()?;
    Ok(realizations)
}

pub fn get_realizations_filtered(
    conn: &Connection,
    year: i32,
    category: Option<&str>,
) -> Result<Vec<Realization>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT id, year, month, category, amount FROM realizations
         WHERE year = ?1 AND (?2 IS NULL OR category = ?2)
         ORDER BY id ASC",
    )?;
    let realizations = stmt
        .query_map(params![year, category], map_realization)?
        .collect::<Result<Vec<Realization>, _>>()?;
    Ok(realizations)
}

pub fn get_realization_years(conn: &Connection) -> Result<Vec<i32>, AppError> {
    let mut stmt = conn.prepare("SELECT DISTINCT year FROM realizations")?;
    let years = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<i32>, _>>()?;
    Ok(years)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;

    #[test]
    fn test_add_and_list_round_trip() {
        let conn = establish_test_connection().unwrap();
        let amount = Decimal::from(150_000_000i64);

        let id = add_realization(&conn, 2025, 2, "PKB", &amount).unwrap();

        let rows = get_all_realizations(&conn).unwrap();
        assert_eq!(rows, vec![Realization::new(id, 2025, 2, "PKB".to_string(), amount)]);
    }

    #[test]
    fn test_multiple_rows_same_month() {
        let conn = establish_test_connection().unwrap();
        add_realization(&conn, 2025, 1, "PKB", &Decimal::from(5)).unwrap();
        add_realization(&conn, 2025, 1, "PKB", &Decimal::from(7)).unwrap();

        assert_eq!(get_realizations_filtered(&conn, 2025, Some("PKB")).unwrap().len(), 2);
    }

    #[test]
    fn test_update_realization_success() {
        let conn = establish_test_connection().unwrap();
        let id = add_realization(&conn, 2025, 1, "PKB", &Decimal::from(5)).unwrap();

        update_realization(&conn, id, 2025, 12, "PAP", &Decimal::from(9)).unwrap();

        let row = get_realization(&conn, id).unwrap().unwrap();
        assert_eq!(row.month, 12);
        assert_eq!(row.category, "PAP");
        assert_eq!(row.amount, Decimal::from(9));
    }

    #[test]
    fn test_update_and_delete_missing_row() {
        let conn = establish_test_connection().unwrap();

        let update = update_realization(&conn, 3, 2025, 1, "PKB", &Decimal::ONE);
        assert!(matches!(update, Err(AppError::NotFound { entity: "realization", id: 3 })));

        let delete = delete_realization(&conn, 3);
        assert!(matches!(delete, Err(AppError::NotFound { entity: "realization", id: 3 })));
    }

    #[test]
    fn test_get_realization_missing() {
        let conn = establish_test_connection().unwrap();
        assert!(get_realization(&conn, 1).unwrap().is_none());
    }

    #[test]
    fn test_years_are_distinct() {
        let conn = establish_test_connection().unwrap();
        add_realization(&conn, 2025, 1, "PKB", &Decimal::ONE).unwrap();
        add_realization(&conn, 2025, 2, "PKB", &Decimal::ONE).unwrap();
        add_realization(&conn, 2024, 2, "PKB", &Decimal::ONE).unwrap();

        let mut years = get_realization_years(&conn).unwrap();
        years.sort();
        assert_eq!(years, vec![2024, 2025]);
    }
}
