use crate::error::AppError;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

pub const MIN_YEAR: i32 = 2020;
pub const MAX_YEAR: i32 = 2100;

/// Up to a quintillion rupiah per row, so sums of billions of rows still fit
/// in a `Decimal`.
pub const MAX_AMOUNT_DIGITS: usize = 18;

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("digit pattern is valid"));

/// Turns rupiah text typed by the user into an amount.
///
/// Every `.` and `,` is dropped before parsing, so `1.000.000`, `1,000,000`
/// and `1000000` are all one million. Separators are never read as a decimal
/// point.
pub fn parse_amount(input: &str) -> Result<Decimal, AppError> {
    let stripped: String = input
        .trim()
        .chars()
        .filter(|c| *c != '.' && *c != ',')
        .collect();

    if !DIGITS.is_match(&stripped) || stripped.trim_start_matches('0').len() > MAX_AMOUNT_DIGITS {
        return Err(AppError::InvalidAmount {
            input: input.to_string(),
        });
    }

    Decimal::from_str(&stripped).map_err(|_| AppError::InvalidAmount {
        input: input.to_string(),
    })
}

pub fn parse_year(input: &str) -> Result<i32, AppError> {
    let year = input.trim().parse::<i32>().map_err(|_| AppError::InvalidInput {
        field: "year",
        reason: format!("'{}' is not a number", input.trim()),
    })?;
    validate_year(year)
}

pub fn validate_year(year: i32) -> Result<i32, AppError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(AppError::InvalidInput {
            field: "year",
            reason: format!("{} is outside {}-{}", year, MIN_YEAR, MAX_YEAR),
        });
    }
    Ok(year)
}

pub fn parse_month(input: &str) -> Result<u32, AppError> {
    let month = input.trim().parse::<u32>().map_err(|_| AppError::InvalidInput {
        field: "month",
        reason: format!("'{}' is not a number", input.trim()),
    })?;
    validate_month(month)
}

pub fn validate_month(month: u32) -> Result<u32, AppError> {
    if !(1..=12).contains(&month) {
        return Err(AppError::InvalidInput {
            field: "month",
            reason: format!("{} is outside 1-12", month),
        });
    }
    Ok(month)
}

pub fn parse_id(input: &str) -> Result<i64, AppError> {
    input.trim().parse::<i64>().map_err(|_| AppError::InvalidInput {
        field: "ID",
        reason: format!("'{}' is not a number", input.trim()),
    })
}

pub fn require_text<'a>(field: &'static str, input: &'a str) -> Result<&'a str, AppError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::empty(field));
    }
    Ok(trimmed)
}
