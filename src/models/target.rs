use rust_decimal::Decimal;

/// Planned revenue for one tax category in one year.
///
/// `category` is a soft reference to a tax category name; the row survives
/// deletion of that category.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: i64,
    pub year: i32,
    pub category: String,
    pub amount: Decimal,
}

impl Target {
    pub fn new(id: i64, year: i32, category: String, amount: Decimal) -> Self {
        Self {
            id,
            year,
            category,
            amount,
        }
    }
}
