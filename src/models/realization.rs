use rust_decimal::Decimal;

/// Revenue actually collected for a category in one month. Several rows may
/// exist for the same (year, month, category); reports sum them.
#[derive(Debug, Clone, PartialEq)]
pub struct Realization {
    pub id: i64,
    pub year: i32,
    pub month: u32,
    pub category: String,
    pub amount: Decimal,
}

impl Realization {
    pub fn new(id: i64, year: i32, month: u32, category: String, amount: Decimal) -> Self {
        Self {
            id,
            year,
            month,
            category,
            amount,
        }
    }
}
