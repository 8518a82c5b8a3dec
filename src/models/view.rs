use crate::error::AppError;
use rust_decimal::Decimal;
use std::fmt;

/// Which side of the comparison a summed amount belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SeriesKind {
    Target,
    Realization,
}

impl SeriesKind {
    pub fn label(self) -> &'static str {
        match self {
            SeriesKind::Target => "Target",
            SeriesKind::Realization => "Realization",
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub category: String,
    pub amount: Decimal,
    pub kind: SeriesKind,
}

/// How the comparison chart should be laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartLayout {
    /// One facet per category, each with a Target and a Realization bar.
    Faceted,
    /// A single two-bar comparison for the selected category.
    Single,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonView {
    pub year: i32,
    pub category: Option<String>,
    pub layout: ChartLayout,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonView {
    pub fn total(&self, kind: SeriesKind) -> Result<Decimal, AppError> {
        self.rows
            .iter()
            .filter(|row| row.kind == kind)
            .try_fold(Decimal::ZERO, |acc, row| acc.checked_add(row.amount))
            .ok_or(AppError::AmountOverflow)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPoint {
    pub month: u32,
    pub month_label: &'static str,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTrend {
    pub year: i32,
    pub category: String,
    pub points: Vec<MonthlyPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub year: i32,
    pub category: String,
    pub target: Decimal,
    pub realized: Decimal,
    pub achievement_pct: Decimal,
}

/// Result of a chart query. `NoData` is a normal answer, not an error: the
/// caller shows a message instead of an empty chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewData<T> {
    Ready(T),
    NoData,
}

impl<T> ViewData<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            ViewData::Ready(value) => Some(value),
            ViewData::NoData => None,
        }
    }
}
