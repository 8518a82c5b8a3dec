use crate::models::view::{ChartLayout, ComparisonView, MonthlyTrend, SeriesKind};
use crate::operations::views::MONTH_LABELS;
use crate::presentation::format::format_rupiah;
use rust_decimal::Decimal;

pub const ALL_CATEGORIES: &str = "Semua Jenis Pajak";
pub const NO_DATA_AT_ALL: &str = "Belum ada data target atau realisasi yang tersedia sama sekali.";

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub kind: SeriesKind,
    pub value: Decimal,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarGroup {
    pub label: String,
    pub bars: Vec<Bar>,
}

/// Grouped bar chart: one group per facet, one bar per series kind.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartData {
    pub title: String,
    pub groups: Vec<BarGroup>,
}

impl BarChartData {
    pub fn max_value(&self) -> Decimal {
        self.groups
            .iter()
            .flat_map(|g| g.bars.iter().map(|b| b.value))
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinePoint {
    pub month: u32,
    pub value: Decimal,
    pub tooltip: String,
}

/// Line chart whose x axis is always the twelve month labels in calendar
/// order, even when only some months have points.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChartData {
    pub title: String,
    pub axis_labels: [&'static str; 12],
    pub points: Vec<LinePoint>,
}

pub fn comparison_title(year: i32, category: Option<&str>) -> String {
    match category {
        Some(category) => format!(
            "Perbandingan Realisasi vs Target Pajak {} Tahun {}",
            category, year
        ),
        None => format!("Perbandingan Realisasi vs Target Pajak Tahun {}", year),
    }
}

pub fn trend_title(year: i32, category: &str) -> String {
    format!("Progress Realisasi Pajak {} Tahun {}", category, year)
}

pub fn no_data_message(year: i32, category: Option<&str>) -> String {
    format!(
        "Belum ada data target atau realisasi untuk tahun {} dan jenis pajak {}.",
        year,
        category.unwrap_or(ALL_CATEGORIES)
    )
}

pub fn comparison_chart(view: &ComparisonView) -> BarChartData {
    let mut groups: Vec<BarGroup> = Vec::new();
    for row in &view.rows {
        let bar = Bar {
            kind: row.kind,
            value: row.amount,
            tooltip: format!("{} | {} | {}", row.category, row.kind, format_rupiah(row.amount)),
        };
        // Rows arrive sorted by category, so a new label starts a new group.
        match groups.last_mut() {
            Some(group) if group.label == row.category => group.bars.push(bar),
            _ => groups.push(BarGroup {
                label: row.category.clone(),
                bars: vec![bar],
            }),
        }
    }

    if view.layout == ChartLayout::Single && groups.is_empty() {
        groups.push(BarGroup {
            label: view.category.clone().unwrap_or_default(),
            bars: Vec::new(),
        });
    }

    BarChartData {
        title: comparison_title(view.year, view.category.as_deref()),
        groups,
    }
}

pub fn trend_chart(trend: &MonthlyTrend) -> LineChartData {
    LineChartData {
        title: trend_title(trend.year, &trend.category),
        axis_labels: MONTH_LABELS,
        points: trend
            .points
            .iter()
            .map(|p| LinePoint {
                month: p.month,
                value: p.amount,
                tooltip: format!("{} | {}", p.month_label, format_rupiah(p.amount)),
            })
            .collect(),
    }
}
