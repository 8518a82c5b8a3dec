//! Read-side queries behind the public charts and the admin report.
//!
//! Rows are filtered in SQL and summed here with `Decimal`, so totals are
//! exact no matter how many rows feed them.

use crate::db::{realization_repository, target_repository};
use crate::error::AppError;
use crate::models::view::{
    ChartLayout, ComparisonRow, ComparisonView, MonthlyPoint, MonthlyTrend, ReportRow, SeriesKind,
    ViewData,
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

pub fn month_label(month: u32) -> Option<&'static str> {
    let idx = month.checked_sub(1)? as usize;
    MONTH_LABELS.get(idx).copied()
}

/// Target versus realization totals per category for one year.
///
/// With no category filter every category becomes its own facet; with a
/// filter the result is a single two-bar comparison. Either side being empty
/// yields `NoData`.
pub fn comparison_view(
    conn: &Connection,
    year: i32,
    category: Option<&str>,
) -> Result<ViewData<ComparisonView>, AppError> {
    let targets = target_repository::get_targets_filtered(conn, year, category)?;
    let realizations = realization_repository::get_realizations_filtered(conn, year, category)?;
    debug!(year, ?category, targets = targets.len(), realizations = realizations.len(), "comparison query");

    if targets.is_empty() || realizations.is_empty() {
        return Ok(ViewData::NoData);
    }

    let target_sums = sum_by_key(targets.iter().map(|t| (t.category.clone(), t.amount)))?;
    let realization_sums = sum_by_key(realizations.iter().map(|r| (r.category.clone(), r.amount)))?;

    let mut rows: Vec<ComparisonRow> = target_sums
        .into_iter()
        .map(|(category, amount)| ComparisonRow {
            category,
            amount,
            kind: SeriesKind::Target,
        })
        .chain(realization_sums.into_iter().map(|(category, amount)| ComparisonRow {
            category,
            amount,
            kind: SeriesKind::Realization,
        }))
        .collect();
    rows.sort_by(|a, b| a.category.cmp(&b.category).then(a.kind.cmp(&b.kind)));

    let layout = match category {
        Some(_) => ChartLayout::Single,
        None => ChartLayout::Faceted,
    };

    Ok(ViewData::Ready(ComparisonView {
        year,
        category: category.map(str::to_string),
        layout,
        rows,
    }))
}

/// Realization per month for a single category, January first.
pub fn monthly_trend(conn: &Connection, year: i32, category: &str) -> Result<ViewData<MonthlyTrend>, AppError> {
    let targets = target_repository::get_targets_filtered(conn, year, Some(category))?;
    let realizations = realization_repository::get_realizations_filtered(conn, year, Some(category))?;

    if targets.is_empty() || realizations.is_empty() {
        return Ok(ViewData::NoData);
    }

    let by_month = sum_by_key(realizations.iter().map(|r| (r.month, r.amount)))?;
    let mut points = Vec::with_capacity(by_month.len());
    for (month, amount) in by_month {
        match month_label(month) {
            Some(month_label) => points.push(MonthlyPoint {
                month,
                month_label,
                amount,
            }),
            None => warn!(month, category, "skipping realization with month outside 1-12"),
        }
    }

    Ok(ViewData::Ready(MonthlyTrend {
        year,
        category: category.to_string(),
        points,
    }))
}

/// One row per (year, category) found in the targets, with the realization
/// for the same pair summed alongside (zero when there is none).
///
/// Duplicate target rows for a pair are added together.
pub fn report(conn: &Connection) -> Result<Vec<ReportRow>, AppError> {
    let targets = target_repository::get_all_targets(conn)?;
    let realizations = realization_repository::get_all_realizations(conn)?;

    let target_sums = sum_by_key(targets.iter().map(|t| ((t.year, t.category.clone()), t.amount)))?;
    let realization_sums =
        sum_by_key(realizations.iter().map(|r| ((r.year, r.category.clone()), r.amount)))?;

    let rows: Vec<ReportRow> = target_sums
        .into_iter()
        .map(|((year, category), target)| {
            let realized = realization_sums
                .get(&(year, category.clone()))
                .copied()
                .unwrap_or(Decimal::ZERO);
            ReportRow {
                year,
                category,
                target,
                realized,
                achievement_pct: achievement_pct(realized, target),
            }
        })
        .collect();

    debug!(rows = rows.len(), "report built");
    Ok(rows)
}

/// `realized / target * 100`. A zero target (or an overflowing quotient)
/// gives 0.
pub fn achievement_pct(realized: Decimal, target: Decimal) -> Decimal {
    if target.is_zero() {
        return Decimal::ZERO;
    }
    realized
        .checked_div(target)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Years that have any target or realization, newest first.
pub fn available_years(conn: &Connection) -> Result<Vec<i32>, AppError> {
    let mut years: BTreeSet<i32> = target_repository::get_target_years(conn)?.into_iter().collect();
    years.extend(realization_repository::get_realization_years(conn)?);
    Ok(years.into_iter().rev().collect())
}

/// Category names that appear in the data, including ones whose category
/// has since been deleted.
pub fn available_categories(conn: &Connection) -> Result<Vec<String>, AppError> {
    let mut names: BTreeSet<String> = target_repository::get_all_targets(conn)?
        .into_iter()
        .map(|t| t.category)
        .collect();
    names.extend(
        realization_repository::get_all_realizations(conn)?
            .into_iter()
            .map(|r| r.category),
    );
    Ok(names.into_iter().collect())
}

/// The public view needs both tables to hold something before it can chart.
pub fn has_any_data(conn: &Connection) -> Result<bool, AppError> {
    let targets = target_repository::get_target_years(conn)?;
    let realizations = realization_repository::get_realization_years(conn)?;
    Ok(!targets.is_empty() && !realizations.is_empty())
}

fn sum_by_key<K: Ord>(items: impl Iterator<Item = (K, Decimal)>) -> Result<BTreeMap<K, Decimal>, AppError> {
    let mut sums = BTreeMap::new();
    for (key, amount) in items {
        let sum = sums.entry(key).or_insert(Decimal::ZERO);
        *sum = sum.checked_add(amount).ok_or(AppError::AmountOverflow)?;
    }
    Ok(sums)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;
    use crate::db::realization_repository::add_realization;
    use crate::db::target_repository::add_target;
    use crate::operations::category::delete_category_db;
    use std::str::FromStr;

    fn d(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn seed_scenario(conn: &Connection) {
        add_target(conn, 2025, "PKB", &d(1_000_000_000)).unwrap();
        add_realization(conn, 2025, 1, "PKB", &d(100_000_000)).unwrap();
        add_realization(conn, 2025, 2, "PKB", &d(150_000_000)).unwrap();
    }

    #[test]
    fn test_report_scenario() {
        let conn = establish_test_connection().unwrap();
        seed_scenario(&conn);

        let rows = report(&conn).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year, 2025);
        assert_eq!(rows[0].category, "PKB");
        assert_eq!(rows[0].target, d(1_000_000_000));
        assert_eq!(rows[0].realized, d(250_000_000));
        assert_eq!(rows[0].achievement_pct, d(25));
    }

    #[test]
    fn test_report_missing_realization_is_zero() {
        let conn = establish_test_connection().unwrap();
        add_target(&conn, 2024, "PAP", &d(500)).unwrap();

        let rows = report(&conn).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].realized, Decimal::ZERO);
        assert_eq!(rows[0].achievement_pct, Decimal::ZERO);
    }

    #[test]
    fn test_report_zero_target_gives_zero_pct() {
        let conn = establish_test_connection().unwrap();
        add_target(&conn, 2025, "PAB", &Decimal::ZERO).unwrap();
        add_realization(&conn, 2025, 3, "PAB", &d(75)).unwrap();

        let rows = report(&conn).unwrap();
        assert_eq!(rows[0].achievement_pct, Decimal::ZERO);
    }

    #[test]
    fn test_achievement_pct_zero_target_for_any_realized() {
        for realized in [0, 1, 999, 1_000_000_000_000] {
            assert_eq!(achievement_pct(d(realized), Decimal::ZERO), Decimal::ZERO);
        }
    }

    #[test]
    fn test_achievement_pct_fraction() {
        let pct = achievement_pct(d(1), d(3));
        assert_eq!(pct.round_dp(2), Decimal::from_str("33.33").unwrap());
        assert_eq!(achievement_pct(d(300), d(200)), d(150));
        assert_eq!(achievement_pct(d(-50), d(200)), d(-25));
    }

    #[test]
    fn test_report_groups_by_year_and_category() {
        let conn = establish_test_connection().unwrap();
        add_target(&conn, 2025, "PKB", &d(100)).unwrap();
        add_target(&conn, 2025, "PKB", &d(100)).unwrap();
        add_target(&conn, 2024, "PKB", &d(50)).unwrap();
        add_realization(&conn, 2025, 1, "PKB", &d(20)).unwrap();
        add_realization(&conn, 2024, 1, "PKB", &d(50)).unwrap();
        add_realization(&conn, 2025, 1, "PAP", &d(999)).unwrap();

        let rows = report(&conn).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].year, rows[0].target, rows[0].realized), (2024, d(50), d(50)));
        assert_eq!(rows[0].achievement_pct, d(100));
        assert_eq!((rows[1].year, rows[1].target, rows[1].realized), (2025, d(200), d(20)));
        assert_eq!(rows[1].achievement_pct, d(10));
    }

    #[test]
    fn test_comparison_sums_match_raw_rows() {
        let conn = establish_test_connection().unwrap();
        add_target(&conn, 2025, "PKB", &d(1000)).unwrap();
        add_target(&conn, 2025, "PKB", &d(500)).unwrap();
        add_target(&conn, 2025, "PAP", &d(300)).unwrap();
        add_target(&conn, 2024, "PAP", &d(7)).unwrap();
        add_realization(&conn, 2025, 1, "PKB", &d(200)).unwrap();
        add_realization(&conn, 2025, 5, "PKB", &d(100)).unwrap();
        add_realization(&conn, 2025, 2, "PAP", &d(50)).unwrap();

        let view = comparison_view(&conn, 2025, None).unwrap().ready().unwrap();
        assert_eq!(view.layout, ChartLayout::Faceted);
        assert_eq!(view.total(SeriesKind::Target).unwrap(), d(1800));
        assert_eq!(view.total(SeriesKind::Realization).unwrap(), d(350));
        assert_eq!(
            view.rows,
            vec![
                ComparisonRow { category: "PAP".to_string(), amount: d(300), kind: SeriesKind::Target },
                ComparisonRow { category: "PAP".to_string(), amount: d(50), kind: SeriesKind::Realization },
                ComparisonRow { category: "PKB".to_string(), amount: d(1500), kind: SeriesKind::Target },
                ComparisonRow { category: "PKB".to_string(), amount: d(300), kind: SeriesKind::Realization },
            ]
        );

        let single = comparison_view(&conn, 2025, Some("PKB")).unwrap().ready().unwrap();
        assert_eq!(single.layout, ChartLayout::Single);
        assert_eq!(single.rows.len(), 2);
        assert_eq!(single.total(SeriesKind::Target).unwrap(), d(1500));
        assert_eq!(single.total(SeriesKind::Realization).unwrap(), d(300));
    }

    #[test]
    fn test_comparison_no_data_when_either_side_empty() {
        let conn = establish_test_connection().unwrap();
        add_target(&conn, 2025, "PKB", &d(1000)).unwrap();

        assert!(matches!(comparison_view(&conn, 2025, None).unwrap(), ViewData::NoData));

        add_realization(&conn, 2025, 1, "PAP", &d(1)).unwrap();
        assert!(!matches!(comparison_view(&conn, 2025, None).unwrap(), ViewData::NoData));
        assert!(matches!(comparison_view(&conn, 2025, Some("PKB")).unwrap(), ViewData::NoData));
        assert!(matches!(comparison_view(&conn, 2030, None).unwrap(), ViewData::NoData));
    }

    #[test]
    fn test_monthly_trend_calendar_order() {
        let conn = establish_test_connection().unwrap();
        add_target(&conn, 2025, "PKB", &d(1000)).unwrap();
        for (month, amount) in [(12, 5), (3, 7), (8, 1), (1, 2), (3, 3), (10, 4)] {
            add_realization(&conn, 2025, month, "PKB", &d(amount)).unwrap();
        }

        let trend = monthly_trend(&conn, 2025, "PKB").unwrap().ready().unwrap();
        let labels: Vec<&str> = trend.points.iter().map(|p| p.month_label).collect();
        assert_eq!(labels, vec!["Jan", "Mar", "Agu", "Okt", "Des"]);

        let months: Vec<u32> = trend.points.iter().map(|p| p.month).collect();
        assert_eq!(months, vec![1, 3, 8, 10, 12]);
        assert_eq!(trend.points[1].amount, d(10));
    }

    #[test]
    fn test_monthly_trend_no_data() {
        let conn = establish_test_connection().unwrap();
        add_realization(&conn, 2025, 1, "PKB", &d(5)).unwrap();

        assert!(matches!(monthly_trend(&conn, 2025, "PKB").unwrap(), ViewData::NoData));
    }

    #[test]
    fn test_deleted_category_rows_still_reported() {
        let conn = establish_test_connection().unwrap();
        seed_scenario(&conn);

        delete_category_db(&conn, "PKB").unwrap();

        let rows = report(&conn).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "PKB");
        assert_eq!(rows[0].achievement_pct, d(25));

        let view = comparison_view(&conn, 2025, None).unwrap().ready().unwrap();
        assert_eq!(view.total(SeriesKind::Realization).unwrap(), d(250_000_000));
        assert!(available_categories(&conn).unwrap().contains(&"PKB".to_string()));
    }

    #[test]
    fn test_available_years_and_categories() {
        let conn = establish_test_connection().unwrap();
        assert!(available_years(&conn).unwrap().is_empty());
        assert!(!has_any_data(&conn).unwrap());

        add_target(&conn, 2023, "PKB", &d(1)).unwrap();
        add_realization(&conn, 2025, 1, "PAP", &d(1)).unwrap();
        add_realization(&conn, 2024, 1, "BBNKB", &d(1)).unwrap();

        assert_eq!(available_years(&conn).unwrap(), vec![2025, 2024, 2023]);
        assert_eq!(available_categories(&conn).unwrap(), vec!["BBNKB", "PAP", "PKB"]);
        assert!(has_any_data(&conn).unwrap());
    }

    #[test]
    fn test_overflowing_sum_is_an_error() {
        let conn = establish_test_connection().unwrap();
        add_target(&conn, 2025, "PKB", &Decimal::MAX).unwrap();
        add_target(&conn, 2025, "PKB", &d(1)).unwrap();
        add_realization(&conn, 2025, 1, "PKB", &d(1)).unwrap();

        assert!(matches!(report(&conn), Err(AppError::AmountOverflow)));
        assert!(matches!(comparison_view(&conn, 2025, None), Err(AppError::AmountOverflow)));
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let row = |amount| ComparisonRow {
            category: "PKB".to_string(),
            amount,
            kind: SeriesKind::Target,
        };
        let view = ComparisonView {
            year: 2025,
            category: None,
            layout: ChartLayout::Faceted,
            rows: vec![row(Decimal::MAX), row(Decimal::MAX)],
        };
        assert!(matches!(view.total(SeriesKind::Target), Err(AppError::AmountOverflow)));
        assert_eq!(view.total(SeriesKind::Realization).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(1), Some("Jan"));
        assert_eq!(month_label(5), Some("Mei"));
        assert_eq!(month_label(12), Some("Des"));
        assert_eq!(month_label(0), None);
        assert_eq!(month_label(13), None);
    }
}
