use crate::error::AppError;
use crate::models::view::ReportRow;
use crate::presentation::table::{REPORT_HEADERS, report_cells};
use chrono::NaiveDate;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Serializes the report with the same formatted columns the report table
/// shows. Amounts contain commas, so those fields come out quoted.
pub fn report_csv(rows: &[ReportRow]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REPORT_HEADERS)?;
    for row in rows {
        writer.write_record(report_cells(row))?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))
}

pub fn write_report_csv(path: &Path, rows: &[ReportRow]) -> Result<usize, AppError> {
    let bytes = report_csv(rows)?;
    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    info!(path = %path.display(), rows = rows.len(), "report exported");
    Ok(rows.len())
}

pub fn dated_report_file(date: NaiveDate) -> String {
    format!("laporan_pajak_{}.csv", date.format("%Y%m%d"))
}
