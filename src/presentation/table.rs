use crate::models::realization::Realization;
use crate::models::target::Target;
use crate::models::view::ReportRow;
use crate::presentation::format::{format_pct, format_rupiah};

/// A rendered table: header plus rows of display strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableData {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Plain-text rendering with padded columns, for the shell.
    pub fn to_text(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(idx) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let mut out = String::new();
        let header: Vec<String> = self.headers.iter().map(|h| h.to_string()).collect();
        push_line(&mut out, &header, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);
        for row in &self.rows {
            push_line(&mut out, row, &widths);
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

pub fn category_table(names: &[String]) -> TableData {
    TableData {
        headers: vec!["Jenis Pajak"],
        rows: names.iter().map(|name| vec![name.clone()]).collect(),
    }
}

pub fn target_table(targets: &[Target]) -> TableData {
    TableData {
        headers: vec!["ID", "Tahun", "Jenis Pajak", "Jumlah"],
        rows: targets
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.year.to_string(),
                    t.category.clone(),
                    format_rupiah(t.amount),
                ]
            })
            .collect(),
    }
}

pub fn realization_table(realizations: &[Realization]) -> TableData {
    TableData {
        headers: vec!["ID", "Tahun", "Bulan", "Jenis Pajak", "Jumlah"],
        rows: realizations
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.year.to_string(),
                    r.month.to_string(),
                    r.category.clone(),
                    format_rupiah(r.amount),
                ]
            })
            .collect(),
    }
}

pub const REPORT_HEADERS: [&str; 5] = [
    "Tahun",
    "Jenis Pajak",
    "Target (Rp)",
    "Realisasi (Rp)",
    "Pencapaian (%)",
];

pub fn report_table(rows: &[ReportRow]) -> TableData {
    TableData {
        headers: REPORT_HEADERS.to_vec(),
        rows: rows.iter().map(report_cells).collect(),
    }
}

pub(crate) fn report_cells(row: &ReportRow) -> Vec<String> {
    vec![
        row.year.to_string(),
        row.category.clone(),
        format_rupiah(row.target),
        format_rupiah(row.realized),
        format_pct(row.achievement_pct),
    ]
}
