use std::path::Path;

use anyhow::Result;

pub mod csv;
pub mod xlsx;

#[derive(Debug, Clone, PartialEq)]
pub enum ExportCell {
    Text(String),
    Number(f64),
}

impl ExportCell {
    pub fn as_text(&self) -> String {
        match self {
            ExportCell::Text(value) => value.clone(),
            ExportCell::Number(value) => value.to_string(),
        }
    }
}

/// A single worksheet ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    pub sheet_name: String,
    pub headers: Vec<String>,
    pub column_widths: Vec<f64>,
    pub rows: Vec<Vec<ExportCell>>,
}

/// Writes `table` to `path`; `.csv` goes through the csv writer, anything
/// else becomes an xlsx workbook.
pub fn write_table(path: &Path, table: &ExportTable) -> Result<()> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        csv::write_csv(path, table)
    } else {
        xlsx::write_xlsx(path, table)
    }
}
