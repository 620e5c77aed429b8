use std::path::Path;

use anyhow::{Context, Result};

use super::RawSheet;

pub fn read_csv_sheet(csv_path: &Path) -> Result<RawSheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;

    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record.context("failed to parse csv record")?;
        grid.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    let sheet_name = csv_path
        .file_stem()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("Sheet1")
        .to_string();

    Ok(RawSheet::from_grid(sheet_name, grid))
}
