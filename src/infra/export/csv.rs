use std::path::Path;

use anyhow::{Context, Result};

use super::ExportTable;

pub fn write_csv(csv_path: &Path, table: &ExportTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(csv_path)
        .with_context(|| format!("failed to create csv: {}", csv_path.display()))?;

    writer
        .write_record(&table.headers)
        .context("failed to write csv header")?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(|cell| cell.as_text()))
            .context("failed to write csv record")?;
    }
    writer.flush().context("failed to flush csv")?;
    Ok(())
}
