use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

use super::{ExportCell, ExportTable};

pub fn write_xlsx(xlsx_path: &Path, table: &ExportTable) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(&table.sheet_name)
        .with_context(|| format!("invalid sheet name: {}", table.sheet_name))?;

    for (col_idx, header) in table.headers.iter().enumerate() {
        let col = u16::try_from(col_idx).context("too many columns for xlsx")?;
        worksheet
            .write_string_with_format(0, col, header, &header_format)
            .context("failed to write xlsx header")?;
        if let Some(width) = table.column_widths.get(col_idx) {
            worksheet
                .set_column_width(col, *width)
                .context("failed to set xlsx column width")?;
        }
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let sheet_row = u32::try_from(row_idx + 1).context("too many rows for xlsx")?;
        for (col_idx, cell) in row.iter().enumerate() {
            let col = u16::try_from(col_idx).context("too many columns for xlsx")?;
            match cell {
                ExportCell::Text(value) => worksheet.write_string(sheet_row, col, value),
                ExportCell::Number(value) => worksheet.write_number(sheet_row, col, *value),
            }
            .context("failed to write xlsx cell")?;
        }
    }

    workbook
        .save(xlsx_path)
        .with_context(|| format!("failed to save xlsx: {}", xlsx_path.display()))?;
    Ok(())
}
