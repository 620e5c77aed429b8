use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};

use super::RawSheet;

pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

pub fn read_workbook_first_sheet(xlsx_path: &Path) -> Result<Option<RawSheet>> {
    let mut workbook = open_workbook_auto(xlsx_path)
        .with_context(|| format!("failed to open workbook: {}", xlsx_path.display()))?;

    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Ok(None);
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("failed to read sheet: {sheet_name}"))?;

    // The range begins at the first used cell, not at A1.
    let header_offset = range
        .start()
        .map(|(row, _)| row as usize)
        .unwrap_or_default();

    let grid: Vec<Vec<String>> = range
        .rows()
        .map(|r| r.iter().map(cell_to_string).collect())
        .collect();

    Ok(Some(RawSheet::from_grid_at(sheet_name, grid, header_offset)))
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use rust_xlsxwriter::Workbook;

    use super::*;

    #[test]
    fn row_numbers_follow_the_sheet_when_leading_rows_are_blank() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("fleet_admin_xlsx_offset_{nanos}"));
        std::fs::create_dir_all(&dir).expect("temp dir should be created");
        let path = dir.join("offset.xlsx");

        // Header on sheet row 3 starting at column C, data on rows 4 and 6.
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(2, 2, "Value 1").expect("header");
        worksheet.write_string(2, 3, "Value 2").expect("header");
        worksheet.write_number(3, 2, 1.5).expect("cell");
        worksheet.write_number(3, 3, 2.5).expect("cell");
        worksheet.write_number(5, 2, 3.0).expect("cell");
        workbook.save(&path).expect("fixture should save");

        let sheet = read_workbook_first_sheet(&path)
            .expect("workbook should read")
            .expect("sheet should exist");

        assert_eq!(sheet.headers, vec!["Value 1".to_string(), "Value 2".to_string()]);
        let numbers: Vec<usize> = sheet.rows.iter().map(|row| row.number).collect();
        assert_eq!(numbers, vec![4, 6]);
        assert_eq!(sheet.rows[0].cells.get("Value 2").map(String::as_str), Some("2.5"));

        std::fs::remove_dir_all(&dir).expect("temp dir should be removed");
    }
}
