use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

pub mod csv;
pub mod xlsx;

/// One data row of a sheet: only populated cells under a named header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based row number in the source sheet.
    pub number: usize,
    pub cells: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawSheet {
    /// First grid row is the header row; rows with no populated cell are dropped.
    pub fn from_grid(name: impl Into<String>, grid: Vec<Vec<String>>) -> Self {
        Self::from_grid_at(name, grid, 0)
    }

    /// Like `from_grid` for a grid whose header sits `header_offset` rows
    /// below the top of the source sheet.
    pub fn from_grid_at(
        name: impl Into<String>,
        grid: Vec<Vec<String>>,
        header_offset: usize,
    ) -> Self {
        let mut grid = grid.into_iter();
        let headers: Vec<String> = grid
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(|header| header.trim().to_string())
            .collect();

        let rows = grid
            .enumerate()
            .filter_map(|(idx, row)| {
                let cells: BTreeMap<String, String> = row
                    .into_iter()
                    .enumerate()
                    .filter_map(|(col_idx, value)| {
                        let header = headers.get(col_idx)?;
                        if header.is_empty() || value.is_empty() {
                            return None;
                        }
                        Some((header.clone(), value))
                    })
                    .collect();
                (!cells.is_empty()).then_some(RawRow {
                    number: header_offset + idx + 2,
                    cells,
                })
            })
            .collect();

        Self {
            name: name.into(),
            headers,
            rows,
        }
    }
}

/// Reads the first worksheet of a spreadsheet file. `Ok(None)` means the
/// workbook has no worksheet at all.
pub fn read_first_sheet(path: &Path) -> Result<Option<RawSheet>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    if ext == "csv" {
        csv::read_csv_sheet(path).map(Some)
    } else {
        xlsx::read_workbook_first_sheet(path)
    }
}
