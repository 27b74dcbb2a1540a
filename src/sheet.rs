//! Reads tabular sources into a plain grid of cell text.
//!
//! Spreadsheets (xls, xlsx, ods) go through `calamine`; CSV exports of
//! the same sheet go through `csv`. Both produce rows addressed from the
//! top-left cell A1, so fixed row/column offsets mean the same thing for
//! either format.

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use tracing::debug;

use crate::error::{AnalysisError, Result};

/// Row-major cell text. Empty cells are empty strings.
pub type Grid = Vec<Vec<String>>;

/// Reads the first worksheet of a workbook.
pub fn read_workbook(bytes: &[u8]) -> Result<Grid> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| AnalysisError::Spreadsheet(format!("failed to open workbook: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AnalysisError::Spreadsheet("workbook has no worksheet".to_string()))?
        .map_err(|e| AnalysisError::Spreadsheet(format!("failed to read worksheet: {e}")))?;

    // A range starts at its first used cell, not necessarily A1.
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut grid: Grid = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![String::new(); col_offset];
        cells.extend(row.iter().map(cell_text));
        grid.push(cells);
    }

    debug!(rows = grid.len(), "Read worksheet");
    Ok(grid)
}

/// Reads a header-less CSV into a grid. Rows may have different lengths.
pub fn read_csv(bytes: &[u8]) -> Result<Grid> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut grid = Grid::new();
    for record in reader.records() {
        let record = record?;
        grid.push(record.iter().map(str::to_string).collect());
    }

    debug!(rows = grid.len(), "Read CSV grid");
    Ok(grid)
}

/// Picks the reader from the source name: `.csv` is CSV, anything else a workbook.
pub fn read_grid(source_name: &str, bytes: &[u8]) -> Result<Grid> {
    if source_name.to_ascii_lowercase().ends_with(".csv") {
        read_csv(bytes)
    } else {
        read_workbook(bytes)
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_keeps_ragged_rows() {
        let grid = read_csv(b"title\n\na,b,c\n1,,3\n").unwrap();

        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0], vec!["title"]);
        assert_eq!(grid[1], vec!["a", "b", "c"]);
        assert_eq!(grid[2], vec!["1", "", "3"]);
    }

    #[test]
    fn test_read_grid_dispatches_on_extension() {
        let grid = read_grid("GDP.CSV", b"x,y\n").unwrap();
        assert_eq!(grid, vec![vec!["x".to_string(), "y".to_string()]]);
    }

    #[test]
    fn test_read_workbook_rejects_garbage() {
        let err = read_workbook(b"definitely not a workbook").unwrap_err();
        assert!(matches!(err, AnalysisError::Spreadsheet(_)));
    }
}
