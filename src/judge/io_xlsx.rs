// Primitives for reading Excel files.

use std::path::Path;

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use photo_ranking::{CellValue, RowFields};
use snafu::prelude::*;

use crate::judge::io_common::{assemble_rows, header_name};
use crate::judge::*;

/// Reads the first worksheet. The first row is the header.
pub fn read_xlsx_rows(path: &Path) -> BAppResult<Vec<RowFields>> {
    let path_s = path.display().to_string();
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu {
        path: path_s.clone(),
    })?;
    let wrange = workbook
        .worksheet_range_at(0)
        .context(EmptyExcelSnafu {
            path: path_s.clone(),
        })?
        .context(OpeningExcelSnafu { path: path_s })?;
    Ok(rows_from_range(&wrange))
}

pub fn rows_from_range(wrange: &Range<DataType>) -> Vec<RowFields> {
    let mut rows = wrange.rows();
    let header: Vec<String> = match rows.next() {
        Some(h) => h.iter().map(|c| header_name(&cell_value(c))).collect(),
        None => return Vec::new(),
    };
    assemble_rows(&header, rows.map(|r| r.iter().map(cell_value).collect()))
}

pub fn cell_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::String(s) if s.trim().is_empty() => CellValue::Empty,
        DataType::String(s) => CellValue::Text(s.clone()),
        DataType::Float(f) => CellValue::Number(*f),
        DataType::Int(i) => CellValue::Number(*i as f64),
        DataType::Bool(b) => CellValue::Bool(*b),
        DataType::DateTime(f) => CellValue::Number(*f),
        // Formula errors and anything else count as a missing value.
        _ => CellValue::Empty,
    }
}
