// Primitives for reading CSV files.

use std::path::Path;

use csv::ReaderBuilder;
use photo_ranking::{CellValue, RowFields};
use snafu::prelude::*;

use crate::judge::io_common::{assemble_rows, header_name};
use crate::judge::*;

/// Reads a CSV file with a header line. Rows may have fewer fields than the
/// header.
pub fn read_csv_rows(path: &Path) -> BAppResult<Vec<RowFields>> {
    let path_s = path.display().to_string();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu {
            path: path_s.clone(),
        })?;
    let header: Vec<String> = rdr
        .headers()
        .context(CsvOpenSnafu {
            path: path_s.clone(),
        })?
        .iter()
        .map(|h| header_name(&CellValue::from(h)))
        .collect();

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record.context(CsvLineParseSnafu {
            path: path_s.clone(),
            lineno: idx + 2,
        })?;
        rows.push(
            record
                .iter()
                .map(|s| {
                    if s.trim().is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::from(s)
                    }
                })
                .collect(),
        );
    }
    Ok(assemble_rows(&header, rows))
}
