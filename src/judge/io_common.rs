use std::path::Path;

use log::debug;
use photo_ranking::{normalize_text, parse_rows, CellValue, ParsedSheet, RowFields};

use crate::judge::io_csv::read_csv_rows;
use crate::judge::io_xlsx::read_xlsx_rows;
use crate::judge::*;

/// The name of the judge, as found in the name of their file.
pub fn simplify_file_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Column names are compared after trimming and NFC normalization.
pub fn header_name(cell: &CellValue) -> String {
    cell.as_text()
        .map(|s| normalize_text(s.trim_start_matches('\u{feff}')))
        .unwrap_or_default()
}

/// Pairs every row with the header. Blank rows are dropped, unnamed columns
/// are ignored, and the first of two columns with the same name wins.
pub fn assemble_rows<I>(header: &[String], rows: I) -> Vec<RowFields>
where
    I: IntoIterator<Item = Vec<CellValue>>,
{
    let mut res: Vec<RowFields> = Vec::new();
    for (idx, row) in rows.into_iter().enumerate() {
        if row.iter().all(|c| c.as_text().is_none()) {
            debug!("assemble_rows: blank row {}", idx + 1);
            continue;
        }
        let mut fields = RowFields::new();
        for (name, cell) in header.iter().zip(row) {
            if name.is_empty() {
                continue;
            }
            fields.entry(name.clone()).or_insert(cell);
        }
        res.push(fields);
    }
    res
}

/// Reads a spreadsheet, choosing the reader from the file extension.
pub fn read_sheet(path: &Path) -> BAppResult<ParsedSheet> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let rows = match ext.as_str() {
        "xlsx" | "xlsm" => read_xlsx_rows(path)?,
        "csv" => read_csv_rows(path)?,
        _ => {
            return Err(Box::new(AppError::UnknownSheetFormat {
                path: path.display().to_string(),
            }))
        }
    };
    let sheet = parse_rows(&rows);
    debug!(
        "read_sheet: {}: {} rows, {} rejected",
        path.display(),
        sheet.rows.len(),
        sheet.rejected.len()
    );
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use photo_ranking::{COL_ID, COL_NAME, COL_OBSERVATIONS};

    #[test]
    fn judge_name_from_path() {
        assert_eq!(simplify_file_name(Path::new("/tmp/jueces/Marta.xlsx")), "Marta");
        assert_eq!(simplify_file_name(Path::new("juez.2.csv")), "juez.2");
    }

    #[test]
    fn header_names_are_normalized() {
        let decomposed = "ID (Clave de Ordenacio\u{301}n)";
        assert_eq!(header_name(&CellValue::from(decomposed)), COL_ID);
        assert_eq!(header_name(&CellValue::from("\u{feff}Observaciones ")), COL_OBSERVATIONS);
        assert_eq!(header_name(&CellValue::Empty), "");
    }

    #[test]
    fn rows_are_paired_with_the_header() {
        let header = vec![
            COL_ID.to_string(),
            String::new(),
            COL_NAME.to_string(),
            COL_NAME.to_string(),
        ];
        let rows = vec![
            vec![
                CellValue::from("a/1.jpg"),
                CellValue::from("ignored"),
                CellValue::from("Uno"),
                CellValue::from("Otro"),
            ],
            vec![CellValue::Empty, CellValue::from("  ")],
            vec![CellValue::from("a/2.jpg")],
        ];
        let res = assemble_rows(&header, rows);
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].len(), 2);
        assert_eq!(res[0].get(COL_NAME), Some(&CellValue::from("Uno")));
        assert_eq!(res[1].get(COL_ID), Some(&CellValue::from("a/2.jpg")));
        assert_eq!(res[1].get(COL_NAME), None);
    }

    #[test]
    fn unknown_extension() {
        let err = read_sheet(Path::new("notas.ods")).unwrap_err();
        assert!(matches!(*err, AppError::UnknownSheetFormat { .. }));
    }
}
