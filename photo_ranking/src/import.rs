//! Validation of spreadsheet rows at the import boundary.
//!
//! Readers hand over rows as loosely typed cells keyed by column header. This
//! module turns them into [`ImportedRow`]s or rejects them, so that nothing
//! downstream has to trust field presence.

use std::collections::HashMap;

use log::{debug, warn};

use crate::config::{CellValue, ImportedRow, Scores};
use crate::error::JudgeError;
use crate::identity::{normalize_text, IdentityKey};

pub const COL_ID: &str = "ID (Clave de Ordenación)";
pub const COL_NAME: &str = "Nombre de Imagen";
pub const COL_ARTISTIC: &str = "Calidad Artística (pts)";
pub const COL_CONTEXT: &str = "Contextualización (pts)";
pub const COL_ORIGINALITY: &str = "Originalidad (pts)";
pub const COL_TOTAL: &str = "Puntuación Total (pts)";
pub const COL_OBSERVATIONS: &str = "Observaciones";

/// The header row shared by the import and the export.
pub const HEADER: [&str; 7] = [
    COL_ID,
    COL_NAME,
    COL_ARTISTIC,
    COL_CONTEXT,
    COL_ORIGINALITY,
    COL_TOTAL,
    COL_OBSERVATIONS,
];

/// One raw row: column header -> cell.
pub type RowFields = HashMap<String, CellValue>;

/// The outcome of validating a whole sheet.
#[derive(Debug, Default)]
pub struct ParsedSheet {
    pub rows: Vec<ImportedRow>,
    /// Rows skipped for lack of a usable identity (always `InvalidIdentity`).
    pub rejected: Vec<JudgeError>,
}

impl From<Vec<ImportedRow>> for ParsedSheet {
    fn from(rows: Vec<ImportedRow>) -> Self {
        ParsedSheet {
            rows,
            rejected: Vec::new(),
        }
    }
}

/// Validates one row. `row` is the 1-based data row number used in reports.
pub fn parse_row(row: usize, fields: &RowFields) -> Result<ImportedRow, JudgeError> {
    let id = match fields.get(COL_ID) {
        None => {
            return Err(JudgeError::InvalidIdentity {
                row,
                reason: format!("missing column {:?}", COL_ID),
            })
        }
        Some(cell) => cell
            .as_text()
            .and_then(|s| IdentityKey::parse(&s))
            .ok_or_else(|| JudgeError::InvalidIdentity {
                row,
                reason: "empty identity cell".to_string(),
            })?,
    };

    let display_name = fields
        .get(COL_NAME)
        .and_then(|c| c.as_text())
        .map(|s| normalize_text(&s));
    let observations = fields
        .get(COL_OBSERVATIONS)
        .and_then(|c| c.as_text())
        .map(|s| normalize_text(&s))
        .unwrap_or_default();

    let axis = |col: &str| -> f64 {
        match fields.get(col) {
            None | Some(CellValue::Empty) => 0.0,
            Some(cell) => match cell.as_number() {
                Some(x) if x >= 0.0 => x,
                _ => {
                    warn!(
                        "parse_row: row {}: {}: score {:?} for {:?} is not a non-negative number, using 0",
                        row, id, cell, col
                    );
                    0.0
                }
            },
        }
    };
    let scores = Scores::new(axis(COL_ARTISTIC), axis(COL_CONTEXT), axis(COL_ORIGINALITY));

    Ok(ImportedRow {
        id,
        display_name,
        scores,
        observations,
    })
}

/// Validates every row of a sheet, in order. Invalid rows are collected, not fatal.
pub fn parse_rows(rows: &[RowFields]) -> ParsedSheet {
    let mut res = ParsedSheet::default();
    for (idx, fields) in rows.iter().enumerate() {
        match parse_row(idx + 1, fields) {
            Ok(r) => res.rows.push(r),
            Err(e) => {
                warn!("parse_rows: skipping row: {}", e);
                res.rejected.push(e);
            }
        }
    }
    debug!(
        "parse_rows: {} valid rows, {} rejected",
        res.rows.len(),
        res.rejected.len()
    );
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, CellValue)]) -> RowFields {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn parses_complete_row() {
        let r = parse_row(
            1,
            &row(&[
                (COL_ID, " CONCURSANTES\\Ana\\1.jpg ".into()),
                (COL_NAME, "  Amanecer ".into()),
                (COL_ARTISTIC, 8.0.into()),
                (COL_CONTEXT, "7.5".into()),
                (COL_ORIGINALITY, 9.0.into()),
                (COL_OBSERVATIONS, "Muy bien".into()),
            ]),
        )
        .unwrap();
        assert_eq!(r.id.as_str(), "CONCURSANTES/Ana/1.jpg");
        assert_eq!(r.display_name.as_deref(), Some("Amanecer"));
        assert_eq!(r.scores, Scores::new(8.0, 7.5, 9.0));
        assert_eq!(r.observations, "Muy bien");
    }

    #[test]
    fn bad_scores_become_zero() {
        let r = parse_row(
            1,
            &row(&[
                (COL_ID, "a.jpg".into()),
                (COL_ARTISTIC, "N/A".into()),
                (COL_CONTEXT, (-3.0).into()),
                (COL_ORIGINALITY, CellValue::Bool(true)),
            ]),
        )
        .unwrap();
        assert_eq!(r.scores, Scores::default());
        assert_eq!(r.display_name, None);
        assert_eq!(r.observations, "");
    }

    #[test]
    fn rejects_rows_without_identity() {
        let sheet = parse_rows(&[
            row(&[(COL_ID, "a.jpg".into())]),
            row(&[(COL_ID, "   ".into()), (COL_NAME, "x".into())]),
            row(&[(COL_NAME, "y".into())]),
        ]);
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rejected.len(), 2);
        assert!(matches!(
            sheet.rejected[0],
            JudgeError::InvalidIdentity { row: 2, .. }
        ));
        assert!(matches!(
            sheet.rejected[1],
            JudgeError::InvalidIdentity { row: 3, .. }
        ));
    }

    #[test]
    fn normalizes_text_fields() {
        let r = parse_row(
            1,
            &row(&[
                (COL_ID, "a.jpg".into()),
                (COL_NAME, "Jose\u{0301}".into()),
                (COL_OBSERVATIONS, "cafe\u{0301}".into()),
            ]),
        )
        .unwrap();
        assert_eq!(r.display_name.as_deref(), Some("Jos\u{00e9}"));
        assert_eq!(r.observations, "caf\u{00e9}");
    }
}
