//! Flattening of the ranking into a table for spreadsheet export.

use log::{debug, warn};
use snafu::ResultExt;

use crate::config::CellValue;
use crate::error::{JudgeError, JudgeResult, SerializationFailureSnafu};
use crate::import::HEADER;
use crate::{whole, RankedEntry};

/// The score axes as they reach the exporter. Values are not trusted to be numbers.
#[derive(PartialEq, Debug, Clone)]
pub struct RawScores {
    pub artistic_quality: CellValue,
    pub contextualization: CellValue,
    pub originality: CellValue,
}

/// One record to export.
#[derive(PartialEq, Debug, Clone)]
pub struct ExportRecord {
    pub id: String,
    pub name: String,
    /// When absent, `total_score` is exported alone.
    pub scores: Option<RawScores>,
    pub total_score: CellValue,
    pub observations: String,
}

impl<T: RankedEntry> From<&T> for ExportRecord {
    fn from(rec: &T) -> Self {
        let s = rec.scores();
        ExportRecord {
            id: rec.id().to_string(),
            name: rec.display_name().to_string(),
            scores: Some(RawScores {
                artistic_quality: CellValue::Number(s.artistic_quality),
                contextualization: CellValue::Number(s.contextualization),
                originality: CellValue::Number(s.originality),
            }),
            total_score: CellValue::Number(rec.total()),
            observations: rec.observations().to_string(),
        }
    }
}

/// A row of the exported table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ExportRow {
    pub id: String,
    pub name: String,
    pub artistic_quality: i64,
    pub contextualization: i64,
    pub originality: i64,
    pub total_score: i64,
    pub observations: String,
}

impl ExportRow {
    fn placeholder(position: usize) -> ExportRow {
        ExportRow {
            id: format!("ID Desconocido (Fila {})", position),
            name: "Nombre Desconocido".to_string(),
            artistic_quality: 0,
            contextualization: 0,
            originality: 0,
            total_score: 0,
            observations: String::new(),
        }
    }

    fn fields(&self) -> [String; 7] {
        [
            self.id.clone(),
            self.name.clone(),
            self.artistic_quality.to_string(),
            self.contextualization.to_string(),
            self.originality.to_string(),
            self.total_score.to_string(),
            self.observations.clone(),
        ]
    }
}

fn coerce(id: &str, axis: &str, value: &CellValue) -> f64 {
    match value.as_number() {
        Some(x) => x,
        None => {
            warn!(
                "export: {}: {} value {:?} is not a number, exporting 0",
                id, axis, value
            );
            0.0
        }
    }
}

/// Builds one row per input position. Absent records become placeholder rows.
pub fn export_rows(records: &[Option<ExportRecord>]) -> Vec<ExportRow> {
    records
        .iter()
        .enumerate()
        .map(|(idx, rec)| match rec {
            None => {
                warn!("export: no record at position {}, writing a placeholder", idx + 1);
                ExportRow::placeholder(idx + 1)
            }
            Some(rec) => {
                // The total is the sum of the written axes, so a row always adds up.
                let (axes, total) = match &rec.scores {
                    Some(s) => {
                        let axes = [
                            whole(coerce(&rec.id, "artistic quality", &s.artistic_quality)),
                            whole(coerce(&rec.id, "contextualization", &s.contextualization)),
                            whole(coerce(&rec.id, "originality", &s.originality)),
                        ];
                        (axes, axes.iter().sum::<i64>())
                    }
                    None => ([0; 3], whole(coerce(&rec.id, "total", &rec.total_score))),
                };
                ExportRow {
                    id: rec.id.clone(),
                    name: rec.name.clone(),
                    artistic_quality: axes[0],
                    contextualization: axes[1],
                    originality: axes[2],
                    total_score: total,
                    observations: rec.observations.clone(),
                }
            }
        })
        .collect()
}

/// Writes the header and the rows as CSV.
pub fn serialize(records: &[Option<ExportRecord>]) -> JudgeResult<Vec<u8>> {
    let rows = export_rows(records);
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(HEADER).context(SerializationFailureSnafu)?;
    for row in rows.iter() {
        wtr.write_record(row.fields())
            .context(SerializationFailureSnafu)?;
    }
    let buf = wtr
        .into_inner()
        .map_err(|e| JudgeError::SerializationBuffer {
            message: e.error().to_string(),
        })?;
    debug!("serialize: {} rows, {} bytes", rows.len(), buf.len());
    Ok(buf)
}
