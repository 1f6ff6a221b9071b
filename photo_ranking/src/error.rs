use snafu::Snafu;

use crate::metrics::GlyphError;

/// Errors raised by the reconciliation, averaging, layout and export passes.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum JudgeError {
    /// A spreadsheet row or a file without a usable identity. It is skipped, never fabricated.
    #[snafu(display("row {row}: no usable identity key ({reason})"))]
    InvalidIdentity { row: usize, reason: String },

    /// The file cannot be displayed or converted. Recorded on the record, not thrown.
    #[snafu(display("unsupported format for {path}: {message}"))]
    UnsupportedFormat { path: String, message: String },

    #[snafu(display("averaging needs the scores of all three judges, missing judge(s) {missing:?}"))]
    MissingJudgeData { missing: Vec<usize> },

    #[snafu(display("could not lay out record {id} ({name}): {source}"))]
    LayoutFailure {
        id: String,
        name: String,
        source: GlyphError,
    },

    #[snafu(display("could not lay out the report header {label:?}: {source}"))]
    HeaderLayout { label: String, source: GlyphError },

    #[snafu(display("could not serialize the ranking table: {source}"))]
    SerializationFailure { source: csv::Error },

    #[snafu(display("could not serialize the ranking table: {message}"))]
    SerializationBuffer { message: String },

    #[snafu(display("record store failed for {key}: {source}"))]
    StoreFailure {
        key: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type JudgeResult<T> = Result<T, JudgeError>;
