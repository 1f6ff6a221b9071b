// ********* Input data structures ***********

use serde::{Deserialize, Serialize};

use crate::identity::{normalize_text, split_extension, IdentityKey};

/// The three judged axes of an image.
#[derive(PartialEq, Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    pub artistic_quality: f64,
    pub contextualization: f64,
    pub originality: f64,
}

impl Scores {
    pub fn new(artistic_quality: f64, contextualization: f64, originality: f64) -> Scores {
        Scores {
            artistic_quality,
            contextualization,
            originality,
        }
    }

    pub fn total(&self) -> f64 {
        self.artistic_quality + self.contextualization + self.originality
    }

    pub fn axes(&self) -> [f64; 3] {
        [
            self.artistic_quality,
            self.contextualization,
            self.originality,
        ]
    }
}

/// Where the bytes of a file live.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileContent {
    Bytes(Vec<u8>),
    /// A reference the display layer can resolve (a data URL, a path on disk, ...).
    DataRef(String),
}

/// A displayable rendition of an image. Not needed for ranking or layout.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub mime: String,
    pub content: FileContent,
}

/// A companion document found next to the image (typically a PDF).
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,
    pub path: String,
    pub size: u64,
}

/// A file as delivered by a folder scan, before any grouping.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FileDescriptor {
    pub name: String,
    /// Path relative to the scan root, including the root folder name.
    pub path: String,
    pub size: u64,
    /// Modification time, seconds since the epoch.
    pub modified: Option<i64>,
    pub content: FileContent,
}

impl FileDescriptor {
    pub fn kind(&self) -> FileKind {
        FileKind::from_name(&self.name)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
    Gif,
    Tiff,
    Bmp,
}

impl ImageFormat {
    /// Formats that need a conversion before they can be displayed.
    pub fn is_legacy_raster(&self) -> bool {
        matches!(self, ImageFormat::Tiff | ImageFormat::Bmp)
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Tiff => "image/tiff",
            ImageFormat::Bmp => "image/bmp",
        }
    }
}

/// What a scanned file is, judged from its extension.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum FileKind {
    Image(ImageFormat),
    Companion,
    Other,
}

impl FileKind {
    pub fn from_name(name: &str) -> FileKind {
        match split_extension(name).1.as_deref() {
            Some("jpg") | Some("jpeg") => FileKind::Image(ImageFormat::Jpeg),
            Some("png") => FileKind::Image(ImageFormat::Png),
            Some("webp") => FileKind::Image(ImageFormat::Webp),
            Some("gif") => FileKind::Image(ImageFormat::Gif),
            Some("tif") | Some("tiff") => FileKind::Image(ImageFormat::Tiff),
            Some("bmp") => FileKind::Image(ImageFormat::Bmp),
            Some("pdf") => FileKind::Companion,
            _ => FileKind::Other,
        }
    }
}

/// A loosely typed spreadsheet cell, as handed over by a reader.
#[derive(PartialEq, Debug, Clone)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// The cell as text, trimmed. None for empty cells.
    pub fn as_text(&self) -> Option<String> {
        let s = match self {
            CellValue::Empty => return None,
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(f) => f.to_string(),
            CellValue::Bool(b) => b.to_string(),
        };
        if s.is_empty() {
            None
        } else {
            Some(s)
        }
    }

    /// The cell as a finite number. Text is parsed, booleans are not numbers.
    pub fn as_number(&self) -> Option<f64> {
        let x = match self {
            CellValue::Number(f) => *f,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Empty | CellValue::Bool(_) => return None,
        };
        if x.is_finite() {
            Some(x)
        } else {
            None
        }
    }
}

impl From<f64> for CellValue {
    fn from(x: f64) -> Self {
        CellValue::Number(x)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

/// A validated spreadsheet row: what the reconciliation engine accepts from
/// a spreadsheet source.
#[derive(PartialEq, Debug, Clone)]
pub struct ImportedRow {
    pub id: IdentityKey,
    /// Normalized. None when the sheet had no name for this row.
    pub display_name: Option<String>,
    pub scores: Scores,
    /// Normalized, possibly empty.
    pub observations: String,
}

/// One image found by a folder scan, after variant deduplication and
/// format conversion.
#[derive(PartialEq, Debug, Clone)]
pub struct ScannedImage {
    pub id: IdentityKey,
    pub display_name: String,
    pub preview: Option<Preview>,
    pub auxiliary: Option<Attachment>,
    pub status_error: Option<String>,
}

// ********* Records **********

/// The judged state of one image.
///
/// The total score is not stored: it is always the sum of the current axes.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRecord {
    pub id: IdentityKey,
    pub display_name: String,
    scores: Scores,
    #[serde(default)]
    pub observations: String,
    #[serde(default)]
    pub preview: Option<Preview>,
    #[serde(default)]
    pub auxiliary: Option<Attachment>,
    #[serde(default)]
    pub status_error: Option<String>,
}

impl ScoredRecord {
    /// A fresh record with zero scores. The name is normalized.
    pub fn new(id: IdentityKey, display_name: &str) -> ScoredRecord {
        ScoredRecord {
            id,
            display_name: normalize_text(display_name),
            scores: Scores::default(),
            observations: String::new(),
            preview: None,
            auxiliary: None,
            status_error: None,
        }
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn set_scores(&mut self, scores: Scores) {
        self.scores = scores;
    }

    pub fn total_score(&self) -> f64 {
        self.scores.total()
    }

    pub fn set_observations(&mut self, observations: &str) {
        self.observations = normalize_text(observations);
    }

    /// Re-establishes the stored-normalized invariant on data coming from
    /// an external store.
    pub(crate) fn normalized(self) -> ScoredRecord {
        ScoredRecord {
            id: IdentityKey::parse(self.id.as_str()).unwrap_or(self.id),
            display_name: normalize_text(&self.display_name),
            observations: normalize_text(&self.observations),
            ..self
        }
    }
}

impl From<ScannedImage> for ScoredRecord {
    fn from(img: ScannedImage) -> Self {
        let mut rec = ScoredRecord::new(img.id, &img.display_name);
        rec.preview = img.preview;
        rec.auxiliary = img.auxiliary;
        rec.status_error = img.status_error;
        rec
    }
}

impl From<ImportedRow> for ScoredRecord {
    fn from(row: ImportedRow) -> Self {
        let name = row
            .display_name
            .unwrap_or_else(|| row.id.file_name().to_string());
        let mut rec = ScoredRecord::new(row.id, &name);
        rec.scores = row.scores;
        rec.set_observations(&row.observations);
        rec
    }
}

// ********* Configuration **********

/// Options of the multi-judge averaging pass.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AveragingOptions {
    /// First path segment (compared case-insensitively) under which each
    /// contestant has a folder named after them.
    pub contestant_root: String,
}

impl Default for AveragingOptions {
    fn default() -> Self {
        AveragingOptions {
            contestant_root: "CONCURSANTES".to_string(),
        }
    }
}

/// Options of the printable report.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportOptions {
    /// Title line. Falls back to [`ReportOptions::DEFAULT_TITLE`].
    pub title: Option<String>,
    pub hide_observations: bool,
    pub main_name_label: String,
    /// When set, the main name is upper-cased and a second column shows the
    /// file name taken from the identity key.
    pub item_name_label: Option<String>,
    /// Footer text. Falls back to a copyright line for `year`.
    pub copyright: Option<String>,
    /// Year of the default copyright line. The current year when unset.
    pub year: Option<i32>,
}

impl ReportOptions {
    pub const DEFAULT_TITLE: &'static str = "Ranking de Clasificación";

    pub fn title(&self) -> &str {
        match self.title.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => ReportOptions::DEFAULT_TITLE,
        }
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            title: None,
            hide_observations: false,
            main_name_label: "Nombre de Imagen".to_string(),
            item_name_label: None,
            copyright: None,
            year: None,
        }
    }
}
