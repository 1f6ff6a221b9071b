use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

use log::{debug, info, warn};

use crate::config::*;
use crate::error::{JudgeError, JudgeResult};
use crate::identity::{canonicalize, normalize_text, split_extension, IdentityKey};
use crate::import::ParsedSheet;
use crate::store::RecordStore;

/// A batch of records coming from one source.
#[derive(Debug)]
pub enum SourceBatch {
    /// A folder (re-)scan. Touches preview, attachment and error fields only.
    FolderScan(Vec<ScannedImage>),
    /// A spreadsheet import. Overwrites scores and observations outright.
    Spreadsheet(ParsedSheet),
}

/// What a reconciliation pass did.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct MergeReport {
    pub inserted: Vec<IdentityKey>,
    pub updated: Vec<IdentityKey>,
    /// Spreadsheet keys that matched no existing record. They are inserted
    /// as well, but usually point at a typo in the sheet.
    pub unmatched: Vec<IdentityKey>,
    /// Rows rejected at the import boundary, as messages.
    pub skipped: Vec<String>,
}

/// The live record set of a judging session.
///
/// Every pass returns a new set with a bumped version; the set it was
/// computed from is left untouched.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct RecordSet {
    version: u64,
    records: BTreeMap<IdentityKey, ScoredRecord>,
}

impl RecordSet {
    pub fn new() -> RecordSet {
        RecordSet::default()
    }

    /// Loads the persisted records. Keys and text fields are normalized on the way in.
    pub fn load(store: &dyn RecordStore) -> JudgeResult<RecordSet> {
        let mut records: BTreeMap<IdentityKey, ScoredRecord> = BTreeMap::new();
        for rec in store.get_all()? {
            let rec = rec.normalized();
            if records.contains_key(&rec.id) {
                warn!("RecordSet::load: duplicate key {} in store, keeping the last one", rec.id);
            }
            records.insert(rec.id.clone(), rec);
        }
        info!("RecordSet::load: {} records", records.len());
        Ok(RecordSet {
            version: 0,
            records,
        })
    }

    /// Clears the store and returns an empty set.
    pub fn reset(&self, store: &mut dyn RecordStore) -> JudgeResult<RecordSet> {
        store.clear()?;
        Ok(RecordSet {
            version: self.version + 1,
            records: BTreeMap::new(),
        })
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &IdentityKey) -> Option<&ScoredRecord> {
        self.records.get(id)
    }

    /// The records in identity key order.
    pub fn records(&self) -> impl Iterator<Item = &ScoredRecord> {
        self.records.values()
    }

    pub fn to_vec(&self) -> Vec<ScoredRecord> {
        self.records.values().cloned().collect()
    }

    /// Sets the scores and observations of one record, as a live judging session does.
    pub fn score(
        &self,
        id: &IdentityKey,
        scores: Scores,
        observations: &str,
    ) -> Option<RecordSet> {
        let mut next = self.clone();
        let rec = next.records.get_mut(id)?;
        rec.set_scores(scores);
        rec.set_observations(observations);
        next.version += 1;
        Some(next)
    }

    /// Folds the results of independent import tasks, one at a time, in the
    /// order given. Failed tasks are reported and skipped.
    pub fn fold<I, E>(&self, results: I) -> (RecordSet, MergeReport, Vec<E>)
    where
        I: IntoIterator<Item = Result<SourceBatch, E>>,
        E: Display,
    {
        let mut cur = self.clone();
        let mut report = MergeReport::default();
        let mut failures: Vec<E> = Vec::new();
        for r in results {
            match r {
                Ok(batch) => {
                    let (next, rep) = reconcile(&cur, batch);
                    cur = next;
                    report.inserted.extend(rep.inserted);
                    report.updated.extend(rep.updated);
                    report.unmatched.extend(rep.unmatched);
                    report.skipped.extend(rep.skipped);
                }
                Err(e) => {
                    warn!("RecordSet::fold: skipping failed source: {}", e);
                    failures.push(e);
                }
            }
        }
        (cur, report, failures)
    }
}

/// Merges a batch into the existing set, by identity key.
///
/// Keys absent from the batch are carried forward unchanged.
pub fn reconcile(existing: &RecordSet, incoming: SourceBatch) -> (RecordSet, MergeReport) {
    let mut records = existing.records.clone();
    let mut report = MergeReport::default();
    match incoming {
        SourceBatch::FolderScan(images) => {
            info!("reconcile: folder scan of {} images", images.len());
            for img in images {
                match records.get_mut(&img.id) {
                    Some(rec) => {
                        merge_scanned(rec, img);
                        report.updated.push(rec.id.clone());
                    }
                    None => {
                        report.inserted.push(img.id.clone());
                        records.insert(img.id.clone(), img.into());
                    }
                }
            }
        }
        SourceBatch::Spreadsheet(sheet) => {
            info!(
                "reconcile: spreadsheet of {} rows ({} rejected)",
                sheet.rows.len(),
                sheet.rejected.len()
            );
            report.skipped = sheet.rejected.iter().map(|e| e.to_string()).collect();
            for row in sheet.rows {
                match records.get_mut(&row.id) {
                    Some(rec) => {
                        merge_imported(rec, row);
                        report.updated.push(rec.id.clone());
                    }
                    None => {
                        warn!(
                            "reconcile: spreadsheet key {} matches no known image, adding it",
                            row.id
                        );
                        report.unmatched.push(row.id.clone());
                        report.inserted.push(row.id.clone());
                        records.insert(row.id.clone(), row.into());
                    }
                }
            }
        }
    }
    debug!(
        "reconcile: inserted {:?} updated {:?}",
        report.inserted.len(),
        report.updated.len()
    );
    (
        RecordSet {
            version: existing.version + 1,
            records,
        },
        report,
    )
}

fn merge_scanned(rec: &mut ScoredRecord, img: ScannedImage) {
    let has_preview = img.preview.is_some();
    if let Some(p) = img.preview {
        rec.preview = Some(p);
    }
    if let Some(a) = img.auxiliary {
        rec.auxiliary = Some(a);
    }
    match img.status_error {
        Some(e) => rec.status_error = Some(e),
        // Only a successful preview clears an earlier conversion error.
        None if has_preview => rec.status_error = None,
        None => {}
    }
}

fn merge_imported(rec: &mut ScoredRecord, row: ImportedRow) {
    rec.set_scores(row.scores);
    rec.set_observations(&row.observations);
    if let Some(name) = row.display_name {
        if !name.is_empty() {
            rec.display_name = normalize_text(&name);
        }
    }
}

// ********* Folder scans **********

/// A legacy-raster file dropped because a displayable variant exists.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DiscardedVariant {
    pub path: String,
    pub kept: String,
}

/// Drops legacy-raster variants of an image when a directly displayable
/// variant with the same base name exists in the same directory.
///
/// Base names are compared case-insensitively. Files that are not images
/// are ignored. The kept files are returned in canonical path order.
pub fn dedupe_variants(files: Vec<FileDescriptor>) -> (Vec<FileDescriptor>, Vec<DiscardedVariant>) {
    #[derive(Default)]
    struct Group {
        legacy: Vec<FileDescriptor>,
        direct: Vec<FileDescriptor>,
    }

    let mut groups: BTreeMap<String, Group> = BTreeMap::new();
    for f in files {
        let format = match f.kind() {
            FileKind::Image(fmt) => fmt,
            _ => continue,
        };
        let path = canonicalize(&f.path);
        let dir = match path.rfind('/') {
            Some(idx) => path[..idx + 1].to_string(),
            None => String::new(),
        };
        let base = split_extension(&f.name).0.to_lowercase();
        let g = groups.entry(format!("{}{}", dir, base)).or_default();
        if format.is_legacy_raster() {
            g.legacy.push(f);
        } else {
            g.direct.push(f);
        }
    }

    let mut kept: Vec<FileDescriptor> = Vec::new();
    let mut discarded: Vec<DiscardedVariant> = Vec::new();
    for (key, g) in groups {
        if let Some(first) = g.direct.first() {
            for l in g.legacy.iter() {
                warn!(
                    "dedupe_variants: {:?} discarded in favour of {:?} for {:?}",
                    l.path, first.path, key
                );
                discarded.push(DiscardedVariant {
                    path: canonicalize(&l.path),
                    kept: canonicalize(&first.path),
                });
            }
            kept.extend(g.direct);
        } else {
            kept.extend(g.legacy);
        }
    }
    kept.sort_by_key(|f| canonicalize(&f.path));
    (kept, discarded)
}

/// Maps every directory (canonical, lower-cased) to the first companion
/// document found in it.
pub fn associate_companions(files: &[FileDescriptor]) -> HashMap<String, Attachment> {
    let mut docs: Vec<&FileDescriptor> = files
        .iter()
        .filter(|f| f.kind() == FileKind::Companion)
        .collect();
    docs.sort_by_key(|f| canonicalize(&f.path));

    let mut res: HashMap<String, Attachment> = HashMap::new();
    for d in docs {
        let dir = companion_key(&d.path);
        if let Some(prev) = res.get(&dir) {
            warn!(
                "associate_companions: several documents in {:?}, keeping {:?}, ignoring {:?}",
                dir, prev.name, d.name
            );
            continue;
        }
        res.insert(
            dir,
            Attachment {
                name: normalize_text(&d.name),
                path: canonicalize(&d.path),
                size: d.size,
            },
        );
    }
    res
}

fn companion_key(path: &str) -> String {
    let p = canonicalize(path);
    match p.rfind('/') {
        Some(idx) => p[..idx + 1].to_lowercase(),
        None => String::new(),
    }
}

/// Turns a file into something the display layer can show.
///
/// This is the seam for the external conversion step; it may be called from
/// several threads at once.
pub trait FormatConverter: Sync {
    fn convert(&self, file: &FileDescriptor, format: ImageFormat) -> JudgeResult<Preview>;
}

/// Hands displayable formats through and reports legacy-raster files as
/// unsupported.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct PassthroughConverter;

impl FormatConverter for PassthroughConverter {
    fn convert(&self, file: &FileDescriptor, format: ImageFormat) -> JudgeResult<Preview> {
        if format.is_legacy_raster() {
            return Err(JudgeError::UnsupportedFormat {
                path: file.path.clone(),
                message: format!("no converter available for {}", format.mime()),
            });
        }
        Ok(Preview {
            mime: format.mime().to_string(),
            content: file.content.clone(),
        })
    }
}

/// Builds the scanned image for one (deduplicated) file.
///
/// Conversion failures are recorded on the image, never returned.
/// Returns an `InvalidIdentity` error for files that are not images or have
/// no usable path.
pub fn scan_image(
    file: &FileDescriptor,
    converter: &dyn FormatConverter,
    companions: &HashMap<String, Attachment>,
) -> JudgeResult<ScannedImage> {
    let format = match file.kind() {
        FileKind::Image(fmt) => fmt,
        _ => {
            return Err(JudgeError::InvalidIdentity {
                row: 0,
                reason: format!("{:?} is not an image", file.path),
            })
        }
    };
    let id = IdentityKey::parse(&file.path).ok_or_else(|| JudgeError::InvalidIdentity {
        row: 0,
        reason: format!("file {:?} has no path", file.name),
    })?;
    let (preview, status_error) = match converter.convert(file, format) {
        Ok(p) => (Some(p), None),
        Err(e) => {
            warn!("scan_image: {}", e);
            (None, Some(e.to_string()))
        }
    };
    Ok(ScannedImage {
        display_name: normalize_text(&file.name),
        auxiliary: companions.get(&companion_key(&file.path)).cloned(),
        id,
        preview,
        status_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    /// Sends the log output of a test to the test harness.
    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn file(path: &str) -> FileDescriptor {
        FileDescriptor {
            name: path.rsplit('/').next().unwrap().to_string(),
            path: path.to_string(),
            size: 10,
            modified: None,
            content: FileContent::DataRef(path.to_string()),
        }
    }

    fn key(s: &str) -> IdentityKey {
        IdentityKey::parse(s).unwrap()
    }

    fn imported(id: &str, s: [f64; 3], obs: &str) -> ImportedRow {
        ImportedRow {
            id: key(id),
            display_name: None,
            scores: Scores::new(s[0], s[1], s[2]),
            observations: obs.to_string(),
        }
    }

    fn scanned(id: &str) -> ScannedImage {
        ScannedImage {
            id: key(id),
            display_name: id.rsplit('/').next().unwrap().to_string(),
            preview: Some(Preview {
                mime: "image/jpeg".to_string(),
                content: FileContent::DataRef(id.to_string()),
            }),
            auxiliary: None,
            status_error: None,
        }
    }

    #[test]
    fn hand_built_rows_are_stored_normalized() {
        let decomposed = "cafe\u{301} con leche";
        let mut row = imported("a/1.jpg", [1.0, 1.0, 1.0], decomposed);
        row.display_name = Some("Jose\u{301}".to_string());
        let (set, _) = reconcile(&RecordSet::new(), SourceBatch::Spreadsheet(vec![row.clone()].into()));
        let rec = set.get(&key("a/1.jpg")).unwrap();
        assert_eq!(rec.observations, "caf\u{e9} con leche");
        assert_eq!(rec.display_name, "Jos\u{e9}");

        // Same through the merge of an existing record.
        let (set, _) = reconcile(&set, SourceBatch::Spreadsheet(vec![row].into()));
        let rec = set.get(&key("a/1.jpg")).unwrap();
        assert_eq!(rec.observations, "caf\u{e9} con leche");
        assert_eq!(rec.display_name, "Jos\u{e9}");
    }

    #[test]
    fn tiff_variant_is_discarded() {
        let (kept, discarded) = dedupe_variants(vec![
            file("Fotos/Ana/photo.tiff"),
            file("Fotos/Ana/photo.jpg"),
            file("Fotos/Ana/other.tif"),
            file("Fotos/Ana/notes.txt"),
        ]);
        let paths: Vec<&str> = kept.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["Fotos/Ana/other.tif", "Fotos/Ana/photo.jpg"]);
        assert_eq!(
            discarded,
            vec![DiscardedVariant {
                path: "Fotos/Ana/photo.tiff".to_string(),
                kept: "Fotos/Ana/photo.jpg".to_string(),
            }]
        );

        // Exactly one record for the base name `photo`, sourced from the jpg.
        let companions = associate_companions(&kept);
        let images: Vec<ScannedImage> = kept
            .iter()
            .map(|f| scan_image(f, &PassthroughConverter, &companions).unwrap())
            .collect();
        let (set, _) = reconcile(&RecordSet::new(), SourceBatch::FolderScan(images));
        let photos: Vec<&ScoredRecord> = set
            .records()
            .filter(|r| r.id.file_name().starts_with("photo"))
            .collect();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].id.as_str(), "Fotos/Ana/photo.jpg");
    }

    #[test]
    fn base_names_compare_case_insensitively() {
        let (kept, discarded) =
            dedupe_variants(vec![file("a/Photo.TIFF"), file("a/PHOTO.png"), file("b/photo.tiff")]);
        let paths: Vec<&str> = kept.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["a/PHOTO.png", "b/photo.tiff"]);
        assert_eq!(discarded.len(), 1);
    }

    #[test]
    fn bmp_is_legacy_too() {
        let (kept, _) = dedupe_variants(vec![file("a/x.bmp"), file("a/x.webp")]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "x.webp");
    }

    #[test]
    fn legacy_only_group_needs_conversion() {
        let f = file("a/x.tif");
        let img = scan_image(&f, &PassthroughConverter, &HashMap::new()).unwrap();
        assert_eq!(img.preview, None);
        assert!(img.status_error.unwrap().contains("image/tiff"));
    }

    #[test]
    fn companions_by_directory() {
        let files = vec![
            file("Fotos/Ana/b.pdf"),
            file("Fotos/Ana/a.pdf"),
            file("Fotos/Ana/1.jpg"),
            file("Fotos/Luis/2.jpg"),
        ];
        let companions = associate_companions(&files);
        assert_eq!(companions.len(), 1);
        let img = scan_image(&files[2], &PassthroughConverter, &companions).unwrap();
        assert_eq!(img.auxiliary.unwrap().name, "a.pdf");
        let img2 = scan_image(&files[3], &PassthroughConverter, &companions).unwrap();
        assert_eq!(img2.auxiliary, None);
        assert!(scan_image(&files[0], &PassthroughConverter, &companions).is_err());
    }

    #[test]
    fn spreadsheet_overwrites_scores() {
        let (set, _) = reconcile(
            &RecordSet::new(),
            SourceBatch::Spreadsheet(vec![imported("a/1.jpg", [10.0, 10.0, 10.0], "old")].into()),
        );
        assert_eq!(set.get(&key("a/1.jpg")).unwrap().total_score(), 30.0);
        let (set2, report) = reconcile(
            &set,
            SourceBatch::Spreadsheet(vec![imported("a/1.jpg", [5.0, 5.0, 5.0], "")].into()),
        );
        let rec = set2.get(&key("a/1.jpg")).unwrap();
        assert_eq!(rec.total_score(), 15.0);
        assert_eq!(rec.observations, "");
        assert_eq!(report.updated, vec![key("a/1.jpg")]);
        assert!(report.unmatched.is_empty());
        // The set it was computed from is untouched.
        assert_eq!(set.get(&key("a/1.jpg")).unwrap().total_score(), 30.0);
        assert_eq!(set2.version(), set.version() + 1);
    }

    #[test]
    fn spreadsheet_keeps_name_when_unset() {
        let (set, _) = reconcile(
            &RecordSet::new(),
            SourceBatch::FolderScan(vec![scanned("a/1.jpg")]),
        );
        let mut row = imported("a/1.jpg", [1.0, 2.0, 3.0], "ok");
        let (set, _) = reconcile(&set, SourceBatch::Spreadsheet(vec![row.clone()].into()));
        assert_eq!(set.get(&key("a/1.jpg")).unwrap().display_name, "1.jpg");
        row.display_name = Some("Amanecer".to_string());
        let (set, _) = reconcile(&set, SourceBatch::Spreadsheet(vec![row].into()));
        let rec = set.get(&key("a/1.jpg")).unwrap();
        assert_eq!(rec.display_name, "Amanecer");
        // Preview from the scan survives the import.
        assert!(rec.preview.is_some());
    }

    #[test]
    fn rescan_keeps_scores_and_updates_files() {
        let (set, _) = reconcile(
            &RecordSet::new(),
            SourceBatch::Spreadsheet(vec![imported("a/1.jpg", [4.0, 4.0, 4.0], "nota")].into()),
        );
        let mut img = scanned("a/1.jpg");
        img.auxiliary = Some(Attachment {
            name: "memoria.pdf".to_string(),
            path: "a/memoria.pdf".to_string(),
            size: 3,
        });
        let (set, report) = reconcile(&set, SourceBatch::FolderScan(vec![img]));
        let rec = set.get(&key("a/1.jpg")).unwrap();
        assert_eq!(rec.total_score(), 12.0);
        assert_eq!(rec.observations, "nota");
        assert!(rec.preview.is_some());
        assert_eq!(rec.auxiliary.as_ref().unwrap().name, "memoria.pdf");
        assert_eq!(report.updated.len(), 1);

        // A later scan without attachment keeps the earlier one.
        let (set, _) = reconcile(&set, SourceBatch::FolderScan(vec![scanned("a/1.jpg")]));
        assert!(set.get(&key("a/1.jpg")).unwrap().auxiliary.is_some());
    }

    #[test]
    fn status_error_cleared_only_by_successful_preview() {
        let mut broken = scanned("a/1.tif");
        broken.preview = None;
        broken.status_error = Some("conversion failed".to_string());
        let (set, _) = reconcile(&RecordSet::new(), SourceBatch::FolderScan(vec![broken]));

        let mut silent = scanned("a/1.tif");
        silent.preview = None;
        let (set, _) = reconcile(&set, SourceBatch::FolderScan(vec![silent]));
        assert!(set.get(&key("a/1.tif")).unwrap().status_error.is_some());

        let (set, _) = reconcile(
            &set,
            SourceBatch::Spreadsheet(vec![imported("a/1.tif", [1.0, 1.0, 1.0], "")].into()),
        );
        assert!(set.get(&key("a/1.tif")).unwrap().status_error.is_some());

        let (set, _) = reconcile(&set, SourceBatch::FolderScan(vec![scanned("a/1.tif")]));
        assert_eq!(set.get(&key("a/1.tif")).unwrap().status_error, None);
    }

    #[test]
    fn absent_keys_carried_forward() {
        let (set, _) = reconcile(
            &RecordSet::new(),
            SourceBatch::FolderScan(vec![scanned("a/1.jpg"), scanned("a/2.jpg")]),
        );
        let (set, report) = reconcile(
            &set,
            SourceBatch::Spreadsheet(vec![imported("a/2.jpg", [1.0, 0.0, 0.0], "")].into()),
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(&key("a/1.jpg")).unwrap().total_score(), 0.0);
        assert_eq!(report.updated, vec![key("a/2.jpg")]);
    }

    #[test]
    fn unmatched_rows_are_reported() {
        init();
        let (set, report) = reconcile(
            &RecordSet::new(),
            SourceBatch::Spreadsheet(vec![imported("x/9.jpg", [1.0, 1.0, 1.0], "")].into()),
        );
        assert_eq!(report.unmatched, vec![key("x/9.jpg")]);
        assert_eq!(set.get(&key("x/9.jpg")).unwrap().display_name, "9.jpg");
    }

    #[test]
    fn same_key_from_different_separators() {
        init();
        let (set, _) = reconcile(
            &RecordSet::new(),
            SourceBatch::FolderScan(vec![scanned("a/1.jpg")]),
        );
        let row = |id: &str| -> crate::import::RowFields {
            [(crate::import::COL_ID.to_string(), CellValue::from(id))]
                .into_iter()
                .collect()
        };
        let sheet = crate::import::parse_rows(&[row("a\\1.jpg"), row("  ")]);
        let (set, report) = reconcile(&set, SourceBatch::Spreadsheet(sheet));
        assert_eq!(set.len(), 1);
        assert!(report.unmatched.is_empty());
        assert_eq!(report.skipped.len(), 1);
    }

    #[test]
    fn fold_skips_failed_tasks() {
        init();
        let results: Vec<JudgeResult<SourceBatch>> = vec![
            Ok(SourceBatch::FolderScan(vec![scanned("a/1.jpg")])),
            Err(JudgeError::InvalidIdentity {
                row: 0,
                reason: "unreadable".to_string(),
            }),
            Ok(SourceBatch::Spreadsheet(vec![imported("a/1.jpg", [2.0, 2.0, 2.0], "")].into())),
        ];
        let (set, report, failures) = RecordSet::new().fold(results);
        assert_eq!(failures.len(), 1);
        assert_eq!(report.inserted, vec![key("a/1.jpg")]);
        assert_eq!(set.get(&key("a/1.jpg")).unwrap().total_score(), 6.0);
        assert_eq!(set.version(), 2);
    }

    #[test]
    fn live_scoring() {
        let (set, _) = reconcile(
            &RecordSet::new(),
            SourceBatch::FolderScan(vec![scanned("a/1.jpg")]),
        );
        let next = set
            .score(&key("a/1.jpg"), Scores::new(1.0, 2.0, 3.5), "cafe\u{0301}")
            .unwrap();
        let rec = next.get(&key("a/1.jpg")).unwrap();
        assert_eq!(rec.total_score(), 6.5);
        assert_eq!(rec.observations, "caf\u{00e9}");
        assert!(set.score(&key("nope.jpg"), Scores::default(), "").is_none());
    }

    #[test]
    fn load_and_reset() {
        init();
        let mut store = MemoryStore::default();
        let mut rec = ScoredRecord::new(key("a/1.jpg"), "uno");
        rec.display_name = "Jose\u{0301}".to_string();
        store.put(&rec).unwrap();
        let set = RecordSet::load(&store).unwrap();
        assert_eq!(set.get(&key("a/1.jpg")).unwrap().display_name, "Jos\u{00e9}");
        let empty = set.reset(&mut store).unwrap();
        assert!(empty.is_empty());
        assert!(store.get_all().unwrap().is_empty());
    }
}
