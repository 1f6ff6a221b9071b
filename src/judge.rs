pub mod config_reader;
mod io_common;
mod io_csv;
mod io_folder;
mod io_store;
mod io_xlsx;

use log::{debug, info, warn};

use photo_ranking::*;
use rayon::prelude::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use text_diff::print_diff;

use crate::args::Args;
use crate::judge::config_reader::*;
use crate::judge::io_common::read_sheet;
use crate::judge::io_store::JsonFileStore;

#[derive(Debug, Snafu)]
pub enum AppError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The spreadsheet {path} has no worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("Error reading the CSV file {path}: {source}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}: {source}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("{path}: unknown spreadsheet format, expected .xlsx or .csv"))]
    UnknownSheetFormat { path: String },
    #[snafu(display("Error opening file {path}: {source}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON in {path}: {source}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error scanning the folder {path}: {source}"))]
    ScanningFolder {
        source: walkdir::Error,
        path: String,
    },
    #[snafu(display("Error writing {path}: {source}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error serializing the report pages: {source}"))]
    SerializingPages { source: serde_json::Error },
    #[snafu(display("Invalid settings: {message}"))]
    InvalidSettings { message: String },
    #[snafu(display("The produced table differs from the reference {path}"))]
    ReferenceMismatch { path: String },
    #[snafu(display("{source}"))]
    Core { source: JudgeError },
}

pub type BAppResult<T> = Result<T, Box<AppError>>;

pub const PAGES_FILE: &str = "ranking.pages.json";
pub const TABLE_FILE: &str = "ranking.csv";

/// Logos read from the disk. A file that is not there is left out.
struct FileLogos {
    header: Option<LogoSettings>,
    footer: Option<LogoSettings>,
}

impl AssetProvider for FileLogos {
    fn logo(&self, slot: LogoSlot) -> Option<LogoAsset> {
        let settings = match slot {
            LogoSlot::Header => self.header.as_ref(),
            LogoSlot::Footer => self.footer.as_ref(),
        }?;
        if !Path::new(&settings.path).is_file() {
            warn!("logo {:?} not found, the report is drawn without it", settings.path);
            return None;
        }
        Some(LogoAsset {
            handle: settings.path.clone(),
            width: settings.width,
            height: settings.height,
        })
    }
}

fn log_report(source: &str, report: &MergeReport) {
    info!(
        "{}: {} inserted, {} updated, {} skipped",
        source,
        report.inserted.len(),
        report.updated.len(),
        report.skipped.len()
    );
    for id in report.unmatched.iter() {
        warn!("{}: {} was not in the session and has been added", source, id);
    }
    for reason in report.skipped.iter() {
        warn!("{}: skipped {}", source, reason);
    }
}

/// Folder scan first, then the spreadsheet imports in the order given.
fn update_session(set: RecordSet, settings: &Settings) -> BAppResult<RecordSet> {
    let mut set = set;
    if let Some(folder) = &settings.folder {
        let images = io_folder::scan_images(folder, &PassthroughConverter)?;
        let (next, report) = reconcile(&set, SourceBatch::FolderScan(images));
        log_report("folder scan", &report);
        set = next;
    }
    if !settings.imports.is_empty() {
        let sheets: Vec<BAppResult<SourceBatch>> = settings
            .imports
            .par_iter()
            .map(|p| read_sheet(p).map(SourceBatch::Spreadsheet))
            .collect();
        let (next, report, failures) = set.fold(sheets);
        log_report("import", &report);
        if !failures.is_empty() && failures.len() == settings.imports.len() {
            warn!("update_session: none of the {} imports could be read", failures.len());
        }
        set = next;
    }
    Ok(set)
}

fn average_judges(settings: &Settings) -> BAppResult<Vec<AveragedRecord>> {
    let sheets: Vec<BAppResult<ParsedSheet>> =
        settings.judges.par_iter().map(|p| read_sheet(p)).collect();
    let mut slots: [Option<JudgeScoreSet>; JUDGE_COUNT] = Default::default();
    for (idx, (path, sheet)) in settings.judges.iter().zip(sheets).enumerate() {
        let sheet = sheet?;
        for e in sheet.rejected.iter() {
            warn!("judge sheet {}: {}", path.display(), e);
        }
        let judge = io_common::simplify_file_name(path);
        let scores = JudgeScoreSet::from_rows(&judge, sheet.rows);
        info!("average_judges: judge {} scored {} entries", judge, scores.len());
        slots[idx] = Some(scores);
    }
    let averaged = average(&slots, &settings.averaging).context(CoreSnafu)?;
    Ok(averaged)
}

fn write_output(path: &Path, contents: &str) -> BAppResult<()> {
    fs::write(path, contents).context(WritingOutputSnafu {
        path: path.display().to_string(),
    })?;
    info!("wrote {}", path.display());
    Ok(())
}

/// Lays out and exports the ranked entries. Returns the CSV table.
fn produce<T: RankedEntry>(
    ranked: &[T],
    options: &ReportOptions,
    settings: &Settings,
) -> BAppResult<String> {
    let assets = FileLogos {
        header: settings.header_logo.clone(),
        footer: settings.footer_logo.clone(),
    };
    let pages = render(ranked, options, &PageGeometry::default(), &Helvetica, &assets)
        .context(CoreSnafu)?;
    info!("produce: {} entries on {} pages", ranked.len(), pages.len());

    let records: Vec<Option<ExportRecord>> =
        ranked.iter().map(|r| Some(ExportRecord::from(r))).collect();
    let table = serialize(&records).context(CoreSnafu)?;
    let table = String::from_utf8_lossy(&table).to_string();

    match &settings.out {
        Some(dir) => {
            fs::create_dir_all(dir).context(WritingOutputSnafu {
                path: dir.display().to_string(),
            })?;
            let js = serde_json::to_string_pretty(&pages).context(SerializingPagesSnafu {})?;
            write_output(&dir.join(PAGES_FILE), &js)?;
            write_output(&dir.join(TABLE_FILE), &table)?;
        }
        None => print!("{}", table),
    }
    Ok(table)
}

fn check_reference(path: &Path, table: &str) -> BAppResult<()> {
    let path_s = path.display().to_string();
    let reference = fs::read_to_string(path).context(OpeningFileSnafu {
        path: path_s.clone(),
    })?;
    let reference = reference.replace("\r\n", "\n");
    if reference.trim_end() != table.trim_end() {
        warn!("Found differences with the reference table");
        print_diff(reference.trim_end(), table.trim_end(), "\n");
        return Err(Box::new(AppError::ReferenceMismatch { path: path_s }));
    }
    info!("The table matches the reference {}", path_s);
    Ok(())
}

fn open_store(path: &Option<PathBuf>) -> BAppResult<Box<dyn RecordStore>> {
    let store: Box<dyn RecordStore> = match path {
        Some(p) => Box::new(JsonFileStore::open(p)?),
        None => {
            debug!("open_store: no store given, records are kept in memory");
            Box::new(MemoryStore::default())
        }
    };
    Ok(store)
}

pub fn run(args: &Args) -> BAppResult<()> {
    let settings = Settings::from_args(args)?;
    debug!("run: settings: {:?}", settings);

    let mut store = open_store(&settings.store)?;
    let mut set = RecordSet::load(store.as_ref()).context(CoreSnafu)?;
    info!("run: {} records in the session", set.len());
    if settings.reset {
        info!("run: deleting {} records", set.len());
        set = set.reset(store.as_mut()).context(CoreSnafu)?;
    }

    let set = update_session(set, &settings)?;
    let failed = persist_all(&set, store.as_mut());
    if !failed.is_empty() {
        warn!("run: {} records could not be saved", failed.len());
    }

    let table = if settings.judges.is_empty() {
        let ranked = rank(set.records());
        produce(&ranked, &settings.report, &settings)?
    } else {
        let averaged = average_judges(&settings)?;
        let ranked = rank(averaged);
        produce(&ranked, &settings.averaged_report, &settings)?
    };

    if let Some(reference) = &settings.reference {
        check_reference(reference, &table)?;
    }
    Ok(())
}
