use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::args::Args;
use crate::judge::*;

/// Report settings, as found in the configuration file. Unset fields take the
/// defaults of the report they apply to.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSettings {
    pub title: Option<String>,
    pub hide_observations: Option<bool>,
    pub main_name_label: Option<String>,
    pub item_name_label: Option<String>,
    pub copyright: Option<String>,
    pub year: Option<i32>,
}

impl ReportSettings {
    fn apply(&self, defaults: ReportOptions) -> ReportOptions {
        ReportOptions {
            title: self.title.clone().or(defaults.title),
            hide_observations: self.hide_observations.unwrap_or(defaults.hide_observations),
            main_name_label: self
                .main_name_label
                .clone()
                .unwrap_or(defaults.main_name_label),
            item_name_label: self.item_name_label.clone().or(defaults.item_name_label),
            copyright: self.copyright.clone().or(defaults.copyright),
            year: self.year.or(defaults.year),
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoSettings {
    pub path: String,
    /// Size on the page, in points.
    pub width: f64,
    pub height: f64,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeConfig {
    pub folder: Option<String>,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub judges: Vec<String>,
    pub store: Option<String>,
    pub output_directory: Option<String>,
    pub reference: Option<String>,
    pub contestant_root: Option<String>,
    /// The session ranking.
    #[serde(default)]
    pub report: ReportSettings,
    /// The ranking averaged over the judges.
    #[serde(default)]
    pub averaged_report: ReportSettings,
    pub header_logo: Option<LogoSettings>,
    pub footer_logo: Option<LogoSettings>,
}

pub fn read_config(path: &Path) -> BAppResult<JudgeConfig> {
    let path_s = path.display().to_string();
    let contents = fs::read_to_string(path).context(OpeningFileSnafu {
        path: path_s.clone(),
    })?;
    let config: JudgeConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path: path_s })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

/// Everything a run needs, with the paths resolved.
#[derive(PartialEq, Debug, Clone)]
pub struct Settings {
    pub folder: Option<PathBuf>,
    pub imports: Vec<PathBuf>,
    pub judges: Vec<PathBuf>,
    pub store: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub reference: Option<PathBuf>,
    pub reset: bool,
    pub report: ReportOptions,
    pub averaged_report: ReportOptions,
    pub averaging: AveragingOptions,
    pub header_logo: Option<LogoSettings>,
    pub footer_logo: Option<LogoSettings>,
}

/// The defaults of the report of the averaged ranking.
pub fn averaged_report_defaults() -> ReportOptions {
    ReportOptions {
        title: Some("Ranking Final Promedio de Clasificación".to_string()),
        hide_observations: true,
        main_name_label: "Nombre del Concursante".to_string(),
        item_name_label: Some("Nombre Imagen".to_string()),
        ..ReportOptions::default()
    }
}

impl Settings {
    /// Merges the configuration file (if any) and the command line. The
    /// command line wins.
    pub fn from_args(args: &Args) -> BAppResult<Settings> {
        let (config, root) = match &args.config {
            Some(p) => {
                let p = Path::new(p);
                let root = p.parent().map(|r| r.to_path_buf()).unwrap_or_default();
                (read_config(p)?, root)
            }
            None => (JudgeConfig::default(), PathBuf::new()),
        };
        let resolve = |s: &String| root.join(s);

        let arg_path = |s: &String| PathBuf::from(s);
        let folder = args
            .folder
            .as_ref()
            .map(arg_path)
            .or_else(|| config.folder.as_ref().map(resolve));
        let imports: Vec<PathBuf> = if args.import.is_empty() {
            config.imports.iter().map(resolve).collect()
        } else {
            args.import.iter().map(arg_path).collect()
        };
        let judges: Vec<PathBuf> = if args.judge.is_empty() {
            config.judges.iter().map(resolve).collect()
        } else {
            args.judge.iter().map(arg_path).collect()
        };
        if judges.len() > JUDGE_COUNT {
            return Err(Box::new(AppError::InvalidSettings {
                message: format!(
                    "the averaged ranking takes {} judge sheets, {} were given",
                    JUDGE_COUNT,
                    judges.len()
                ),
            }));
        }

        let mut report = config.report.apply(ReportOptions::default());
        let mut averaged_report = config.averaged_report.apply(averaged_report_defaults());
        for r in [&mut report, &mut averaged_report] {
            if let Some(t) = &args.title {
                r.title = Some(t.clone());
            }
            if args.hide_observations {
                r.hide_observations = true;
            }
        }

        let averaging = match &config.contestant_root {
            Some(c) => AveragingOptions {
                contestant_root: c.clone(),
            },
            None => AveragingOptions::default(),
        };
        let resolve_logo = |l: &LogoSettings| LogoSettings {
            path: root.join(&l.path).display().to_string(),
            ..l.clone()
        };

        Ok(Settings {
            folder,
            imports,
            judges,
            store: args
                .store
                .as_ref()
                .map(arg_path)
                .or_else(|| config.store.as_ref().map(resolve)),
            out: args
                .out
                .as_ref()
                .map(arg_path)
                .or_else(|| config.output_directory.as_ref().map(resolve)),
            reference: args
                .reference
                .as_ref()
                .map(arg_path)
                .or_else(|| config.reference.as_ref().map(resolve)),
            reset: args.reset,
            report,
            averaged_report,
            averaging,
            header_logo: config.header_logo.as_ref().map(resolve_logo),
            footer_logo: config.footer_logo.as_ref().map(resolve_logo),
        })
    }
}
