use clap::Parser;

/// This is a scoring and ranking program for photography contests.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the session settings. Paths in this file are relative
    /// to its own location. Every setting can be overridden by the options below.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (directory, optional) The contest folder to scan for images. Keys of the images include the
    /// name of this folder.
    #[clap(short, long, value_parser)]
    pub folder: Option<String>,

    /// (file path, repeatable) A spreadsheet (xlsx or csv) whose scores and observations overwrite
    /// the ones of the session.
    #[clap(short, long, value_parser)]
    pub import: Vec<String>,

    /// (file path, given three times) The spreadsheet of one judge. When provided, the averaged
    /// ranking of the three judges is produced instead of the session ranking.
    #[clap(short, long, value_parser)]
    pub judge: Vec<String>,

    /// (file path, optional) The JSON file where the session records are kept between runs.
    /// Without it, nothing is kept.
    #[clap(short, long, value_parser)]
    pub store: Option<String>,

    /// (directory, optional) Where to write ranking.pages.json and ranking.csv. If not specified,
    /// the table is printed on the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference CSV table. If provided, photojudge will check that the produced
    /// table matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// The title of the report.
    #[clap(long, value_parser)]
    pub title: Option<String>,

    /// If passed as an argument, the observations column is left out of the report.
    #[clap(long, takes_value = false)]
    pub hide_observations: bool,

    /// If passed as an argument, the stored records are deleted before anything else.
    #[clap(long, takes_value = false)]
    pub reset: bool,

    /// Turns on debug logging.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
