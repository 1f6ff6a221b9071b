mod args;
mod judge;

use clap::Parser;
use log::{debug, error, LevelFilter};

fn main() {
    let args = args::Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();
    debug!("args: {:?}", args);

    if let Err(e) = judge::run(&args) {
        error!("{}", e);
        eprintln!("An error occured: {}", e);
        std::process::exit(1);
    }
}
