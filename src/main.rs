use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tracing::error;

use viewtally::fetch::{Fetcher, HttpRequest};
use viewtally::tracker::{print_report, update_views};
use viewtally::{args::Args, config::TrackerConfig, utils::setup_logging};

fn run(args: &Args) -> Result<()> {
    let config = TrackerConfig::new(args.data_file.clone());
    config.validate()?;

    if args.report {
        return print_report(&config);
    }

    let fetcher = if args.no_curl {
        Fetcher::with_strategies(vec![Box::new(HttpRequest::new())])
    } else {
        Fetcher::new()
    };

    update_views(&config, &fetcher, Local::now().date_naive())
}

fn main() {
    let args = Args::parse();
    setup_logging(args.verbose);

    if let Err(e) = run(&args) {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
