use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "viewtally",
    about = "Track daily view counts for a pair of MathWorks blog posts",
    version,
    long_about = None
)]
pub struct Args {
    /// Path to the JSON file holding the daily records
    #[arg(short, long, default_value = "data/views.json")]
    pub data_file: PathBuf,

    /// Skip the curl subprocess and fetch with the built-in HTTP client only
    #[arg(long)]
    pub no_curl: bool,

    /// Print the latest standings instead of fetching
    #[arg(long)]
    pub report: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
