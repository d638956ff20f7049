pub mod args;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod record;
pub mod store;
pub mod tracker;
pub mod utils;

pub use args::Args;
pub use config::{TrackedPost, TrackerConfig};
pub use error::{FetchError, StoreError};
pub use fetch::{CurlCommand, FetchStrategy, Fetcher, HttpRequest};
pub use record::DailyRecord;
pub use tracker::{print_report, update_views};
