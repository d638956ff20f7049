//! Typed errors for page fetching and record storage.

use thiserror::Error;

/// Errors raised while retrieving a page or locating its view count.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Every configured transport failed to produce page content.
    #[error("failed to retrieve {url}: {detail}")]
    Unreachable { url: String, detail: String },

    /// The page was retrieved but the view-count marker was absent.
    #[error("could not find view count in {url}")]
    ViewCountMissing { url: String },
}

/// Errors raised while loading or saving the persisted record sequence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The data file exists but does not parse as a record sequence.
    #[error("malformed data file {path}: {source}")]
    Malformed {
        path: String,
        source: serde_json::Error,
    },

    /// Serializing the record sequence failed.
    #[error("failed to encode records: {0}")]
    Encode(#[from] serde_json::Error),

    /// Reading or writing the data file failed.
    #[error("{path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}
