use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::StoreError;
use crate::record::DailyRecord;

/// Read the persisted record sequence. A missing file is an empty history;
/// a file that exists but does not parse is an error.
pub fn load_records(path: &Path) -> Result<Vec<DailyRecord>, StoreError> {
    if !path.exists() {
        debug!(action = "load", component = "store", path = ?path, "No data file yet, starting empty");
        return Ok(Vec::new());
    }

    let raw = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let records: Vec<DailyRecord> =
        serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
            path: path.display().to_string(),
            source,
        })?;

    debug!(
        action = "load",
        component = "store",
        record_count = records.len(),
        path = ?path,
        "Loaded record sequence"
    );
    Ok(records)
}

/// Write the full record sequence, creating the parent directory when needed.
/// The file is replaced in one shot; there is no atomic rename step, so a
/// crash mid-write can corrupt it.
pub fn save_records(path: &Path, records: &[DailyRecord]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let mut payload = serde_json::to_string_pretty(records)?;
    payload.push('\n');
    fs::write(path, payload).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;

    info!(
        action = "save",
        component = "store",
        record_count = records.len(),
        path = ?path,
        "Record sequence written"
    );
    Ok(())
}
