use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One dated entry in the persisted sequence. View counts live under
/// `<key>_views` field names, flattened into the record object so the file
/// keeps the original flat shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub views: Map<String, Value>,
}

impl DailyRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            views: Map::new(),
        }
    }

    /// Store `count` under `<key>_views`, overwriting any previous value.
    pub fn set_views(&mut self, key: &str, count: u64) {
        self.views.insert(format!("{key}_views"), Value::from(count));
    }

    pub fn views_for(&self, key: &str) -> Option<u64> {
        self.views
            .get(&format!("{key}_views"))
            .and_then(Value::as_u64)
    }
}

/// Pick the record to fill for `date`: the last record when its date already
/// matches, otherwise a fresh record appended to the sequence. Only the last
/// element is checked; earlier records are never revisited.
pub fn record_for_date(records: &mut Vec<DailyRecord>, date: NaiveDate) -> &mut DailyRecord {
    let last_matches = records.last().map(|r| r.date == date).unwrap_or(false);
    if !last_matches {
        records.push(DailyRecord::new(date));
    }
    records.last_mut().expect("records cannot be empty here")
}
