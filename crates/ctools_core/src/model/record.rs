//! Check-in record model.

use crate::prefs::keys::DATE_FORMAT;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub type RecordId = String;

/// Records grouped by owning item id, each group in insertion order.
pub type RecordsByItem = BTreeMap<String, Vec<CheckInRecord>>;

/// One timestamped check-in for an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInRecord {
    pub id: RecordId,
    pub item_id: String,
    /// Millisecond precision; sub-millisecond parts are truncated on creation.
    pub timestamp: DateTime<Utc>,
    /// Local calendar day the record counts towards.
    pub date: NaiveDate,
}

impl CheckInRecord {
    /// Creates a record at `at`, dated by the local day of `at`.
    pub fn new(item_id: impl Into<String>, at: DateTime<Local>) -> Self {
        Self::with_date(item_id, at, at.date_naive())
    }

    /// Creates a record with an explicit day.
    ///
    /// Used when synthesized timestamps may cross midnight but must still
    /// count towards a specific day.
    pub fn with_date(item_id: impl Into<String>, at: DateTime<Local>, date: NaiveDate) -> Self {
        let millis = at.timestamp_millis();
        Self {
            id: Uuid::new_v4().to_string(),
            item_id: item_id.into(),
            timestamp: DateTime::<Utc>::from_timestamp_millis(millis)
                .unwrap_or_else(|| at.with_timezone(&Utc)),
            date,
        }
    }

    pub fn epoch_millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }

    /// `yyyy-MM-dd` form of [`CheckInRecord::date`].
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// `HH:mm:ss` in local time, for record list rows.
    pub fn local_time_label(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string()
    }
}
