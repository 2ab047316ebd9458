//! Observable per-item record lists and the read-only views derived from them.
//!
//! Views are recomputed on every call; nothing is cached.

use crate::model::record::{CheckInRecord, RecordsByItem};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;

/// Immutable published view of all records, grouped by item id.
pub type RecordsSnapshot = Arc<RecordsByItem>;

/// Number of check-ins on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: u32,
}

impl DayCount {
    /// `MM/dd` axis label.
    pub fn short_label(&self) -> String {
        self.date.format("%m/%d").to_string()
    }
}

pub struct RecordStore {
    state: watch::Sender<RecordsSnapshot>,
}

impl RecordStore {
    pub fn new(records: RecordsByItem) -> Self {
        let (state, _) = watch::channel(Arc::new(records));
        Self { state }
    }

    pub fn snapshot(&self) -> RecordsSnapshot {
        Arc::clone(&self.state.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<RecordsSnapshot> {
        self.state.subscribe()
    }

    pub fn replace(&mut self, records: RecordsByItem) {
        self.state.send_replace(Arc::new(records));
    }

    /// Appends a record stamped `now` for `item_id`. Does not persist.
    pub fn add_record(&mut self, item_id: &str, now: DateTime<Local>) -> CheckInRecord {
        let record = CheckInRecord::new(item_id, now);
        let mut next = self.snapshot().as_ref().clone();
        next.entry(item_id.to_string())
            .or_default()
            .push(record.clone());
        self.replace(next);
        record
    }

    pub fn remove_record(&mut self, item_id: &str, record_id: &str) -> Option<CheckInRecord> {
        let snapshot = self.snapshot();
        let index = snapshot
            .get(item_id)?
            .iter()
            .position(|record| record.id == record_id)?;

        let mut next = snapshot.as_ref().clone();
        let removed = next.get_mut(item_id)?.remove(index);
        self.replace(next);
        Some(removed)
    }

    /// Makes sure an (empty) group exists for `item_id`.
    pub fn ensure_group(&mut self, item_id: &str) {
        if self.state.borrow().contains_key(item_id) {
            return;
        }
        let mut next = self.snapshot().as_ref().clone();
        next.insert(item_id.to_string(), Vec::new());
        self.replace(next);
    }

    pub fn records_for_item(&self, item_id: &str) -> Vec<CheckInRecord> {
        self.state
            .borrow()
            .get(item_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn records_for_item_and_date(&self, item_id: &str, date: NaiveDate) -> Vec<CheckInRecord> {
        self.filtered(item_id, |record| record.date == date)
    }

    /// Record with the latest timestamp.
    pub fn last_record_for_item(&self, item_id: &str) -> Option<CheckInRecord> {
        self.state
            .borrow()
            .get(item_id)?
            .iter()
            .max_by_key(|record| record.timestamp)
            .cloned()
    }

    /// Records with `start <= timestamp <= end`.
    pub fn count_in_range(
        &self,
        item_id: &str,
        start: impl Into<DateTime<Utc>>,
        end: impl Into<DateTime<Utc>>,
    ) -> usize {
        let (start, end) = (start.into(), end.into());
        self.filtered(item_id, |record| {
            record.timestamp >= start && record.timestamp <= end
        })
        .len()
    }

    /// Count for every day of `month` (1-12); empty for an invalid month.
    pub fn monthly_counts(&self, item_id: &str, year: i32, month: u32) -> BTreeMap<NaiveDate, u32> {
        let days = days_of_month(year, month);
        let mut counts: BTreeMap<NaiveDate, u32> = days.iter().map(|day| (*day, 0)).collect();
        if let Some(records) = self.state.borrow().get(item_id) {
            for record in records {
                if let Some(count) = counts.get_mut(&record.date) {
                    *count += 1;
                }
            }
        }
        counts
    }

    /// Counts for the seven days ending at `today`, oldest first.
    pub fn weekly_counts(&self, item_id: &str, today: NaiveDate) -> Vec<DayCount> {
        let state = self.state.borrow();
        let records = state.get(item_id);
        (0..7)
            .rev()
            .map(|days_back| {
                let date = today - Duration::days(days_back);
                let count = records.map_or(0, |records| {
                    records.iter().filter(|record| record.date == date).count()
                });
                DayCount {
                    date,
                    count: u32::try_from(count).unwrap_or(u32::MAX),
                }
            })
            .collect()
    }

    fn filtered(
        &self,
        item_id: &str,
        keep: impl Fn(&CheckInRecord) -> bool,
    ) -> Vec<CheckInRecord> {
        self.state
            .borrow()
            .get(item_id)
            .map(|records| records.iter().filter(|record| keep(*record)).cloned().collect())
            .unwrap_or_default()
    }
}

/// All days of `month` (1-12) in `year`, or none for an invalid month.
pub(crate) fn days_of_month(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|day| day.month() == month)
        .collect()
}
