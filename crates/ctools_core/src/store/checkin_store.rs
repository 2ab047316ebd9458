//! Check-in use-case facade.
//!
//! # Responsibility
//! - Own the item store, record store, preference backend and clock.
//! - Run each use case as one in-memory mutation followed by one preference
//!   batch write.
//!
//! # Invariants
//! - Unknown item/record ids are silent no-ops (`Ok(None)` / `Ok(false)`).
//! - `count_<id>` is only meaningful together with `last_update_<id> == today`.
//! - In-memory counts belong to `counts_day`; mutators roll them over to the
//!   clock's current day before touching them.
//! - `delete_item` is session-only: the persisted item list is left untouched.
//! - Logs carry ids and counts only, never names or other user text.

use crate::clock::{Clock, SystemClock};
use crate::codec::{decode_records, encode_records, ItemColumns};
use crate::model::item::{default_items, CheckInItem, NewCheckInItem};
use crate::model::record::{CheckInRecord, RecordsByItem};
use crate::prefs::keys::{self, DATE_FORMAT};
use crate::prefs::{PrefEdit, PrefError, PreferenceStore};
use crate::store::item_store::{ItemStore, ItemsSnapshot};
use crate::store::reconcile::reconcile_today;
use crate::store::record_store::{DayCount, RecordStore, RecordsSnapshot};
use chrono::{DateTime, Local, NaiveDate};
use log::{debug, error, info};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use tokio::sync::watch;

const MAX_NAME_CHARS: usize = 64;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from check-in use cases.
#[derive(Debug)]
pub enum StoreError {
    /// Preference backend read/write failure.
    Prefs(PrefError),
    /// Item input rejected before any state change.
    InvalidItem(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prefs(err) => write!(f, "{err}"),
            Self::InvalidItem(reason) => write!(f, "invalid check-in item: {reason}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Prefs(err) => Some(err),
            Self::InvalidItem(_) => None,
        }
    }
}

impl From<PrefError> for StoreError {
    fn from(value: PrefError) -> Self {
        Self::Prefs(value)
    }
}

/// Summary of one `initialize` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    /// Nothing usable was persisted; built-in items were seeded and saved.
    pub seeded_defaults: bool,
    pub item_count: usize,
    pub record_count: usize,
    /// Record lines that could not be decoded and were dropped.
    pub dropped_record_lines: usize,
    /// Items whose records for today were rebuilt from the counter.
    pub reconciled_items: usize,
}

/// State holder handed to the presentation layer.
pub struct CheckInStore<P: PreferenceStore, C: Clock = SystemClock> {
    prefs: P,
    clock: C,
    items: ItemStore,
    records: RecordStore,
    counts_day: NaiveDate,
}

impl<P: PreferenceStore> CheckInStore<P, SystemClock> {
    /// Creates a store on the wall clock. Call [`CheckInStore::initialize`] next.
    pub fn new(prefs: P) -> Self {
        Self::with_clock(prefs, SystemClock)
    }
}

impl<P: PreferenceStore, C: Clock> CheckInStore<P, C> {
    /// Creates a store holding the built-in items in memory and no records.
    pub fn with_clock(prefs: P, clock: C) -> Self {
        let counts_day = clock.today();
        Self {
            prefs,
            clock,
            items: ItemStore::new(default_items()),
            records: RecordStore::new(RecordsByItem::new()),
            counts_day,
        }
    }

    /// Loads items, today's counts and records, then reconciles.
    ///
    /// # Side effects
    /// - Persists the item list when defaults had to be seeded.
    /// - Persists the record list when reconciliation changed it.
    pub fn initialize(&mut self) -> StoreResult<InitReport> {
        let now = self.clock.now();
        let today = now.date_naive();
        let today_text = today.format(DATE_FORMAT).to_string();

        let persisted = ItemColumns::load(&self.prefs)?.and_then(|columns| columns.decode());
        let seeded_defaults = persisted.is_none();
        let mut items = match persisted {
            Some(items) => items,
            None => self.items.snapshot().as_ref().clone(),
        };
        if seeded_defaults {
            self.prefs
                .apply(ItemColumns::encode(&items).write_into(PrefEdit::new()))?;
        }

        for item in &mut items {
            let last_update = self.prefs.get_string(&keys::last_update_key(&item.id))?;
            item.count = if last_update.as_deref() == Some(today_text.as_str()) {
                let stored = self.prefs.get_int(&keys::count_key(&item.id))?;
                stored.map_or(0, |count| u32::try_from(count.max(0)).unwrap_or(u32::MAX))
            } else {
                0
            };
        }
        items.sort_by_key(|item| item.order);
        self.items.replace(items);
        self.counts_day = today;

        let raw_records = self.prefs.get_string(keys::RECORDS)?.unwrap_or_default();
        let decoded = decode_records(&raw_records);
        if decoded.dropped_lines > 0 {
            debug!(
                "event=records_decode module=store status=partial dropped_lines={}",
                decoded.dropped_lines
            );
        }
        let dropped_record_lines = decoded.dropped_lines;
        let mut records = decoded.by_item;

        let items = self.items.snapshot();
        let adjustments = reconcile_today(&items, &mut records, now);
        for adjustment in &adjustments {
            info!(
                "event=reconcile module=store status=adjusted item_id={} removed={} synthesized={}",
                adjustment.item_id, adjustment.removed, adjustment.synthesized
            );
        }
        self.records.replace(records);
        if !adjustments.is_empty() {
            self.persist(self.records_edit(PrefEdit::new()), "reconcile")?;
        }

        let report = InitReport {
            seeded_defaults,
            item_count: items.len(),
            record_count: self.records.snapshot().values().map(Vec::len).sum(),
            dropped_record_lines,
            reconciled_items: adjustments.len(),
        };
        info!(
            "event=checkin_init module=store status=ok seeded_defaults={} items={} records={} dropped_lines={} reconciled={}",
            report.seeded_defaults,
            report.item_count,
            report.record_count,
            report.dropped_record_lines,
            report.reconciled_items
        );
        Ok(report)
    }

    /// Current item snapshot in display order.
    pub fn items(&self) -> ItemsSnapshot {
        self.items.snapshot()
    }

    /// Current record snapshot.
    pub fn records(&self) -> RecordsSnapshot {
        self.records.snapshot()
    }

    pub fn subscribe_items(&self) -> watch::Receiver<ItemsSnapshot> {
        self.items.subscribe()
    }

    pub fn subscribe_records(&self) -> watch::Receiver<RecordsSnapshot> {
        self.records.subscribe()
    }

    pub fn item(&self, id: &str) -> Option<CheckInItem> {
        self.items.get(id)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    /// Day the in-memory counts were taken on.
    pub fn counts_day(&self) -> NaiveDate {
        self.counts_day
    }

    /// Zeroes every count once the local day differs from [`Self::counts_day`].
    ///
    /// Storage is left alone: a stored count whose `last_update_<id>` is not
    /// today already loads as zero. Returns `true` when the day changed.
    pub fn roll_over_day(&mut self) -> bool {
        let today = self.clock.today();
        if today == self.counts_day {
            return false;
        }
        let previous = self.counts_day;
        self.counts_day = today;
        if self.items.snapshot().iter().any(|item| item.count > 0) {
            self.items.reset_counts();
        }
        info!("event=day_rollover module=store status=ok from={previous} to={today}");
        true
    }

    /// Records one check-in for `id` and returns the new count.
    pub fn increment(&mut self, id: &str) -> StoreResult<Option<u32>> {
        self.roll_over_day();
        if !self.items.contains(id) {
            debug!("event=checkin_increment module=store status=skipped reason=unknown_item");
            return Ok(None);
        }

        let now = self.clock.now();
        let record = self.records.add_record(id, now);
        let Some(count) = self.items.increment(id) else {
            return Ok(None);
        };

        let edit = PrefEdit::new()
            .put_int(keys::count_key(id), i64::from(count))
            .put_string(
                keys::last_update_key(id),
                now.date_naive().format(DATE_FORMAT).to_string(),
            );
        self.persist(self.records_edit(edit), "checkin_increment")?;
        debug!(
            "event=checkin_increment module=store status=ok item_id={} record_id={} count={}",
            id, record.id, count
        );
        Ok(Some(count))
    }

    /// Appends a new item at the end of the list and persists the list.
    pub fn add_item(&mut self, input: NewCheckInItem) -> StoreResult<CheckInItem> {
        let input = validate_new_item(input)?;
        let order = i32::try_from(self.items.len()).unwrap_or(i32::MAX);
        let item = CheckInItem::create(input, order);

        self.items.push(item.clone());
        self.records.ensure_group(&item.id);
        self.persist(self.items_edit(), "item_add")?;
        info!(
            "event=item_add module=store status=ok item_id={} order={}",
            item.id, item.order
        );
        Ok(item)
    }

    /// Replaces the item with the same id; `false` when it does not exist.
    pub fn update_item(&mut self, mut item: CheckInItem) -> StoreResult<bool> {
        item.name = validate_name(&item.name)?;
        item.unit = item.unit.trim().to_string();
        let id = item.id.clone();
        if !self.items.update(item) {
            return Ok(false);
        }

        self.persist(self.items_edit(), "item_update")?;
        info!("event=item_update module=store status=ok item_id={id}");
        Ok(true)
    }

    /// Removes the item for this session only. Its records are kept.
    pub fn delete_item(&mut self, id: &str) -> Option<CheckInItem> {
        let removed = self.items.remove(id)?;
        info!("event=item_delete module=store status=ok item_id={id} persisted=false");
        Some(removed)
    }

    /// Puts a previously deleted item back; `false` if the id is already present.
    pub fn restore_item(&mut self, item: CheckInItem) -> bool {
        if self.items.contains(&item.id) {
            return false;
        }
        self.records.ensure_group(&item.id);
        let id = item.id.clone();
        self.items.push(item);
        info!("event=item_restore module=store status=ok item_id={id}");
        true
    }

    /// Applies a new display order and persists the list.
    pub fn reorder_items<S: AsRef<str>>(&mut self, sequence: &[S]) -> StoreResult<ItemsSnapshot> {
        let snapshot = self.items.reorder(sequence);
        self.persist(self.items_edit(), "item_reorder")?;
        info!(
            "event=item_reorder module=store status=ok items={}",
            snapshot.len()
        );
        Ok(snapshot)
    }

    /// Sets every count to zero. Records are untouched.
    pub fn reset_all_counts(&mut self) -> StoreResult<()> {
        self.roll_over_day();
        self.items.reset_counts();
        let today = self.counts_day.format(DATE_FORMAT).to_string();
        let edit = self
            .items
            .snapshot()
            .iter()
            .fold(PrefEdit::new(), |edit, item| {
                edit.put_int(keys::count_key(&item.id), 0)
                    .put_string(keys::last_update_key(&item.id), today.as_str())
            });
        self.persist(edit, "counts_reset")?;
        info!("event=counts_reset module=store status=ok");
        Ok(())
    }

    /// Deletes one record and takes one off the owning item's count.
    ///
    /// Returns `false` when no such record exists; the count is then untouched.
    pub fn delete_record(&mut self, item_id: &str, record_id: &str) -> StoreResult<bool> {
        self.roll_over_day();
        if self.records.remove_record(item_id, record_id).is_none() {
            debug!("event=record_delete module=store status=skipped reason=unknown_record");
            return Ok(false);
        }

        let mut edit = PrefEdit::new();
        if let Some(count) = self.items.decrement(item_id) {
            edit = edit
                .put_int(keys::count_key(item_id), i64::from(count))
                .put_string(
                    keys::last_update_key(item_id),
                    self.counts_day.format(DATE_FORMAT).to_string(),
                );
        }
        self.persist(self.records_edit(edit), "record_delete")?;
        info!("event=record_delete module=store status=ok item_id={item_id} record_id={record_id}");
        Ok(true)
    }

    pub fn records_for_item(&self, item_id: &str) -> Vec<CheckInRecord> {
        self.records.records_for_item(item_id)
    }

    pub fn records_for_item_and_date(&self, item_id: &str, date: NaiveDate) -> Vec<CheckInRecord> {
        self.records.records_for_item_and_date(item_id, date)
    }

    pub fn last_record_for_item(&self, item_id: &str) -> Option<CheckInRecord> {
        self.records.last_record_for_item(item_id)
    }

    /// Records whose timestamp lies in `[start, end]`.
    pub fn count_in_range(
        &self,
        item_id: &str,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> usize {
        self.records.count_in_range(item_id, start, end)
    }

    /// Per-day counts for `month` (1-12) of `year`.
    pub fn monthly_counts(&self, item_id: &str, year: i32, month: u32) -> BTreeMap<NaiveDate, u32> {
        self.records.monthly_counts(item_id, year, month)
    }

    /// Per-day counts for the last seven days including today, oldest first.
    pub fn weekly_counts(&self, item_id: &str) -> Vec<DayCount> {
        self.records.weekly_counts(item_id, self.clock.today())
    }

    fn items_edit(&self) -> PrefEdit {
        ItemColumns::encode(&self.items.snapshot()).write_into(PrefEdit::new())
    }

    fn records_edit(&self, edit: PrefEdit) -> PrefEdit {
        edit.put_string(keys::RECORDS, encode_records(&self.records.snapshot()))
    }

    fn persist(&self, edit: PrefEdit, event: &'static str) -> StoreResult<()> {
        self.prefs.apply(edit).map_err(|err| {
            error!("event={event} module=store status=error error_code=prefs_write_failed error={err}");
            StoreError::from(err)
        })
    }
}

fn validate_new_item(mut input: NewCheckInItem) -> StoreResult<NewCheckInItem> {
    input.name = validate_name(&input.name)?;
    input.unit = input.unit.trim().to_string();
    Ok(input)
}

/// Trimmed name, 1 to `MAX_NAME_CHARS` chars.
fn validate_name(name: &str) -> StoreResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::InvalidItem("name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(StoreError::InvalidItem("name is too long"));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::{validate_new_item, StoreError};
    use crate::model::item::NewCheckInItem;

    fn input(name: &str) -> NewCheckInItem {
        NewCheckInItem {
            name: name.to_string(),
            description: String::new(),
            icon: "ic_star".to_string(),
            goal: 0,
            unit: " pages ".to_string(),
        }
    }

    #[test]
    fn validation_trims_name_and_unit() {
        let valid = validate_new_item(input("  read  ")).unwrap();
        assert_eq!(valid.name, "read");
        assert_eq!(valid.unit, "pages");
    }

    #[test]
    fn validation_rejects_blank_and_overlong_names() {
        assert!(matches!(
            validate_new_item(input("   ")),
            Err(StoreError::InvalidItem(_))
        ));
        assert!(matches!(
            validate_new_item(input(&"x".repeat(65))),
            Err(StoreError::InvalidItem(_))
        ));
    }
}
