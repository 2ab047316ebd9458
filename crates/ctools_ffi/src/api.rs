//! FFI use-case API for the UI shell.
//!
//! # Responsibility
//! - Expose check-in use cases to Dart via FRB as plain value types.
//! - Hold the single process-wide check-in session.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The session is initialized (and reconciled) on first use and again on
//!   every `checkin_initialize` call.
//! - Counts are rolled over to the current day before they are read or changed.
//! - Mutations go through the session mutex one at a time.

use chrono::NaiveDate;
use ctools_core::{
    builtin_tools, core_version as core_version_inner, init_logging as init_logging_inner,
    ping as ping_inner, CheckInItem, CheckInRecord, CheckInStore, InitReport, MonthHeatmap,
    NewCheckInItem, SqlitePreferenceStore, StoreError, WEEKDAY_LABELS,
};
use log::{error, info};
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

const DB_FILE_NAME: &str = "ctools_checkin.sqlite3";
const DB_PATH_ENV: &str = "CTOOLS_DB_PATH";

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION: Lazy<Mutex<Option<CheckInStore<SqlitePreferenceStore>>>> =
    Lazy::new(|| Mutex::new(None));

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Launcher entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolView {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
}

/// Check-in item row as rendered by the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInItemView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub count: u32,
    pub goal: u32,
    pub unit: String,
    pub order: i32,
    /// `3/8 cups` or `3 times`.
    pub count_label: String,
    pub goal_reached: bool,
}

/// One record row in the detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInRecordView {
    pub id: String,
    pub item_id: String,
    pub epoch_ms: i64,
    /// `yyyy-MM-dd`.
    pub date: String,
    /// `HH:mm:ss`, local time.
    pub time: String,
}

/// One bar in the weekly chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCountView {
    pub date: String,
    /// `MM/dd`.
    pub label: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatmapCellView {
    pub date: String,
    pub count: u32,
    pub level: u8,
    pub row: u32,
    pub column: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatmapView {
    pub title: String,
    /// Column headers, Sunday first.
    pub weekday_labels: Vec<String>,
    pub leading_blanks: u32,
    pub rows: u32,
    pub total: u32,
    pub cells: Vec<HeatmapCellView>,
}

/// Generic action response envelope for check-in mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInActionResponse {
    /// Whether the operation took effect.
    pub ok: bool,
    /// Item affected by the operation, when one exists.
    pub item: Option<CheckInItemView>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl CheckInActionResponse {
    fn success(message: impl Into<String>, item: Option<CheckInItemView>) -> Self {
        Self {
            ok: true,
            item,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            item: None,
            message: message.into(),
        }
    }
}

/// Result of loading (or reloading) the check-in session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInInitResponse {
    pub ok: bool,
    pub seeded_defaults: bool,
    pub item_count: u32,
    pub record_count: u32,
    pub reconciled_items: u32,
    pub message: String,
}

impl CheckInInitResponse {
    fn from_report(report: &InitReport) -> Self {
        Self {
            ok: true,
            seeded_defaults: report.seeded_defaults,
            item_count: saturating_u32(report.item_count),
            record_count: saturating_u32(report.record_count),
            reconciled_items: saturating_u32(report.reconciled_items),
            message: "Check-in loaded.".to_string(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            seeded_defaults: false,
            item_count: 0,
            record_count: 0,
            reconciled_items: 0,
            message: message.into(),
        }
    }
}

/// Lists launcher tools in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn tools_list() -> Vec<ToolView> {
    builtin_tools()
        .into_iter()
        .map(|tool| ToolView {
            id: tool.id,
            name: tool.name,
            icon: tool.icon,
            description: tool.description,
        })
        .collect()
}

/// Loads the check-in state from storage and reconciles today's records.
///
/// Call on every check-in screen open. Session-only deletions are undone by
/// the reload.
#[flutter_rust_bridge::frb(sync)]
pub fn checkin_initialize() -> CheckInInitResponse {
    let result = lock_session().and_then(|mut guard| {
        let (mut store, existed) = match guard.take() {
            Some(store) => (store, true),
            None => (open_store()?, false),
        };
        let report = store.initialize();
        if report.is_ok() || existed {
            *guard = Some(store);
        }
        report.map_err(|err| format!("check-in init failed: {err}"))
    });

    match result {
        Ok(report) => CheckInInitResponse::from_report(&report),
        Err(err) => {
            error!("event=checkin_initialize module=ffi status=error error={err}");
            CheckInInitResponse::failure(err)
        }
    }
}

/// Current items in display order; empty when storage cannot be opened.
#[flutter_rust_bridge::frb(sync)]
pub fn checkin_items() -> Vec<CheckInItemView> {
    with_session(|store| {
        store.roll_over_day();
        Ok(store.items().iter().map(to_item_view).collect())
    })
    .unwrap_or_default()
}

/// Adds one check-in to an item.
#[flutter_rust_bridge::frb(sync)]
pub fn checkin_increment(item_id: String) -> CheckInActionResponse {
    let item_id = item_id.trim().to_string();
    action("checkin_increment", |store| {
        Ok(match store.increment(&item_id)? {
            Some(_) => CheckInActionResponse::success(
                "Checked in.",
                store.item(&item_id).as_ref().map(to_item_view),
            ),
            None => CheckInActionResponse::failure("Item not found."),
        })
    })
}

/// Creates a custom item at the end of the list.
#[flutter_rust_bridge::frb(sync)]
pub fn checkin_add_item(
    name: String,
    description: String,
    icon: String,
    goal: u32,
    unit: String,
) -> CheckInActionResponse {
    action("checkin_add_item", |store| {
        let item = store.add_item(NewCheckInItem {
            name,
            description,
            icon,
            goal,
            unit,
        })?;
        Ok(CheckInActionResponse::success(
            "Item created.",
            Some(to_item_view(&item)),
        ))
    })
}

/// Edits name, description, icon, goal and unit of an existing item.
///
/// Count and order are kept from the current state.
#[flutter_rust_bridge::frb(sync)]
pub fn checkin_update_item(
    item_id: String,
    name: String,
    description: String,
    icon: String,
    goal: u32,
    unit: String,
) -> CheckInActionResponse {
    action("checkin_update_item", |store| {
        let Some(current) = store.item(item_id.trim()) else {
            return Ok(CheckInActionResponse::failure("Item not found."));
        };
        let updated = CheckInItem {
            name: name.trim().to_string(),
            description,
            icon,
            goal,
            unit: unit.trim().to_string(),
            ..current
        };
        store.update_item(updated.clone())?;
        Ok(CheckInActionResponse::success(
            "Item updated.",
            Some(to_item_view(&updated)),
        ))
    })
}

/// Removes an item for the running session. Records are kept.
#[flutter_rust_bridge::frb(sync)]
pub fn checkin_delete_item(item_id: String) -> CheckInActionResponse {
    action("checkin_delete_item", |store| {
        Ok(match store.delete_item(item_id.trim()) {
            Some(item) => CheckInActionResponse::success("Item deleted.", Some(to_item_view(&item))),
            None => CheckInActionResponse::failure("Item not found."),
        })
    })
}

/// Puts a deleted item back (undo). Pass the view returned by delete.
#[flutter_rust_bridge::frb(sync)]
pub fn checkin_restore_item(item: CheckInItemView) -> CheckInActionResponse {
    action("checkin_restore_item", |store| {
        let restored = CheckInItem {
            id: item.id,
            name: item.name,
            description: item.description,
            icon: item.icon,
            count: item.count,
            goal: item.goal,
            unit: item.unit,
            order: item.order,
        };
        let view = to_item_view(&restored);
        Ok(if store.restore_item(restored) {
            CheckInActionResponse::success("Item restored.", Some(view))
        } else {
            CheckInActionResponse::failure("Item already present.")
        })
    })
}

/// Applies a new display order given as item ids.
#[flutter_rust_bridge::frb(sync)]
pub fn checkin_reorder_items(item_ids: Vec<String>) -> CheckInActionResponse {
    action("checkin_reorder_items", |store| {
        store.reorder_items(item_ids.as_slice())?;
        Ok(CheckInActionResponse::success("Items reordered.", None))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn checkin_reset_all_counts() -> CheckInActionResponse {
    action("checkin_reset_all_counts", |store| {
        store.reset_all_counts()?;
        Ok(CheckInActionResponse::success("Counts reset.", None))
    })
}

/// All records of one item, newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn checkin_records(item_id: String) -> Vec<CheckInRecordView> {
    with_session(|store| Ok(newest_first(store.records_for_item(item_id.trim()))))
        .unwrap_or_default()
}

/// Records of one item on `date` (`yyyy-MM-dd`), newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn checkin_records_for_date(item_id: String, date: String) -> Vec<CheckInRecordView> {
    let Ok(date) = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") else {
        return Vec::new();
    };
    with_session(|store| {
        Ok(newest_first(
            store.records_for_item_and_date(item_id.trim(), date),
        ))
    })
    .unwrap_or_default()
}

#[flutter_rust_bridge::frb(sync)]
pub fn checkin_delete_record(item_id: String, record_id: String) -> CheckInActionResponse {
    action("checkin_delete_record", |store| {
        let item_id = item_id.trim();
        Ok(if store.delete_record(item_id, record_id.trim())? {
            CheckInActionResponse::success(
                "Record deleted.",
                store.item(item_id).as_ref().map(to_item_view),
            )
        } else {
            CheckInActionResponse::failure("Record not found.")
        })
    })
}

/// Last seven days including today, oldest first.
#[flutter_rust_bridge::frb(sync)]
pub fn checkin_weekly_counts(item_id: String) -> Vec<DayCountView> {
    with_session(|store| {
        Ok(store
            .weekly_counts(item_id.trim())
            .into_iter()
            .map(|day| DayCountView {
                date: day.date.format("%Y-%m-%d").to_string(),
                label: day.short_label(),
                count: day.count,
            })
            .collect())
    })
    .unwrap_or_default()
}

/// Heatmap grid for `month` (1-12) of `year`; `None` for an invalid month.
#[flutter_rust_bridge::frb(sync)]
pub fn checkin_month_heatmap(item_id: String, year: i32, month: u32) -> Option<HeatmapView> {
    with_session(|store| {
        let counts = store.monthly_counts(item_id.trim(), year, month);
        Ok(MonthHeatmap::build(year, month, &counts).map(to_heatmap_view))
    })
    .ok()
    .flatten()
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_session<T>(
    f: impl FnOnce(&mut CheckInStore<SqlitePreferenceStore>) -> Result<T, StoreError>,
) -> Result<T, String> {
    let mut guard = lock_session()?;

    if guard.is_none() {
        let mut store = open_store()?;
        let report = store
            .initialize()
            .map_err(|err| format!("check-in init failed: {err}"))?;
        info!(
            "event=ffi_session_open module=ffi status=ok seeded_defaults={} reconciled={}",
            report.seeded_defaults, report.reconciled_items
        );
        *guard = Some(store);
    }

    let store = guard
        .as_mut()
        .ok_or_else(|| "check-in session unavailable".to_string())?;
    f(store).map_err(|err| err.to_string())
}

fn lock_session(
) -> Result<MutexGuard<'static, Option<CheckInStore<SqlitePreferenceStore>>>, String> {
    SESSION
        .lock()
        .map_err(|_| "check-in session lock poisoned".to_string())
}

fn open_store() -> Result<CheckInStore<SqlitePreferenceStore>, String> {
    let prefs = SqlitePreferenceStore::open(resolve_db_path())
        .map_err(|err| format!("check-in storage open failed: {err}"))?;
    Ok(CheckInStore::new(prefs))
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn action(
    event: &'static str,
    f: impl FnOnce(&mut CheckInStore<SqlitePreferenceStore>) -> Result<CheckInActionResponse, StoreError>,
) -> CheckInActionResponse {
    match with_session(f) {
        Ok(response) => response,
        Err(err) => {
            error!("event={event} module=ffi status=error error={err}");
            CheckInActionResponse::failure(format!("{event} failed: {err}"))
        }
    }
}

fn to_item_view(item: &CheckInItem) -> CheckInItemView {
    CheckInItemView {
        id: item.id.clone(),
        name: item.name.clone(),
        description: item.description.clone(),
        icon: item.icon.clone(),
        count: item.count,
        goal: item.goal,
        unit: item.unit.clone(),
        order: item.order,
        count_label: item.count_label(),
        goal_reached: item.goal_reached(),
    }
}

fn newest_first(mut records: Vec<CheckInRecord>) -> Vec<CheckInRecordView> {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records
        .into_iter()
        .map(|record| CheckInRecordView {
            epoch_ms: record.epoch_millis(),
            date: record.date_string(),
            time: record.local_time_label(),
            id: record.id,
            item_id: record.item_id,
        })
        .collect()
}

fn to_heatmap_view(map: MonthHeatmap) -> HeatmapView {
    HeatmapView {
        title: map.title(),
        weekday_labels: WEEKDAY_LABELS.iter().map(|label| label.to_string()).collect(),
        leading_blanks: map.leading_blanks,
        rows: map.rows,
        total: map.total(),
        cells: map
            .cells
            .iter()
            .map(|cell| HeatmapCellView {
                date: cell.date.format("%Y-%m-%d").to_string(),
                count: cell.count,
                level: cell.level,
                row: cell.row,
                column: cell.column,
                color: cell.color().to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        checkin_add_item, checkin_delete_item, checkin_delete_record, checkin_increment,
        checkin_initialize, checkin_items, checkin_month_heatmap, checkin_records, checkin_records_for_date,
        checkin_reorder_items, checkin_restore_item, checkin_update_item, checkin_weekly_counts,
        core_version, init_logging, ping, tools_list,
    };
    use chrono::{Datelike, Local};
    use std::sync::Mutex;
    use std::time::{SystemTime, UNIX_EPOCH};

    // Reloading drops session-only deletions; keep it apart from undo tests.
    static RELOAD_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn tools_list_has_check_in() {
        assert!(tools_list().iter().any(|tool| tool.id == "check_in"));
    }

    #[test]
    fn added_item_can_be_checked_in_and_undone() {
        let name = unique_token("ffi-add");
        let created = checkin_add_item(
            name.clone(),
            "pages".to_string(),
            "ic_book".to_string(),
            2,
            "pages".to_string(),
        );
        assert!(created.ok, "{}", created.message);
        let item_id = created.item.expect("created item").id;
        assert!(checkin_items().iter().any(|item| item.id == item_id));

        let first = checkin_increment(item_id.clone());
        assert!(first.ok, "{}", first.message);
        let second = checkin_increment(item_id.clone());
        let view = second.item.expect("incremented item");
        assert_eq!(view.count, 2);
        assert_eq!(view.count_label, "2/2 pages");
        assert!(view.goal_reached);

        let records = checkin_records(item_id.clone());
        assert_eq!(records.len(), 2);
        let today = records[0].date.clone();
        assert_eq!(checkin_records_for_date(item_id.clone(), today).len(), 2);

        let deleted = checkin_delete_record(item_id.clone(), records[0].id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(deleted.item.expect("item after delete").count, 1);
        assert!(!checkin_delete_record(item_id.clone(), records[0].id.clone()).ok);
    }

    #[test]
    fn initialize_reloads_session_from_storage() {
        let _guard = RELOAD_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        let first = checkin_initialize();
        assert!(first.ok, "{}", first.message);
        assert!(first.item_count >= 1);

        let again = checkin_initialize();
        assert!(again.ok, "{}", again.message);
        assert!(!again.seeded_defaults);
        assert_eq!(again.reconciled_items, 0);
    }

    #[test]
    fn unknown_ids_fail_softly() {
        assert!(!checkin_increment("missing-item".to_string()).ok);
        assert!(!checkin_delete_item("missing-item".to_string()).ok);
        assert!(checkin_records("missing-item".to_string()).is_empty());
        assert!(checkin_records_for_date("x".to_string(), "not-a-date".to_string()).is_empty());
    }

    #[test]
    fn update_delete_and_restore_round_trip() {
        let _guard = RELOAD_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        let created = checkin_add_item(
            unique_token("ffi-edit"),
            String::new(),
            "ic_star".to_string(),
            0,
            "times".to_string(),
        );
        let item_id = created.item.expect("created item").id;

        let renamed = unique_token("ffi-renamed");
        let updated = checkin_update_item(
            item_id.clone(),
            renamed.clone(),
            "desc".to_string(),
            "ic_star".to_string(),
            3,
            "laps".to_string(),
        );
        assert!(updated.ok, "{}", updated.message);
        assert_eq!(updated.item.expect("updated item").name, renamed);

        let deleted = checkin_delete_item(item_id.clone());
        let view = deleted.item.expect("deleted item");
        assert!(!checkin_items().iter().any(|item| item.id == item_id));

        assert!(checkin_restore_item(view.clone()).ok);
        assert!(!checkin_restore_item(view).ok);
        assert!(checkin_reorder_items(vec![item_id.clone()]).ok);
        assert_eq!(checkin_items()[0].id, item_id);
    }

    #[test]
    fn charts_cover_week_and_month() {
        let created = checkin_add_item(
            unique_token("ffi-chart"),
            String::new(),
            "ic_star".to_string(),
            0,
            String::new(),
        );
        let item_id = created.item.expect("created item").id;
        checkin_increment(item_id.clone());

        let week = checkin_weekly_counts(item_id.clone());
        assert_eq!(week.len(), 7);
        assert_eq!(week[6].count, 1);

        let now = Local::now();
        let heatmap = checkin_month_heatmap(item_id.clone(), now.year(), now.month())
            .expect("valid month");
        assert!(heatmap.total >= 1);
        assert_eq!(heatmap.weekday_labels.first().map(String::as_str), Some("Sun"));
        assert_eq!(heatmap.weekday_labels.len(), 7);
        assert!(checkin_month_heatmap(item_id, 2026, 13).is_none());
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after unix epoch")
            .as_nanos();
        format!("{prefix}-{}-{nanos}", std::process::id())
    }
}
