//! Core logic for the ctools app and its check-in tracker.
//! The UI shell renders snapshots from here and calls back into the store.

pub mod clock;
pub mod codec;
pub mod db;
pub mod heatmap;
pub mod logging;
pub mod model;
pub mod prefs;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use heatmap::{
    intensity_level, shift_month, HeatmapCell, MonthHeatmap, HEATMAP_PALETTE, WEEKDAY_LABELS,
};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::item::{default_items, CheckInItem, ItemId, NewCheckInItem};
pub use model::record::{CheckInRecord, RecordId, RecordsByItem};
pub use model::tool::{builtin_tools, find_tool, ToolItem, CHECK_IN_TOOL_ID};
pub use prefs::{
    MemoryPreferenceStore, PrefEdit, PrefError, PrefResult, PreferenceStore,
    SqlitePreferenceStore,
};
pub use store::{
    CheckInStore, DayCount, InitReport, ItemAdjustment, ItemsSnapshot, RecordsSnapshot,
    StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
