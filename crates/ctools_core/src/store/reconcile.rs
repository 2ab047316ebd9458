//! Startup reconciliation of today's records against persisted counters.
//!
//! Counters and the record list are written by separate use cases, so after a
//! crash or a legacy install they can disagree. The counter wins: today's
//! records for a mismatching item are discarded and `count` records are
//! synthesized at `now - k * 100ms` (k = 1..=count), all dated today.

use crate::model::item::CheckInItem;
use crate::model::record::{CheckInRecord, RecordsByItem};
use chrono::{DateTime, Duration, Local};

const SYNTHESIZED_SPACING_MS: i64 = 100;

/// What reconciliation changed for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAdjustment {
    pub item_id: String,
    pub removed: usize,
    pub synthesized: usize,
}

/// Rewrites today's records in `records` so every item's count matches.
///
/// Returns one adjustment per item that needed changes; an empty result
/// means `records` was left untouched.
pub fn reconcile_today(
    items: &[CheckInItem],
    records: &mut RecordsByItem,
    now: DateTime<Local>,
) -> Vec<ItemAdjustment> {
    let today = now.date_naive();
    let mut adjustments = Vec::new();

    for item in items {
        let todays = records.get(&item.id).map_or(0, |group| {
            group.iter().filter(|record| record.date == today).count()
        });
        if todays == item.count as usize {
            continue;
        }

        let group = records.entry(item.id.clone()).or_default();
        group.retain(|record| record.date != today);
        group.extend((1..=i64::from(item.count)).map(|k| {
            let at = now - Duration::milliseconds(k * SYNTHESIZED_SPACING_MS);
            CheckInRecord::with_date(item.id.as_str(), at, today)
        }));

        adjustments.push(ItemAdjustment {
            item_id: item.id.clone(),
            removed: todays,
            synthesized: item.count as usize,
        });
    }

    adjustments
}
