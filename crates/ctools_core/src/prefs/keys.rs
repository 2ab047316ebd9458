//! Preference key names shared by the codec and the check-in store.

pub const RECORDS: &str = "records";

pub const ITEM_IDS: &str = "item_ids";
pub const ITEM_NAMES: &str = "item_names";
pub const ITEM_DESCS: &str = "item_descs";
pub const ITEM_ICONS: &str = "item_icons";
pub const ITEM_GOALS: &str = "item_goals";
pub const ITEM_UNITS: &str = "item_units";
pub const ITEM_ORDERS: &str = "item_orders";

const COUNT_PREFIX: &str = "count_";
const LAST_UPDATE_PREFIX: &str = "last_update_";

/// `yyyy-MM-dd`, used for `last_update_<id>` values and record dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn count_key(item_id: &str) -> String {
    format!("{COUNT_PREFIX}{item_id}")
}

pub fn last_update_key(item_id: &str) -> String {
    format!("{LAST_UPDATE_PREFIX}{item_id}")
}

#[cfg(test)]
mod tests {
    use super::{count_key, last_update_key};

    #[test]
    fn per_item_keys_use_legacy_prefixes() {
        assert_eq!(count_key("abc"), "count_abc");
        assert_eq!(last_update_key("abc"), "last_update_abc");
    }
}
