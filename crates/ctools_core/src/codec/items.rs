//! Item list columns: one comma-joined preference value per field.

use super::escape::{escape_field, split_unescaped, unescape_field};
use crate::model::item::CheckInItem;
use crate::prefs::{keys, PrefEdit, PrefResult, PreferenceStore};

const DELIMITER: char = ',';
const RESERVED: &[char] = &[DELIMITER];

/// Raw persisted item columns, still joined and escaped.
///
/// Counts are not part of the columns; they live under `count_<id>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemColumns {
    pub ids: String,
    pub names: String,
    pub descriptions: String,
    pub icons: String,
    pub goals: String,
    pub units: String,
    pub orders: String,
}

impl ItemColumns {
    pub fn encode(items: &[CheckInItem]) -> Self {
        fn join<'a>(values: impl Iterator<Item = &'a str>) -> String {
            values
                .map(|value| escape_field(value, RESERVED))
                .collect::<Vec<_>>()
                .join(",")
        }
        fn join_numbers(values: impl Iterator<Item = String>) -> String {
            values.collect::<Vec<_>>().join(",")
        }

        Self {
            ids: join(items.iter().map(|item| item.id.as_str())),
            names: join(items.iter().map(|item| item.name.as_str())),
            descriptions: join(items.iter().map(|item| item.description.as_str())),
            icons: join(items.iter().map(|item| item.icon.as_str())),
            goals: join_numbers(items.iter().map(|item| item.goal.to_string())),
            units: join(items.iter().map(|item| item.unit.as_str())),
            orders: join_numbers(items.iter().map(|item| item.order.to_string())),
        }
    }

    /// Reads all seven columns; `None` when any of them is missing.
    pub fn load(prefs: &impl PreferenceStore) -> PrefResult<Option<Self>> {
        let mut columns = Vec::with_capacity(7);
        for key in [
            keys::ITEM_IDS,
            keys::ITEM_NAMES,
            keys::ITEM_DESCS,
            keys::ITEM_ICONS,
            keys::ITEM_GOALS,
            keys::ITEM_UNITS,
            keys::ITEM_ORDERS,
        ] {
            match prefs.get_string(key)? {
                Some(value) => columns.push(value),
                None => return Ok(None),
            }
        }

        let mut columns = columns.into_iter();
        let mut next = || columns.next().unwrap_or_default();
        Ok(Some(Self {
            ids: next(),
            names: next(),
            descriptions: next(),
            icons: next(),
            goals: next(),
            units: next(),
            orders: next(),
        }))
    }

    /// Adds the seven column writes to `edit`.
    pub fn write_into(self, edit: PrefEdit) -> PrefEdit {
        edit.put_string(keys::ITEM_IDS, self.ids)
            .put_string(keys::ITEM_NAMES, self.names)
            .put_string(keys::ITEM_DESCS, self.descriptions)
            .put_string(keys::ITEM_ICONS, self.icons)
            .put_string(keys::ITEM_GOALS, self.goals)
            .put_string(keys::ITEM_UNITS, self.units)
            .put_string(keys::ITEM_ORDERS, self.orders)
    }

    /// Rebuilds items with `count = 0`.
    ///
    /// Returns `None` when the columns disagree on length. Unparseable goals
    /// become 0; unparseable orders fall back to the column position.
    pub fn decode(&self) -> Option<Vec<CheckInItem>> {
        if self.ids.is_empty() {
            let all_empty = [
                &self.names,
                &self.descriptions,
                &self.icons,
                &self.goals,
                &self.units,
                &self.orders,
            ]
            .iter()
            .all(|column| column.is_empty());
            return all_empty.then(Vec::new);
        }

        let ids = split_unescaped(&self.ids, DELIMITER, RESERVED);
        let names = split_unescaped(&self.names, DELIMITER, RESERVED);
        let descriptions = split_unescaped(&self.descriptions, DELIMITER, RESERVED);
        let icons = split_unescaped(&self.icons, DELIMITER, RESERVED);
        let goals = split_unescaped(&self.goals, DELIMITER, RESERVED);
        let units = split_unescaped(&self.units, DELIMITER, RESERVED);
        let orders = split_unescaped(&self.orders, DELIMITER, RESERVED);

        let len = ids.len();
        if [
            names.len(),
            descriptions.len(),
            icons.len(),
            goals.len(),
            units.len(),
            orders.len(),
        ]
        .iter()
        .any(|other| *other != len)
        {
            return None;
        }

        let items = (0..len)
            .map(|index| CheckInItem {
                id: unescape_field(ids[index], RESERVED),
                name: unescape_field(names[index], RESERVED),
                description: unescape_field(descriptions[index], RESERVED),
                icon: unescape_field(icons[index], RESERVED),
                count: 0,
                goal: goals[index].trim().parse().unwrap_or(0),
                unit: unescape_field(units[index], RESERVED),
                order: orders[index]
                    .trim()
                    .parse()
                    .unwrap_or(i32::try_from(index).unwrap_or(i32::MAX)),
            })
            .collect();
        Some(items)
    }
}

#[cfg(test)]
mod tests {
    use super::ItemColumns;
    use crate::model::item::{default_items, CheckInItem};

    fn legacy_columns() -> ItemColumns {
        ItemColumns {
            ids: "a,b".to_string(),
            names: "water,run".to_string(),
            descriptions: "hydrate,".to_string(),
            icons: "ic_water,ic_run".to_string(),
            goals: "8,x".to_string(),
            units: "cups,km".to_string(),
            orders: "1,0".to_string(),
        }
    }

    #[test]
    fn decodes_legacy_unescaped_columns() {
        let items = legacy_columns().decode().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "water");
        assert_eq!(items[1].description, "");
        assert_eq!(items[1].goal, 0, "unparseable goal defaults to 0");
        assert_eq!(items[0].order, 1);
    }

    #[test]
    fn legacy_backslashes_decode_unchanged() {
        let mut columns = legacy_columns();
        columns.descriptions = "C:\\drinks\\log,a\\b".to_string();
        let items = columns.decode().unwrap();
        assert_eq!(items[0].description, "C:\\drinks\\log");
        assert_eq!(items[1].description, "a\\b");
    }

    #[test]
    fn length_mismatch_drops_the_whole_list() {
        let mut columns = legacy_columns();
        columns.units = "cups".to_string();
        assert_eq!(columns.decode(), None);
    }

    #[test]
    fn empty_columns_decode_to_empty_list() {
        let columns = ItemColumns::encode(&[]);
        assert_eq!(columns, ItemColumns::default());
        assert_eq!(columns.decode(), Some(Vec::new()));
    }

    #[test]
    fn round_trip_keeps_items_without_reserved_chars() {
        let items = default_items();
        assert_eq!(ItemColumns::encode(&items).decode(), Some(items));
    }

    #[test]
    fn values_with_commas_survive() {
        let mut items = default_items();
        items[0].description = "water, tea, or juice".to_string();
        items[1].unit = "visit(s), total".to_string();
        let decoded = ItemColumns::encode(&items).decode().unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn counts_are_not_encoded() {
        let mut items: Vec<CheckInItem> = default_items();
        items[0].count = 5;
        let decoded = ItemColumns::encode(&items).decode().unwrap();
        assert_eq!(decoded[0].count, 0);
    }
}
