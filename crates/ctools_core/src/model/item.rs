//! Check-in item model.
//!
//! # Invariants
//! - `id` is opaque and never reused for another item.
//! - `goal == 0` means the item has no daily target.
//! - `count` is today's count only; it resets when the day changes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque item identifier. Persisted ids are arbitrary strings, new ones are UUIDs.
pub type ItemId = String;

/// One trackable habit, e.g. "drink water".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInItem {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    /// Icon key resolved by the UI shell (e.g. `ic_water`).
    pub icon: String,
    pub count: u32,
    pub goal: u32,
    pub unit: String,
    /// Display position; lower sorts first.
    pub order: i32,
}

/// User input for a new item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCheckInItem {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub goal: u32,
    pub unit: String,
}

impl CheckInItem {
    /// Builds an item with a fresh UUID and a zero count.
    pub fn create(input: NewCheckInItem, order: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            description: input.description,
            icon: input.icon,
            count: 0,
            goal: input.goal,
            unit: input.unit,
            order,
        }
    }

    pub fn has_goal(&self) -> bool {
        self.goal > 0
    }

    pub fn goal_reached(&self) -> bool {
        self.has_goal() && self.count >= self.goal
    }

    /// Count text for list rows: `3/8 cups` with a goal, `3 times` without.
    pub fn count_label(&self) -> String {
        let label = if self.has_goal() {
            format!("{}/{} {}", self.count, self.goal, self.unit)
        } else {
            format!("{} {}", self.count, self.unit)
        };
        label.trim_end().to_string()
    }
}

/// Items seeded on first run when nothing is persisted yet.
pub fn default_items() -> Vec<CheckInItem> {
    [
        ("drink water", "Stay hydrated", "ic_water", 8, "cups"),
        ("restroom", "Track restroom visits", "ic_restroom", 0, "times"),
        ("exercise", "Daily workout", "ic_exercise", 1, "hours"),
    ]
    .into_iter()
    .enumerate()
    .map(|(order, (name, description, icon, goal, unit))| {
        CheckInItem::create(
            NewCheckInItem {
                name: name.to_string(),
                description: description.to_string(),
                icon: icon.to_string(),
                goal,
                unit: unit.to_string(),
            },
            order as i32,
        )
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::{default_items, CheckInItem, NewCheckInItem};

    fn item(goal: u32, count: u32, unit: &str) -> CheckInItem {
        let mut item = CheckInItem::create(
            NewCheckInItem {
                name: "read".to_string(),
                description: String::new(),
                icon: "ic_book".to_string(),
                goal,
                unit: unit.to_string(),
            },
            0,
        );
        item.count = count;
        item
    }

    #[test]
    fn count_label_switches_on_goal() {
        assert_eq!(item(8, 3, "cups").count_label(), "3/8 cups");
        assert_eq!(item(0, 3, "times").count_label(), "3 times");
        assert_eq!(item(0, 2, "").count_label(), "2");
    }

    #[test]
    fn goal_reached_requires_a_goal() {
        assert!(item(1, 1, "hours").goal_reached());
        assert!(!item(0, 50, "times").goal_reached());
        assert!(!item(8, 7, "cups").goal_reached());
    }

    #[test]
    fn defaults_are_dense_and_unique() {
        let items = default_items();
        let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["drink water", "restroom", "exercise"]);
        assert_eq!(
            items.iter().map(|item| item.goal).collect::<Vec<_>>(),
            [8, 0, 1]
        );
        assert_eq!(
            items.iter().map(|item| item.order).collect::<Vec<_>>(),
            [0, 1, 2]
        );
        assert_ne!(items[0].id, items[1].id);
        assert!(items.iter().all(|item| item.count == 0));
    }
}
