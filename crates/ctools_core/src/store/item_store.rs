//! Observable, ordered list of check-in items.
//!
//! Holds no persistence; the facade decides what to write after a mutation.

use crate::model::item::CheckInItem;
use std::sync::Arc;
use tokio::sync::watch;

/// Immutable published view of the item list, in display order.
pub type ItemsSnapshot = Arc<Vec<CheckInItem>>;

pub struct ItemStore {
    state: watch::Sender<ItemsSnapshot>,
}

impl ItemStore {
    pub fn new(items: Vec<CheckInItem>) -> Self {
        let (state, _) = watch::channel(Arc::new(items));
        Self { state }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> ItemsSnapshot {
        Arc::clone(&self.state.borrow())
    }

    /// Receiver that observes every published snapshot from now on.
    pub fn subscribe(&self) -> watch::Receiver<ItemsSnapshot> {
        self.state.subscribe()
    }

    pub fn get(&self, id: &str) -> Option<CheckInItem> {
        self.state.borrow().iter().find(|item| item.id == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.borrow().iter().any(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    /// Publishes `items` as the new state.
    pub fn replace(&mut self, items: Vec<CheckInItem>) {
        self.state.send_replace(Arc::new(items));
    }

    /// Adds one to the item's count; returns the new count.
    pub fn increment(&mut self, id: &str) -> Option<u32> {
        self.update_count(id, |count| count.saturating_add(1))
    }

    /// Subtracts one from the item's count, never going below zero.
    pub fn decrement(&mut self, id: &str) -> Option<u32> {
        self.update_count(id, |count| count.saturating_sub(1))
    }

    pub fn push(&mut self, item: CheckInItem) {
        self.mutate(|items| {
            items.push(item);
            Some(())
        });
    }

    /// Replaces the item with the same id in place.
    pub fn update(&mut self, item: CheckInItem) -> bool {
        self.mutate(|items| {
            let slot = items.iter_mut().find(|existing| existing.id == item.id)?;
            *slot = item;
            Some(())
        })
        .is_some()
    }

    pub fn remove(&mut self, id: &str) -> Option<CheckInItem> {
        self.mutate(|items| {
            let index = items.iter().position(|item| item.id == id)?;
            Some(items.remove(index))
        })
    }

    /// Reorders by `sequence` and reassigns dense orders `0..N-1`.
    ///
    /// Unknown or repeated ids are ignored; items the sequence leaves out keep
    /// their relative order after the listed ones.
    pub fn reorder<S: AsRef<str>>(&mut self, sequence: &[S]) -> ItemsSnapshot {
        let current = self.snapshot();
        let mut remaining: Vec<Option<CheckInItem>> = current.iter().cloned().map(Some).collect();
        let mut reordered = Vec::with_capacity(remaining.len());

        for id in sequence {
            let id = id.as_ref();
            if let Some(slot) = remaining
                .iter_mut()
                .find(|slot| slot.as_ref().is_some_and(|item| item.id == id))
            {
                reordered.extend(slot.take());
            }
        }
        reordered.extend(remaining.into_iter().flatten());

        for (index, item) in reordered.iter_mut().enumerate() {
            item.order = i32::try_from(index).unwrap_or(i32::MAX);
        }
        self.replace(reordered);
        self.snapshot()
    }

    pub fn reset_counts(&mut self) {
        self.mutate(|items| {
            for item in items.iter_mut() {
                item.count = 0;
            }
            Some(())
        });
    }

    fn update_count(&mut self, id: &str, next: impl FnOnce(u32) -> u32) -> Option<u32> {
        self.mutate(|items| {
            let item = items.iter_mut().find(|item| item.id == id)?;
            item.count = next(item.count);
            Some(item.count)
        })
    }

    /// Runs `change` on a copy of the list and publishes it only on `Some`.
    fn mutate<R>(&mut self, change: impl FnOnce(&mut Vec<CheckInItem>) -> Option<R>) -> Option<R> {
        let mut next = self.snapshot().as_ref().clone();
        let result = change(&mut next)?;
        self.state.send_replace(Arc::new(next));
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::ItemStore;
    use crate::model::item::{default_items, CheckInItem};

    fn store() -> (ItemStore, Vec<CheckInItem>) {
        let items = default_items();
        (ItemStore::new(items.clone()), items)
    }

    #[test]
    fn decrement_floors_at_zero() {
        let (mut store, items) = store();
        assert_eq!(store.decrement(&items[0].id), Some(0));
        assert_eq!(store.increment(&items[0].id), Some(1));
        assert_eq!(store.decrement(&items[0].id), Some(0));
        assert_eq!(store.decrement("missing"), None);
    }

    #[test]
    fn failed_mutation_publishes_nothing() {
        let (mut store, _) = store();
        let rx = store.subscribe();

        assert_eq!(store.increment("missing"), None);
        assert!(!store.update(CheckInItem {
            id: "missing".to_string(),
            ..default_items().remove(0)
        }));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn subscribers_see_whole_snapshots() {
        let (mut store, items) = store();
        let mut rx = store.subscribe();

        store.increment(&items[1].id);
        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[1].count, 1);
    }

    #[test]
    fn reorder_assigns_dense_orders_and_keeps_unlisted_items() {
        let (mut store, items) = store();
        let (a, b, c) = (&items[0].id, &items[1].id, &items[2].id);

        let snapshot = store.reorder(&[c.as_str(), a.as_str()]);
        let ids: Vec<&str> = snapshot.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, [c.as_str(), a.as_str(), b.as_str()]);
        assert_eq!(
            snapshot.iter().map(|item| item.order).collect::<Vec<_>>(),
            [0, 1, 2]
        );

        let snapshot = store.reorder(&[b.clone(), b.clone(), "ghost".to_string()]);
        assert_eq!(snapshot[0].id, *b);
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn remove_returns_the_item() {
        let (mut store, items) = store();
        let removed = store.remove(&items[2].id).unwrap();
        assert_eq!(removed.name, "exercise");
        assert_eq!(store.len(), 2);
        assert!(!store.contains(&items[2].id));
    }
}
