//! In-memory preference backend.

use super::{PrefEdit, PrefError, PrefKind, PrefResult, PrefValue, PreferenceStore};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Preference backend kept entirely in process memory.
///
/// Single-threaded; share it across store instances by reference to simulate
/// an app restart over the same storage.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RefCell<BTreeMap<String, PrefValue>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorted list of stored keys.
    pub fn keys(&self) -> Vec<String> {
        self.values.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get_string(&self, key: &str) -> PrefResult<Option<String>> {
        match self.values.borrow().get(key) {
            None => Ok(None),
            Some(PrefValue::Text(value)) => Ok(Some(value.clone())),
            Some(PrefValue::Int(_)) => Err(PrefError::KindMismatch {
                key: key.to_string(),
                expected: PrefKind::Text,
            }),
        }
    }

    fn get_int(&self, key: &str) -> PrefResult<Option<i64>> {
        match self.values.borrow().get(key) {
            None => Ok(None),
            Some(PrefValue::Int(value)) => Ok(Some(*value)),
            Some(PrefValue::Text(_)) => Err(PrefError::KindMismatch {
                key: key.to_string(),
                expected: PrefKind::Int,
            }),
        }
    }

    fn apply(&self, edit: PrefEdit) -> PrefResult<()> {
        let mut values = self.values.borrow_mut();
        for (key, value) in edit.into_entries() {
            values.insert(key, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryPreferenceStore;
    use crate::prefs::{PrefEdit, PrefError, PreferenceStore};

    #[test]
    fn later_puts_in_one_edit_win() {
        let store = MemoryPreferenceStore::new();
        store
            .apply(PrefEdit::new().put_int("count_a", 1).put_int("count_a", 2))
            .unwrap();
        assert_eq!(store.get_int("count_a").unwrap(), Some(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn reading_wrong_kind_is_rejected() {
        let store = MemoryPreferenceStore::new();
        store
            .apply(PrefEdit::new().put_string("records", ""))
            .unwrap();
        let err = store.get_int("records").unwrap_err();
        assert!(matches!(err, PrefError::KindMismatch { ref key, .. } if key == "records"));
    }
}
