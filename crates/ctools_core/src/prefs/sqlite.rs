//! SQLite preference backend.
//!
//! # Invariants
//! - Exactly one of `text_value` / `int_value` is set per row.
//! - One [`PrefEdit`] maps to one transaction.

use super::{PrefEdit, PrefError, PrefKind, PrefResult, PrefValue, PreferenceStore};
use crate::db::{open_db, open_db_in_memory};
use log::error;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Preference backend over the `preferences` table.
pub struct SqlitePreferenceStore {
    conn: Connection,
}

impl SqlitePreferenceStore {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens the preference database file, applying migrations.
    pub fn open(path: impl AsRef<Path>) -> PrefResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> PrefResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    fn read(&self, key: &str) -> PrefResult<Option<PrefValue>> {
        let row = self
            .conn
            .query_row(
                "SELECT text_value, int_value FROM preferences WHERE key = ?1;",
                [key],
                |row| {
                    Ok((
                        row.get::<_, Option<String>>(0)?,
                        row.get::<_, Option<i64>>(1)?,
                    ))
                },
            )
            .optional()?;

        Ok(row.and_then(|(text, int)| match (text, int) {
            (Some(text), _) => Some(PrefValue::Text(text)),
            (None, Some(int)) => Some(PrefValue::Int(int)),
            (None, None) => None,
        }))
    }
}

impl PreferenceStore for SqlitePreferenceStore {
    fn get_string(&self, key: &str) -> PrefResult<Option<String>> {
        match self.read(key)? {
            None => Ok(None),
            Some(PrefValue::Text(value)) => Ok(Some(value)),
            Some(PrefValue::Int(_)) => Err(PrefError::KindMismatch {
                key: key.to_string(),
                expected: PrefKind::Text,
            }),
        }
    }

    fn get_int(&self, key: &str) -> PrefResult<Option<i64>> {
        match self.read(key)? {
            None => Ok(None),
            Some(PrefValue::Int(value)) => Ok(Some(value)),
            Some(PrefValue::Text(_)) => Err(PrefError::KindMismatch {
                key: key.to_string(),
                expected: PrefKind::Int,
            }),
        }
    }

    fn apply(&self, edit: PrefEdit) -> PrefResult<()> {
        if edit.is_empty() {
            return Ok(());
        }

        let entry_count = edit.len();
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO preferences (key, text_value, int_value, updated_at)
                 VALUES (?1, ?2, ?3, (strftime('%s', 'now') * 1000))
                 ON CONFLICT(key) DO UPDATE SET
                    text_value = excluded.text_value,
                    int_value = excluded.int_value,
                    updated_at = excluded.updated_at;",
            )?;
            for (key, value) in edit.entries() {
                let (text, int) = match value {
                    PrefValue::Text(text) => (Some(text.as_str()), None),
                    PrefValue::Int(int) => (None, Some(*int)),
                };
                stmt.execute(params![key, text, int])?;
            }
        }

        tx.commit().map_err(|err| {
            error!(
                "event=prefs_apply module=prefs status=error entries={} error={}",
                entry_count, err
            );
            PrefError::from(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::SqlitePreferenceStore;
    use crate::prefs::{PrefEdit, PrefError, PreferenceStore};

    #[test]
    fn overwrite_switches_value_kind() {
        let store = SqlitePreferenceStore::open_in_memory().unwrap();
        store
            .apply(PrefEdit::new().put_string("count_x", "legacy"))
            .unwrap();
        store.apply(PrefEdit::new().put_int("count_x", 4)).unwrap();

        assert_eq!(store.get_int("count_x").unwrap(), Some(4));
        assert!(matches!(
            store.get_string("count_x"),
            Err(PrefError::KindMismatch { .. })
        ));
    }

    #[test]
    fn missing_key_reads_as_none() {
        let store = SqlitePreferenceStore::open_in_memory().unwrap();
        assert_eq!(store.get_string("item_ids").unwrap(), None);
        assert_eq!(store.get_int("count_missing").unwrap(), None);
    }
}
