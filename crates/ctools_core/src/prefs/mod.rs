//! Key-value preference storage.
//!
//! # Responsibility
//! - Define the flat string/int key space the check-in stores persist into.
//! - Provide in-memory and SQLite backends behind one trait.
//!
//! # Invariants
//! - A [`PrefEdit`] is applied all-or-nothing.
//! - Reading a key with the wrong value kind is an error, not a silent default.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod keys;
mod memory;
mod sqlite;

pub use memory::MemoryPreferenceStore;
pub use sqlite::SqlitePreferenceStore;

pub type PrefResult<T> = Result<T, PrefError>;

/// Errors raised by preference backends.
#[derive(Debug)]
pub enum PrefError {
    Db(DbError),
    /// Key exists but holds the other value kind.
    KindMismatch {
        key: String,
        expected: PrefKind,
    },
}

impl Display for PrefError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::KindMismatch { key, expected } => {
                write!(f, "preference `{key}` is not a {expected} value")
            }
        }
    }
}

impl Error for PrefError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::KindMismatch { .. } => None,
        }
    }
}

impl From<DbError> for PrefError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PrefError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefKind {
    Text,
    Int,
}

impl Display for PrefKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Int => f.write_str("int"),
        }
    }
}

/// One stored preference value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefValue {
    Text(String),
    Int(i64),
}

/// Batch of writes committed together by [`PreferenceStore::apply`].
///
/// Later puts to the same key win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefEdit {
    entries: Vec<(String, PrefValue)>,
}

impl PrefEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries
            .push((key.into(), PrefValue::Text(value.into())));
        self
    }

    pub fn put_int(mut self, key: impl Into<String>, value: i64) -> Self {
        self.entries.push((key.into(), PrefValue::Int(value)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[(String, PrefValue)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(String, PrefValue)> {
        self.entries
    }
}

/// Flat key-value storage the check-in stores persist into.
pub trait PreferenceStore {
    fn get_string(&self, key: &str) -> PrefResult<Option<String>>;
    fn get_int(&self, key: &str) -> PrefResult<Option<i64>>;
    fn apply(&self, edit: PrefEdit) -> PrefResult<()>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for &T {
    fn get_string(&self, key: &str) -> PrefResult<Option<String>> {
        (**self).get_string(key)
    }

    fn get_int(&self, key: &str) -> PrefResult<Option<i64>> {
        (**self).get_int(key)
    }

    fn apply(&self, edit: PrefEdit) -> PrefResult<()> {
        (**self).apply(edit)
    }
}
