//! Check-in state holders and the use-case facade over them.
//!
//! # Responsibility
//! - Hold items and records in memory and publish immutable snapshots.
//! - Reconcile records with persisted counters on startup.
//! - Run each use case as mutate, persist, publish.
//!
//! # Invariants
//! - Each mutation publishes at most one snapshot per holder.
//! - After `initialize`, today's record count per item equals its counter.

pub mod checkin_store;
pub mod item_store;
pub mod reconcile;
pub mod record_store;

pub use checkin_store::{CheckInStore, InitReport, StoreError, StoreResult};
pub use item_store::{ItemStore, ItemsSnapshot};
pub use reconcile::{reconcile_today, ItemAdjustment};
pub use record_store::{DayCount, RecordStore, RecordsSnapshot};
