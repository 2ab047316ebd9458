//! Domain model for the tools launcher and the check-in tracker.
//!
//! # Responsibility
//! - Define the item/record shapes the stores own and publish.
//! - Keep display helpers that only depend on model fields next to the model.
//!
//! # Invariants
//! - Items and records reference each other only by item id.
//! - Records are immutable once created.

pub mod item;
pub mod record;
pub mod tool;
