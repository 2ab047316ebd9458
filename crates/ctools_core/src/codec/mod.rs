//! Flat-string codec between the stores and preference values.
//!
//! # Responsibility
//! - Encode the item list as parallel comma-joined columns.
//! - Encode records as `id|itemId|epochMillis|yyyy-MM-dd` lines.
//!
//! # Invariants
//! - Reserved characters inside values are backslash-escaped; values without
//!   reserved characters encode exactly as the unescaped legacy format.
//! - Decoding never fails: unreadable data degrades to "absent" or is dropped.

mod escape;
pub mod items;
pub mod records;

pub use items::ItemColumns;
pub use records::{decode_records, encode_records, DecodedRecords};
