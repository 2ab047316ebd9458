//! Record list codec: one `id|itemId|epochMillis|yyyy-MM-dd` line per record.

use super::escape::{escape_field, split_unescaped, unescape_field};
use crate::model::record::{CheckInRecord, RecordsByItem};
use crate::prefs::keys::DATE_FORMAT;
use chrono::{DateTime, NaiveDate};

const LINE_DELIMITER: char = '\n';
const FIELD_DELIMITER: char = '|';
const RESERVED: &[char] = &[LINE_DELIMITER, FIELD_DELIMITER];

/// Result of decoding the `records` preference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedRecords {
    pub by_item: RecordsByItem,
    /// Non-blank lines that could not be parsed.
    pub dropped_lines: usize,
}

/// Encodes every group; item order follows the map, records keep their order.
pub fn encode_records(records: &RecordsByItem) -> String {
    records
        .values()
        .flatten()
        .map(encode_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decodes and groups records by item id. Malformed lines are dropped.
pub fn decode_records(data: &str) -> DecodedRecords {
    let mut decoded = DecodedRecords::default();
    if data.is_empty() {
        return decoded;
    }

    for line in split_unescaped(data, LINE_DELIMITER, RESERVED) {
        if line.trim().is_empty() {
            continue;
        }
        match decode_line(line) {
            Some(record) => decoded
                .by_item
                .entry(record.item_id.clone())
                .or_default()
                .push(record),
            None => decoded.dropped_lines += 1,
        }
    }
    decoded
}

fn encode_line(record: &CheckInRecord) -> String {
    format!(
        "{}|{}|{}|{}",
        escape_field(&record.id, RESERVED),
        escape_field(&record.item_id, RESERVED),
        record.epoch_millis(),
        record.date_string()
    )
}

fn decode_line(line: &str) -> Option<CheckInRecord> {
    let fields = split_unescaped(line, FIELD_DELIMITER, RESERVED);
    let [id, item_id, millis, date] = fields.as_slice() else {
        return None;
    };

    let timestamp = DateTime::from_timestamp_millis(millis.trim().parse().ok()?)?;
    let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()?;
    Some(CheckInRecord {
        id: unescape_field(id, RESERVED),
        item_id: unescape_field(item_id, RESERVED),
        timestamp,
        date,
    })
}
