use chrono::{NaiveDate, TimeZone, Utc};
use ctools_core::{default_items, CheckInItem, CheckInRecord, MonthHeatmap};
use std::collections::BTreeMap;

#[test]
fn item_serialization_uses_expected_fields() {
    let item = CheckInItem {
        id: "water".to_string(),
        name: "drink water".to_string(),
        description: "stay hydrated".to_string(),
        icon: "ic_water".to_string(),
        count: 3,
        goal: 8,
        unit: "cups".to_string(),
        order: 0,
    };

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["id"], "water");
    assert_eq!(json["count"], 3);
    assert_eq!(json["goal"], 8);
    assert_eq!(json["unit"], "cups");
    assert_eq!(json["order"], 0);

    let decoded: CheckInItem = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, item);
}

#[test]
fn record_serializes_utc_instant_and_local_day() {
    let record = CheckInRecord {
        id: "r-1".to_string(),
        item_id: "water".to_string(),
        timestamp: Utc.with_ymd_and_hms(2026, 5, 1, 23, 30, 0).unwrap(),
        date: NaiveDate::from_ymd_opt(2026, 5, 2).unwrap(),
    };

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["item_id"], "water");
    assert_eq!(json["timestamp"], "2026-05-01T23:30:00Z");
    assert_eq!(json["date"], "2026-05-02");

    let decoded: CheckInRecord = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn record_rejects_malformed_date() {
    let value = serde_json::json!({
        "id": "r-1",
        "item_id": "water",
        "timestamp": "2026-05-01T23:30:00Z",
        "date": "2026-13-40"
    });

    assert!(serde_json::from_value::<CheckInRecord>(value).is_err());
}

#[test]
fn heatmap_serializes_grid_positions() {
    let mut counts = BTreeMap::new();
    counts.insert(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(), 3);
    let map = MonthHeatmap::build(2026, 8, &counts).unwrap();

    let json = serde_json::to_value(&map).unwrap();
    assert_eq!(json["leading_blanks"], 6);
    assert_eq!(json["cells"][0]["date"], "2026-08-01");
    assert_eq!(json["cells"][0]["column"], 6);
    assert_eq!(json["cells"][0]["level"], 2);

    let decoded: MonthHeatmap = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, map);
}

#[test]
fn default_items_serialize_as_a_list() {
    let json = serde_json::to_value(default_items()).unwrap();
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["drink water", "restroom", "exercise"]);
}
