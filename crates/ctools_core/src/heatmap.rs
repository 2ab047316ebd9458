//! Calendar heatmap data for one item and month.
//!
//! Produces the grid the UI shell paints: Sunday-first columns, one cell per
//! day with its count and intensity level. Drawing is left to the shell.

use crate::store::record_store::days_of_month;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cell colors by intensity level, lightest (no check-ins) first.
pub const HEATMAP_PALETTE: [&str; 6] = [
    "#EEEEEE", "#D4E6F1", "#A9CCE3", "#7FB3D5", "#5499C7", "#2980B9",
];

/// Column headers, Sunday first.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const DAYS_PER_WEEK: u32 = 7;

/// Maps a day's count to a palette index: 0, 1-2, 3-4, 5-6, 7-8, 9+.
pub fn intensity_level(count: u32) -> u8 {
    match count {
        0 => 0,
        1..=2 => 1,
        3..=4 => 2,
        5..=6 => 3,
        7..=8 => 4,
        _ => 5,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub count: u32,
    pub level: u8,
    pub row: u32,
    /// 0 = Sunday.
    pub column: u32,
}

impl HeatmapCell {
    pub fn color(&self) -> &'static str {
        HEATMAP_PALETTE[usize::from(self.level).min(HEATMAP_PALETTE.len() - 1)]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthHeatmap {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st in the first row.
    pub leading_blanks: u32,
    pub rows: u32,
    pub cells: Vec<HeatmapCell>,
}

impl MonthHeatmap {
    /// Lays out `month` (1-12); `None` for an invalid month.
    ///
    /// Days missing from `counts` are treated as zero.
    pub fn build(year: i32, month: u32, counts: &BTreeMap<NaiveDate, u32>) -> Option<Self> {
        let days = days_of_month(year, month);
        let first = days.first()?;
        let leading_blanks = first.weekday().num_days_from_sunday();
        let day_count = u32::try_from(days.len()).unwrap_or(31);
        let rows = (leading_blanks + day_count - 1) / DAYS_PER_WEEK + 1;

        let cells = days
            .iter()
            .map(|date| {
                let slot = leading_blanks + date.day() - 1;
                let count = counts.get(date).copied().unwrap_or(0);
                HeatmapCell {
                    date: *date,
                    count,
                    level: intensity_level(count),
                    row: slot / DAYS_PER_WEEK,
                    column: slot % DAYS_PER_WEEK,
                }
            })
            .collect();

        Some(Self {
            year,
            month,
            leading_blanks,
            rows,
            cells,
        })
    }

    /// `yyyy-MM` title.
    pub fn title(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn total(&self) -> u32 {
        self.cells.iter().map(|cell| cell.count).sum()
    }

    /// Days with at least one check-in.
    pub fn active_days(&self) -> usize {
        self.cells.iter().filter(|cell| cell.count > 0).count()
    }
}

/// Moves `(year, month)` by `delta` months, for previous/next navigation.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::{intensity_level, shift_month, MonthHeatmap};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    #[test]
    fn intensity_buckets_match_palette() {
        let levels: Vec<u8> = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 40]
            .into_iter()
            .map(intensity_level)
            .collect();
        assert_eq!(levels, [0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5]);
    }

    #[test]
    fn grid_starts_on_the_right_weekday() {
        // 2026-02-01 is a Sunday; 28 days fill exactly four rows.
        let feb = MonthHeatmap::build(2026, 2, &BTreeMap::new()).unwrap();
        assert_eq!(feb.leading_blanks, 0);
        assert_eq!(feb.rows, 4);

        // 2026-08-01 is a Saturday; 31 days spill into a sixth row.
        let aug = MonthHeatmap::build(2026, 8, &BTreeMap::new()).unwrap();
        assert_eq!(aug.leading_blanks, 6);
        assert_eq!(aug.rows, 6);
        assert_eq!((aug.cells[0].row, aug.cells[0].column), (0, 6));
        assert_eq!((aug.cells[1].row, aug.cells[1].column), (1, 0));
    }

    #[test]
    fn cells_carry_counts_and_colors() {
        let mut counts = BTreeMap::new();
        counts.insert(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(), 7);
        let map = MonthHeatmap::build(2026, 10, &counts).unwrap();

        let cell = &map.cells[15];
        assert_eq!(cell.count, 7);
        assert_eq!(cell.level, 4);
        assert_eq!(cell.color(), "#5499C7");
        assert_eq!(map.total(), 7);
        assert_eq!(map.active_days(), 1);
        assert_eq!(map.title(), "2026-10");
    }

    #[test]
    fn invalid_month_has_no_grid() {
        assert!(MonthHeatmap::build(2026, 0, &BTreeMap::new()).is_none());
    }

    #[test]
    fn shift_month_wraps_years() {
        assert_eq!(shift_month(2026, 1, -1), (2025, 12));
        assert_eq!(shift_month(2026, 12, 1), (2027, 1));
        assert_eq!(shift_month(2026, 5, 0), (2026, 5));
    }
}
