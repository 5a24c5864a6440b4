//! Record filtering for dashboard views.
//!
//! Every filter takes and returns plain record slices; trailing-window
//! presets compare against an explicit reference instant rather than
//! reading the wall clock.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::core::domain::ServerRecord;

/// Trailing-window presets offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePreset {
    All,
    Last30Days,
    Last90Days,
    LastYear,
}

impl TimePreset {
    fn window(&self) -> Option<Duration> {
        match self {
            TimePreset::All => None,
            TimePreset::Last30Days => Some(Duration::days(30)),
            TimePreset::Last90Days => Some(Duration::days(90)),
            TimePreset::LastYear => Some(Duration::days(365)),
        }
    }
}

/// Keep records with the given map type.
pub fn filter_by_map_type(records: &[ServerRecord], map_type: &str) -> Vec<ServerRecord> {
    records
        .iter()
        .filter(|r| r.map_type == map_type)
        .cloned()
        .collect()
}

/// Keep records opened in the given year.
pub fn filter_by_year(records: &[ServerRecord], year: i32) -> Vec<ServerRecord> {
    records.iter().filter(|r| r.year == year).cloned().collect()
}

/// Keep records opened inside the inclusive date range.
pub fn filter_by_date_range(
    records: &[ServerRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<ServerRecord> {
    records
        .iter()
        .filter(|r| {
            let date = r.open_date();
            date >= start && date <= end
        })
        .cloned()
        .collect()
}

/// Keep records inside a trailing window ending at `reference`.
pub fn filter_by_preset(
    records: &[ServerRecord],
    preset: TimePreset,
    reference: NaiveDateTime,
) -> Vec<ServerRecord> {
    match preset.window() {
        None => records.to_vec(),
        Some(window) => {
            let cutoff = reference - window;
            records
                .iter()
                .filter(|r| r.open_datetime >= cutoff)
                .cloned()
                .collect()
        }
    }
}
