//! Descriptive time-pattern analytics over the event table.
//!
//! Computes the weekday, hour, and month distributions of server openings
//! together with their modal values and consistency ratios, plus the mean
//! and median inter-event gap. The summary feeds both the prediction
//! engine and the presentation layer, so it always returns a structurally
//! valid value — a small or malformed table degrades to zeroed defaults
//! rather than an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::domain::{EventTable, ServerRecord};

/// Default inter-event gap reported when the table holds fewer than two
/// records.
const DEFAULT_GAP_HOURS: f64 = 24.0;

/// Distribution of openings over weekdays, hours, and months.
///
/// Consistency ratios are `max_count / total` in [0, 1]; values above 0.5
/// are treated downstream as "pattern is reliable enough to enforce".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePatternSummary {
    /// Openings per weekday, Monday = 0.
    pub weekday_counts: BTreeMap<u32, usize>,
    pub most_common_weekday: u32,
    pub weekday_consistency: f64,
    /// Openings per hour of day.
    pub hour_counts: BTreeMap<u32, usize>,
    pub most_common_hour: u32,
    pub hour_consistency: f64,
    /// Openings per calendar month, January = 1.
    pub month_counts: BTreeMap<u32, usize>,
    pub most_common_month: u32,
    pub monthly_consistency: f64,
    pub mean_gap_hours: f64,
    pub median_gap_hours: f64,
}

impl Default for TimePatternSummary {
    fn default() -> Self {
        Self {
            weekday_counts: BTreeMap::new(),
            most_common_weekday: 0,
            weekday_consistency: 0.0,
            hour_counts: BTreeMap::new(),
            most_common_hour: 12,
            hour_consistency: 0.0,
            month_counts: BTreeMap::new(),
            most_common_month: 1,
            monthly_consistency: 0.0,
            mean_gap_hours: DEFAULT_GAP_HOURS,
            median_gap_hours: DEFAULT_GAP_HOURS,
        }
    }
}

/// English weekday name for a Monday = 0 index.
pub fn weekday_name(weekday: u32) -> &'static str {
    match weekday {
        0 => "Monday",
        1 => "Tuesday",
        2 => "Wednesday",
        3 => "Thursday",
        4 => "Friday",
        5 => "Saturday",
        6 => "Sunday",
        _ => "Unknown",
    }
}

/// Analyzes the opening-time patterns of a table.
///
/// An empty table yields [`TimePatternSummary::default`] so the dashboard
/// always has something to render.
pub fn analyze_time_patterns(table: &EventTable) -> TimePatternSummary {
    if table.is_empty() {
        log::warn!("time-pattern analysis on an empty table, returning defaults");
        return TimePatternSummary::default();
    }

    let records = table.sorted_by_open();
    summarize_records(&records)
}

/// Summary over an already sorted slice of records.
///
/// Used directly by prediction, which analyzes only its recency window.
pub(crate) fn summarize_records(records: &[ServerRecord]) -> TimePatternSummary {
    if records.is_empty() {
        return TimePatternSummary::default();
    }

    let total = records.len();

    let weekday_counts = count_by(records.iter().map(|r| r.day_of_week));
    let (most_common_weekday, weekday_max) = modal(&weekday_counts, 0);
    let hour_counts = count_by(records.iter().map(|r| r.hour));
    let (most_common_hour, hour_max) = modal(&hour_counts, 12);
    let month_counts = count_by(records.iter().map(|r| r.month));
    let (most_common_month, month_max) = modal(&month_counts, 1);

    let gaps = gap_hours(records);
    let (mean_gap_hours, median_gap_hours) = if gaps.is_empty() {
        (DEFAULT_GAP_HOURS, DEFAULT_GAP_HOURS)
    } else {
        (gaps.iter().sum::<f64>() / gaps.len() as f64, median(&gaps))
    };

    TimePatternSummary {
        weekday_counts,
        most_common_weekday,
        weekday_consistency: weekday_max as f64 / total as f64,
        hour_counts,
        most_common_hour,
        hour_consistency: hour_max as f64 / total as f64,
        month_counts,
        most_common_month,
        monthly_consistency: month_max as f64 / total as f64,
        mean_gap_hours,
        median_gap_hours,
    }
}

/// Gaps between consecutive openings, in fractional hours.
///
/// Assumes `records` are already sorted ascending by open time.
pub(crate) fn gap_hours(records: &[ServerRecord]) -> Vec<f64> {
    records
        .windows(2)
        .map(|pair| {
            let delta = pair[1].open_datetime - pair[0].open_datetime;
            delta.num_seconds() as f64 / 3600.0
        })
        .collect()
}

/// Median of a non-empty slice.
pub(crate) fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn count_by(values: impl Iterator<Item = u32>) -> BTreeMap<u32, usize> {
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

/// Modal key and its count; ties break toward the smaller key.
fn modal(counts: &BTreeMap<u32, usize>, default_key: u32) -> (u32, usize) {
    counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(&k, &v)| (k, v))
        .unwrap_or((default_key, 0))
}
