//! Dashboard summary statistics over the event table.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::algorithms::analysis::weekday_name;
use crate::core::domain::EventTable;
use crate::core::error::{AnalysisError, AnalysisResult};

/// Headline statistics rendered on the dashboard overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSummary {
    pub total_servers: usize,
    pub first_open: NaiveDateTime,
    pub last_open: NaiveDateTime,
    /// Whole days between the first and last opening.
    pub days_spanned: i64,
    pub avg_days_per_server: f64,
    pub map_type_count: usize,
    pub most_common_map: String,
    pub most_common_weekday: String,
    pub max_monthly_servers: usize,
    pub avg_monthly_servers: f64,
}

/// Compute dashboard summary statistics.
///
/// # Errors
///
/// [`AnalysisError::InsufficientData`] for an empty table; the overview
/// panel hides itself in that case instead of rendering zeros.
pub fn summarize_table(table: &EventTable) -> AnalysisResult<TableSummary> {
    let records = table.sorted_by_open();
    let (first, last) = match (records.first(), records.last()) {
        (Some(first), Some(last)) => (first.clone(), last.clone()),
        _ => {
            return Err(AnalysisError::InsufficientData(
                "cannot summarize an empty table".to_string(),
            ))
        }
    };

    let days_spanned = (last.open_datetime - first.open_datetime).num_days();
    let avg_days_per_server = if records.len() > 1 {
        days_spanned as f64 / records.len() as f64
    } else {
        0.0
    };

    let mut map_counts: HashMap<&str, usize> = HashMap::new();
    let mut weekday_counts: HashMap<u32, usize> = HashMap::new();
    let mut monthly_counts: HashMap<(i32, u32), usize> = HashMap::new();
    for record in &records {
        *map_counts.entry(record.map_type.as_str()).or_insert(0) += 1;
        *weekday_counts.entry(record.day_of_week).or_insert(0) += 1;
        *monthly_counts.entry((record.year, record.month)).or_insert(0) += 1;
    }

    let most_common_map = map_counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(&name, _)| name.to_string())
        .unwrap_or_default();
    let most_common_weekday = weekday_counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(&day, _)| weekday_name(day).to_string())
        .unwrap_or_default();

    let max_monthly_servers = monthly_counts.values().copied().max().unwrap_or(0);
    let avg_monthly_servers = if monthly_counts.is_empty() {
        0.0
    } else {
        monthly_counts.values().sum::<usize>() as f64 / monthly_counts.len() as f64
    };

    Ok(TableSummary {
        total_servers: records.len(),
        first_open: first.open_datetime,
        last_open: last.open_datetime,
        days_spanned,
        avg_days_per_server,
        map_type_count: map_counts.len(),
        most_common_map,
        most_common_weekday,
        max_monthly_servers,
        avg_monthly_servers,
    })
}
