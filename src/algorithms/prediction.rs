//! Next-server synthesis from historical periodicity.
//!
//! Combines recency-window timing statistics (median gap, modal hour,
//! modal weekday) with the synthesis-oriented map-cycle detector and the
//! district-increment heuristic to produce concrete predicted records.
//! The reference instant and zone arrive explicitly through a
//! [`ReferenceClock`], never from ambient global state.
//!
//! This is a UI-facing boundary: an empty or malformed table produces an
//! empty result set, never a panic or an error.

use chrono::{Datelike, Duration};

use crate::algorithms::analysis::{gap_hours, median, summarize_records};
use crate::algorithms::patterns::recent_cycle;
use crate::config::PredictionSettings;
use crate::core::domain::{EventTable, PredictedServer};
use crate::time::zone::{lead_time_estimate, ReferenceClock};

/// Map-type history length fed to the cycle detector.
const MAP_HISTORY_WINDOW: usize = 20;

/// Consistency level above which a timing pattern is enforced.
const CONSISTENCY_THRESHOLD: f64 = 0.5;

/// Synthesizes the next `num_servers` server records.
///
/// Ids are strictly `last_known_id + i`; the district id increments every
/// `district_span` predictions; map types continue the detected recent
/// cycle; projected times follow the median inter-event gap, snapped to
/// the modal hour and weekday when those patterns are consistent enough.
///
/// Returns an empty vector when the table cannot support prediction.
pub fn predict_next_servers(
    table: &EventTable,
    num_servers: usize,
    clock: &ReferenceClock,
    settings: &PredictionSettings,
) -> Vec<PredictedServer> {
    let last = match table.latest_by_server_id() {
        Some(record) => record.clone(),
        None => {
            log::warn!("prediction requested on an empty table");
            return Vec::new();
        }
    };

    let window = table.recency_window(settings.recency_window);
    let gaps = gap_hours(&window);
    if gaps.is_empty() {
        log::warn!("prediction needs at least two records to estimate a gap");
        return Vec::new();
    }
    // Median, not mean: one long downtime gap must not drag every
    // projection with it.
    let median_gap_hours = median(&gaps);

    let timing = summarize_records(&window);

    let map_history = table.recent_map_types(MAP_HISTORY_WINDOW);
    let cycle = recent_cycle(&map_history, &settings.default_map_cycle);
    if cycle.is_empty() {
        log::warn!("no map cycle available, cannot synthesize predictions");
        return Vec::new();
    }

    let mut predictions = Vec::with_capacity(num_servers);

    for i in 1..=num_servers as i64 {
        let next_server_id = last.server_id + i;

        let offset_seconds = (median_gap_hours * i as f64 * 3600.0).round() as i64;
        let mut projected = last.open_datetime + Duration::seconds(offset_seconds);

        if timing.hour_consistency > CONSISTENCY_THRESHOLD {
            projected = match projected
                .date()
                .and_hms_opt(timing.most_common_hour, 0, 0)
            {
                Some(snapped) => snapped,
                None => projected,
            };

            if timing.weekday_consistency > CONSISTENCY_THRESHOLD {
                let projected_weekday = projected.weekday().num_days_from_monday();
                // Advance forward, never backward, to the modal weekday.
                let days_ahead =
                    (timing.most_common_weekday + 7 - projected_weekday) % 7;
                if days_ahead > 0 {
                    projected += Duration::days(days_ahead as i64);
                }
            }
        }

        let district_id = last.district_id + (i - 1) / settings.district_span.max(1);

        let map_index = ((next_server_id - 1).rem_euclid(cycle.len() as i64)) as usize;
        let map_type = cycle[map_index].clone();

        let estimate = match lead_time_estimate(projected, clock) {
            Ok(estimate) => estimate,
            Err(e) => {
                log::warn!("lead-time estimate failed: {}", e);
                return Vec::new();
            }
        };

        predictions.push(PredictedServer {
            server_id: next_server_id,
            open_datetime: projected,
            district_id,
            map_type,
            estimate,
        });
    }

    predictions
}
