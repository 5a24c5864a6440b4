//! Property-style tests for the engine invariants.

use chrono::{Duration, NaiveDate, TimeZone};
use proptest::prelude::*;
use servercast::config::PredictionSettings;
use servercast::core::domain::{Cadence, CountPoint, CountSeries, EventTable, ServerRecord};
use servercast::time::calendar::complete_calendar;
use servercast::time::zone::{ReferenceClock, ReferenceZone};
use servercast::{detect_pattern_length, forecast_arima, predict_next_servers};
use servercast::algorithms::ArimaOrder;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn series_from_offsets(offsets: Vec<(i64, u32)>) -> CountSeries {
    let points = offsets
        .into_iter()
        .map(|(offset, count)| CountPoint {
            date: base_date() + Duration::days(offset),
            count: count as f64,
        })
        .collect();
    CountSeries::new(Cadence::Daily, points)
}

proptest! {
    #[test]
    fn prop_calendar_completion_is_idempotent(
        offsets in prop::collection::vec((0i64..200, 0u32..10), 1..40)
    ) {
        let series = series_from_offsets(offsets);
        let once = complete_calendar(&series);
        let twice = complete_calendar(&once);
        prop_assert_eq!(&once, &twice);

        // The completed calendar is evenly spaced.
        for pair in once.points.windows(2) {
            prop_assert_eq!(pair[1].date, pair[0].date.succ_opt().unwrap());
        }
    }

    #[test]
    fn prop_forecasts_are_non_negative_with_exact_horizon(
        values in prop::collection::vec(0u32..12, 30..60),
        horizon in 1usize..25
    ) {
        let points: Vec<CountPoint> = values
            .iter()
            .enumerate()
            .map(|(i, &count)| CountPoint {
                date: base_date() + Duration::days(i as i64),
                count: count as f64,
            })
            .collect();
        let series = CountSeries::new(Cadence::Daily, points);

        // Degenerate draws (e.g. a constant series) legitimately fail to
        // fit; the property concerns successful forecasts.
        if let Ok(result) = forecast_arima(&series, horizon, Some(ArimaOrder::new(1, 1, 0))) {
            prop_assert_eq!(result.values.len(), horizon);
            prop_assert_eq!(result.dates.len(), horizon);
            prop_assert_eq!(
                result.dates[0],
                series.last_date().unwrap().succ_opt().unwrap()
            );
            for value in &result.values {
                prop_assert!(*value >= 0.0);
            }
        }
    }

    #[test]
    fn prop_three_token_cycle_detected_minimally(
        a in 0u8..26, b in 0u8..26, c in 0u8..26
    ) {
        prop_assume!(a != b && b != c && a != c);
        let tokens: Vec<String> = [a, b, c]
            .iter()
            .map(|&t| ((b'A' + t) as char).to_string())
            .collect();
        let sequence: Vec<String> = tokens.iter().cloned().cycle().take(18).collect();

        prop_assert_eq!(detect_pattern_length(&sequence, 8), 3);
    }

    #[test]
    fn prop_predicted_ids_are_contiguous(
        n in 2usize..50,
        num in 1usize..10
    ) {
        let start = base_date().and_hms_opt(20, 0, 0).unwrap();
        let records = (0..n as i64)
            .map(|i| ServerRecord::new(i + 1, start + Duration::hours(40 * i), "Map_A", 1))
            .collect();
        let table = EventTable::new(records);

        let zone = ReferenceZone::parse("Asia/Jakarta", "+07:00").unwrap();
        let now = zone.offset.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single().unwrap();
        let clock = ReferenceClock::new(zone, now);

        let predictions =
            predict_next_servers(&table, num, &clock, &PredictionSettings::default());
        prop_assert_eq!(predictions.len(), num);
        for (i, prediction) in predictions.iter().enumerate() {
            prop_assert_eq!(prediction.server_id, n as i64 + 1 + i as i64);
        }
    }
}
