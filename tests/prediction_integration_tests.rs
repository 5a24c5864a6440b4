//! Integration tests for next-server prediction over realistic tables.

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Timelike};
use servercast::config::PredictionSettings;
use servercast::core::domain::{EventTable, ServerRecord};
use servercast::predict_next_servers;
use servercast::time::zone::{ReferenceClock, ReferenceZone};

fn clock_at(y: i32, m: u32, d: u32, h: u32) -> ReferenceClock {
    let zone = ReferenceZone::parse("Asia/Jakarta", "+07:00").unwrap();
    let now = zone.offset.with_ymd_and_hms(y, m, d, h, 0, 0).single().unwrap();
    ReferenceClock::new(zone, now)
}

/// Forty servers opening every 48 hours at 20:00, maps rotating A-D,
/// districts advancing every fourth server.
fn cadenced_table() -> EventTable {
    let maps = ["Map_A", "Map_B", "Map_C", "Map_D"];
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(20, 0, 0)
        .unwrap();
    let records = (0..40i64)
        .map(|i| {
            ServerRecord::new(
                i + 1,
                start + Duration::hours(48 * i),
                maps[(i % 4) as usize],
                10 + i / 4,
            )
        })
        .collect();
    EventTable::new(records)
}

/// Twenty-eight servers: nine weeks with Monday and Thursday openings,
/// then ten Monday-only weeks, all at 20:00. Weekday consistency lands at
/// 19/28 with a 96-hour median gap, so predictions must snap forward onto
/// Mondays.
fn monday_heavy_table() -> EventTable {
    let maps = ["Map_A", "Map_B", "Map_C", "Map_D"];
    let monday = NaiveDate::from_ymd_opt(2024, 1, 1) // a Monday
        .unwrap()
        .and_hms_opt(20, 0, 0)
        .unwrap();

    let mut opens = Vec::new();
    for week in 0..9i64 {
        opens.push(monday + Duration::weeks(week));
        opens.push(monday + Duration::weeks(week) + Duration::hours(72));
    }
    for week in 9..19i64 {
        opens.push(monday + Duration::weeks(week));
    }

    let records = opens
        .into_iter()
        .enumerate()
        .map(|(i, open)| {
            ServerRecord::new(i as i64 + 1, open, maps[i % 4], 10 + i as i64 / 4)
        })
        .collect();
    EventTable::new(records)
}

#[test]
fn test_ids_are_exactly_sequential() {
    let table = cadenced_table();
    let predictions =
        predict_next_servers(&table, 5, &clock_at(2024, 2, 1, 12), &PredictionSettings::default());

    let ids: Vec<i64> = predictions.iter().map(|p| p.server_id).collect();
    assert_eq!(ids, vec![41, 42, 43, 44, 45]);
}

#[test]
fn test_district_increments_once_every_four_predictions() {
    let table = cadenced_table();
    let predictions =
        predict_next_servers(&table, 8, &clock_at(2024, 2, 1, 12), &PredictionSettings::default());

    let districts: Vec<i64> = predictions.iter().map(|p| p.district_id).collect();
    assert_eq!(districts, vec![19, 19, 19, 19, 20, 20, 20, 20]);
}

#[test]
fn test_cadenced_scenario_continues_map_cycle_at_modal_hour() {
    let table = cadenced_table();
    let predictions =
        predict_next_servers(&table, 4, &clock_at(2024, 2, 1, 12), &PredictionSettings::default());

    assert_eq!(predictions.len(), 4);
    let maps: Vec<&str> = predictions.iter().map(|p| p.map_type.as_str()).collect();
    assert_eq!(maps, vec!["Map_A", "Map_B", "Map_C", "Map_D"]);
    for prediction in &predictions {
        assert_eq!(prediction.open_datetime.hour(), 20);
        assert_eq!(prediction.open_datetime.minute(), 0);
    }
}

#[test]
fn test_monday_heavy_scenario_snaps_to_mondays() {
    let table = monday_heavy_table();
    let predictions =
        predict_next_servers(&table, 4, &clock_at(2024, 3, 1, 12), &PredictionSettings::default());

    assert_eq!(predictions.len(), 4);
    let ids: Vec<i64> = predictions.iter().map(|p| p.server_id).collect();
    assert_eq!(ids, vec![29, 30, 31, 32]);

    let last_open = table.latest_by_server_id().unwrap().open_datetime;
    for prediction in &predictions {
        // Both consistencies exceed 0.5: hour snapped to 20:00 and the
        // date advanced (never backward) to the next Monday.
        assert_eq!(prediction.open_datetime.hour(), 20);
        assert_eq!(prediction.open_datetime.weekday().num_days_from_monday(), 0);
        assert!(prediction.open_datetime > last_open);
    }

    let maps: Vec<&str> = predictions.iter().map(|p| p.map_type.as_str()).collect();
    assert_eq!(maps, vec!["Map_A", "Map_B", "Map_C", "Map_D"]);
}

#[test]
fn test_empty_table_yields_empty_predictions_without_panic() {
    let predictions = predict_next_servers(
        &EventTable::default(),
        5,
        &clock_at(2024, 2, 1, 12),
        &PredictionSettings::default(),
    );
    assert!(predictions.is_empty());
}

#[test]
fn test_unsorted_input_is_resorted_defensively() {
    let mut table = cadenced_table();
    table.records.reverse();
    let predictions =
        predict_next_servers(&table, 3, &clock_at(2024, 2, 1, 12), &PredictionSettings::default());

    let ids: Vec<i64> = predictions.iter().map(|p| p.server_id).collect();
    assert_eq!(ids, vec![41, 42, 43]);
    assert_eq!(predictions[0].open_datetime.hour(), 20);
}
