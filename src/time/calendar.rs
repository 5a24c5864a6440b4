//! Cadence arithmetic and calendar completion for count series.
//!
//! Statistical decomposition and ARIMA fitting require evenly spaced
//! observations, so derived count series are re-indexed onto a complete
//! calendar with missing dates inserted at count zero. An unfilled gap
//! silently biases trend estimates, which is why completion happens before
//! any model sees the series.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::core::domain::{Cadence, CountPoint, CountSeries};

/// Returns the bucket anchor for a date at the given cadence.
///
/// Daily buckets are the date itself; monthly buckets anchor at the first
/// of the month.
pub fn bucket(date: NaiveDate, cadence: Cadence) -> NaiveDate {
    match cadence {
        Cadence::Daily => date,
        Cadence::Monthly => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
            .expect("first of an existing month is always valid"),
    }
}

/// Advances a bucket anchor by one cadence unit.
pub fn advance(date: NaiveDate, cadence: Cadence) -> NaiveDate {
    match cadence {
        Cadence::Daily => date.succ_opt().expect("date range exhausted"),
        Cadence::Monthly => {
            let (year, month) = if date.month() == 12 {
                (date.year() + 1, 1)
            } else {
                (date.year(), date.month() + 1)
            };
            NaiveDate::from_ymd_opt(year, month, 1)
                .expect("first of an existing month is always valid")
        }
    }
}

/// Re-indexes a series onto a complete calendar, inserting zero counts for
/// missing dates.
///
/// Points falling inside the same bucket are summed. Running completion on
/// an already-complete series returns the identical series.
pub fn complete_calendar(series: &CountSeries) -> CountSeries {
    if series.is_empty() {
        return series.clone();
    }

    let mut by_bucket: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for point in &series.points {
        *by_bucket.entry(bucket(point.date, series.cadence)).or_insert(0.0) += point.count;
    }

    let first = *by_bucket.keys().next().expect("non-empty map");
    let last = *by_bucket.keys().next_back().expect("non-empty map");

    let mut points = Vec::new();
    let mut cursor = first;
    loop {
        points.push(CountPoint {
            date: cursor,
            count: by_bucket.get(&cursor).copied().unwrap_or(0.0),
        });
        if cursor == last {
            break;
        }
        cursor = advance(cursor, series.cadence);
    }

    CountSeries {
        cadence: series.cadence,
        points,
    }
}

/// Generates `n` future dates starting one cadence unit after `last`.
pub fn future_dates(last: NaiveDate, cadence: Cadence, n: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(n);
    let mut cursor = last;
    for _ in 0..n {
        cursor = advance(cursor, cadence);
        dates.push(cursor);
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monthly_advance_wraps_year() {
        assert_eq!(advance(day(2023, 12, 1), Cadence::Monthly), day(2024, 1, 1));
        assert_eq!(advance(day(2024, 1, 1), Cadence::Monthly), day(2024, 2, 1));
    }

    #[test]
    fn test_complete_calendar_fills_gaps_with_zero() {
        let series = CountSeries::new(
            Cadence::Daily,
            vec![
                CountPoint { date: day(2024, 1, 1), count: 2.0 },
                CountPoint { date: day(2024, 1, 4), count: 1.0 },
            ],
        );
        let complete = complete_calendar(&series);
        assert_eq!(complete.len(), 4);
        assert_eq!(complete.points[1].count, 0.0);
        assert_eq!(complete.points[2].count, 0.0);
        assert_eq!(complete.points[3].count, 1.0);
    }

    #[test]
    fn test_complete_calendar_is_idempotent() {
        let series = CountSeries::new(
            Cadence::Daily,
            vec![
                CountPoint { date: day(2024, 1, 1), count: 2.0 },
                CountPoint { date: day(2024, 1, 3), count: 1.0 },
            ],
        );
        let once = complete_calendar(&series);
        let twice = complete_calendar(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_complete_calendar_monthly_buckets() {
        let series = CountSeries::new(
            Cadence::Monthly,
            vec![
                CountPoint { date: day(2023, 11, 12), count: 1.0 },
                CountPoint { date: day(2023, 11, 25), count: 2.0 },
                CountPoint { date: day(2024, 2, 3), count: 4.0 },
            ],
        );
        let complete = complete_calendar(&series);
        let dates = complete.dates();
        assert_eq!(
            dates,
            vec![day(2023, 11, 1), day(2023, 12, 1), day(2024, 1, 1), day(2024, 2, 1)]
        );
        // Same-bucket points are summed.
        assert_eq!(complete.points[0].count, 3.0);
        assert_eq!(complete.points[1].count, 0.0);
    }

    #[test]
    fn test_future_dates_start_one_unit_after_last() {
        let dates = future_dates(day(2024, 1, 31), Cadence::Daily, 3);
        assert_eq!(dates, vec![day(2024, 2, 1), day(2024, 2, 2), day(2024, 2, 3)]);

        let months = future_dates(day(2024, 11, 1), Cadence::Monthly, 3);
        assert_eq!(months, vec![day(2024, 12, 1), day(2025, 1, 1), day(2025, 2, 1)]);
    }
}
