//! Domain models for server openings and derived count series.
//!
//! This module provides the core data structures that represent the
//! historical record of game-server openings, the regularly spaced count
//! series derived from it, and the synthetic records produced by the
//! prediction engine.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// A raw server record as delivered by the ingestion layer.
///
/// Raw records carry only the externally sourced fields. Calendar-derived
/// fields are computed once by the preprocessing enricher, which turns raw
/// records into [`ServerRecord`]s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawServerRecord {
    pub server_id: i64,
    pub open_datetime: NaiveDateTime,
    /// Missing map types are normalized to `"Unknown"` during enrichment.
    pub map_type: Option<String>,
    pub district_id: i64,
}

/// A single historical server opening with derived calendar fields.
///
/// The derived fields (`hour`, `day_of_week`, `month`, `year`) are computed
/// once at ingestion and treated as immutable afterwards. `day_of_week`
/// counts from Monday = 0.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use servercast::core::domain::ServerRecord;
///
/// let open = NaiveDate::from_ymd_opt(2024, 3, 4)
///     .unwrap()
///     .and_hms_opt(20, 0, 0)
///     .unwrap();
/// let record = ServerRecord::new(101, open, "Map_G1_1", 26);
///
/// assert_eq!(record.hour, 20);
/// assert_eq!(record.day_of_week, 0); // a Monday
/// assert_eq!(record.month, 3);
/// assert_eq!(record.year, 2024);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerRecord {
    pub server_id: i64,
    pub open_datetime: NaiveDateTime,
    pub map_type: String,
    pub district_id: i64,
    pub hour: u32,
    /// Weekday with Monday = 0 .. Sunday = 6.
    pub day_of_week: u32,
    pub month: u32,
    pub year: i32,
}

impl ServerRecord {
    /// Creates a record and computes its derived calendar fields.
    pub fn new(
        server_id: i64,
        open_datetime: NaiveDateTime,
        map_type: impl Into<String>,
        district_id: i64,
    ) -> Self {
        Self {
            server_id,
            open_datetime,
            map_type: map_type.into(),
            district_id,
            hour: open_datetime.hour(),
            day_of_week: open_datetime.weekday().num_days_from_monday(),
            month: open_datetime.month(),
            year: open_datetime.year(),
        }
    }

    /// The calendar date of the opening.
    pub fn open_date(&self) -> NaiveDate {
        self.open_datetime.date()
    }
}

/// The normalized historical record of server openings.
///
/// Tables are rebuilt fully on every refresh and live for one analysis
/// pass. Positional analysis assumes ascending `open_datetime` order;
/// consumers call [`EventTable::sorted_by_open`] rather than trusting the
/// caller's ordering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventTable {
    pub records: Vec<ServerRecord>,
}

impl EventTable {
    pub fn new(records: Vec<ServerRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the records sorted ascending by open time.
    ///
    /// Components that do windowed or positional analysis re-sort
    /// defensively through this method instead of assuming caller order.
    pub fn sorted_by_open(&self) -> Vec<ServerRecord> {
        let mut sorted = self.records.clone();
        sorted.sort_by_key(|r| r.open_datetime);
        sorted
    }

    /// The record with the highest `server_id`, which anchors prediction.
    ///
    /// Ids are the external identity and are assumed monotonically aligned
    /// with open times, so the maximum id identifies the latest server.
    pub fn latest_by_server_id(&self) -> Option<&ServerRecord> {
        self.records.iter().max_by_key(|r| r.server_id)
    }

    /// The most recent `n` map types in opening order.
    pub fn recent_map_types(&self, n: usize) -> Vec<String> {
        let sorted = self.sorted_by_open();
        let start = sorted.len().saturating_sub(n);
        sorted[start..].iter().map(|r| r.map_type.clone()).collect()
    }

    /// The most recent `n` records in opening order.
    pub fn recency_window(&self, n: usize) -> Vec<ServerRecord> {
        let sorted = self.sorted_by_open();
        let start = sorted.len().saturating_sub(n);
        sorted[start..].to_vec()
    }
}

/// Bucketing cadence of a [`CountSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cadence {
    /// One bucket per calendar day.
    Daily,
    /// One bucket per month, anchored at the first of the month.
    Monthly,
}

impl Cadence {
    /// Short tag used in cache keys and log lines.
    pub fn tag(&self) -> &'static str {
        match self {
            Cadence::Daily => "daily",
            Cadence::Monthly => "monthly",
        }
    }
}

/// One (date, count) observation of a [`CountSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountPoint {
    pub date: NaiveDate,
    pub count: f64,
}

/// A regularly spaced series of event counts.
///
/// Decomposition and ARIMA fitting require evenly spaced observations, so
/// series are re-indexed to a complete calendar (missing dates inserted
/// with count zero) before statistical use; see
/// [`crate::time::calendar::complete_calendar`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use servercast::core::domain::{Cadence, CountPoint, CountSeries};
///
/// let day = |d: u32| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
/// let series = CountSeries::new(
///     Cadence::Daily,
///     vec![
///         CountPoint { date: day(1), count: 2.0 },
///         CountPoint { date: day(2), count: 0.0 },
///     ],
/// );
///
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.last_date(), Some(day(2)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountSeries {
    pub cadence: Cadence,
    pub points: Vec<CountPoint>,
}

impl CountSeries {
    /// Creates a series, sorting the points ascending by date.
    pub fn new(cadence: Cadence, mut points: Vec<CountPoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self { cadence, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.count).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

/// A synthesized future server record.
///
/// `server_id` values are strictly `last_known_id + i` for the i-th
/// prediction; ids are never reused or skipped. `estimate` is either a
/// human-readable lead time or the "already due" sentinel when the
/// projected time has passed the reference clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedServer {
    pub server_id: i64,
    pub open_datetime: NaiveDateTime,
    pub district_id: i64,
    pub map_type: String,
    pub estimate: String,
}

impl PredictedServer {
    /// The projected calendar date, formatted for display.
    pub fn date_display(&self) -> String {
        self.open_datetime.format("%Y-%m-%d").to_string()
    }

    /// The projected time of day, formatted for display.
    pub fn time_display(&self) -> String {
        self.open_datetime.format("%H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_derived_fields() {
        let record = ServerRecord::new(7, dt(2023, 11, 5, 21), "Map_G1_2", 3);
        assert_eq!(record.hour, 21);
        assert_eq!(record.day_of_week, 6); // 2023-11-05 is a Sunday
        assert_eq!(record.month, 11);
        assert_eq!(record.year, 2023);
    }

    #[test]
    fn test_sorted_by_open_resorts() {
        let table = EventTable::new(vec![
            ServerRecord::new(2, dt(2024, 1, 3, 20), "B", 1),
            ServerRecord::new(1, dt(2024, 1, 1, 20), "A", 1),
        ]);
        let sorted = table.sorted_by_open();
        assert_eq!(sorted[0].server_id, 1);
        assert_eq!(sorted[1].server_id, 2);
    }

    #[test]
    fn test_latest_by_server_id_ignores_order() {
        let table = EventTable::new(vec![
            ServerRecord::new(5, dt(2024, 1, 5, 20), "A", 2),
            ServerRecord::new(9, dt(2024, 1, 9, 20), "B", 3),
            ServerRecord::new(7, dt(2024, 1, 7, 20), "C", 2),
        ]);
        assert_eq!(table.latest_by_server_id().unwrap().server_id, 9);
    }

    #[test]
    fn test_recent_map_types_window() {
        let table = EventTable::new(vec![
            ServerRecord::new(1, dt(2024, 1, 1, 20), "A", 1),
            ServerRecord::new(2, dt(2024, 1, 2, 20), "B", 1),
            ServerRecord::new(3, dt(2024, 1, 3, 20), "C", 1),
        ]);
        assert_eq!(table.recent_map_types(2), vec!["B", "C"]);
        assert_eq!(table.recent_map_types(10).len(), 3);
    }

    #[test]
    fn test_count_series_sorts_points() {
        let day = |d: u32| NaiveDate::from_ymd_opt(2024, 2, d).unwrap();
        let series = CountSeries::new(
            Cadence::Daily,
            vec![
                CountPoint { date: day(3), count: 1.0 },
                CountPoint { date: day(1), count: 2.0 },
            ],
        );
        assert_eq!(series.first_date(), Some(day(1)));
        assert_eq!(series.values(), vec![2.0, 1.0]);
    }
}
