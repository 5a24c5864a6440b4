//! servercast: analytics and short-horizon forecasting for game-server
//! opening data.
//!
//! The engine consumes a normalized table of historical server openings
//! (id, open timestamp, map type, district) and produces:
//!
//! - trend/seasonal/residual decompositions of opening-count series,
//! - ARIMA and seasonal-ARIMA forecasts of future opening counts,
//! - synthesized next-server records (id, timestamp, district, map type)
//!   from historical periodicity.
//!
//! Everything is synchronous and CPU-bound; acquisition, rendering, and
//! notification delivery live in external collaborators that exchange
//! plain data with this crate.
//!
//! # Example
//!
//! ```
//! use chrono::{NaiveDate, TimeZone};
//! use servercast::config::PredictionSettings;
//! use servercast::core::domain::{EventTable, ServerRecord};
//! use servercast::time::zone::{ReferenceClock, ReferenceZone};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1)
//!     .unwrap()
//!     .and_hms_opt(20, 0, 0)
//!     .unwrap();
//! let records = (0..12)
//!     .map(|i| {
//!         ServerRecord::new(i + 1, start + chrono::Duration::hours(48 * i), "Map_A", 1)
//!     })
//!     .collect();
//! let table = EventTable::new(records);
//!
//! let zone = ReferenceZone::parse("Asia/Jakarta", "+07:00").unwrap();
//! let now = zone.offset.with_ymd_and_hms(2024, 1, 20, 12, 0, 0).single().unwrap();
//! let clock = ReferenceClock::new(zone, now);
//!
//! let predictions = servercast::predict_next_servers(
//!     &table,
//!     3,
//!     &clock,
//!     &PredictionSettings::default(),
//! );
//! assert_eq!(predictions.len(), 3);
//! assert_eq!(predictions[0].server_id, 13);
//! ```

pub mod algorithms;
pub mod config;
pub mod core;
pub mod preprocessing;
pub mod services;
pub mod time;
pub mod transformations;

pub use algorithms::{
    analyze_time_patterns, decompose, detect_pattern_length, forecast_arima, forecast_sarima,
    predict_next_servers, search_arima_order,
};
pub use config::AnalyticsConfig;
pub use core::domain::{
    Cadence, CountPoint, CountSeries, EventTable, PredictedServer, RawServerRecord, ServerRecord,
};
pub use core::error::{AnalysisError, AnalysisResult};
