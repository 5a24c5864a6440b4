//! Calendar arithmetic and reference-zone handling.

pub mod calendar;
pub mod zone;

pub use calendar::{advance, bucket, complete_calendar, future_dates};
pub use zone::{lead_time_estimate, ReferenceClock, ReferenceZone, ALREADY_DUE};
