//! Reference clock and zone normalization.
//!
//! Table timestamps are zone-naive; "now" is zone-aware. Comparing the two
//! directly is meaningless, so every lead-time computation first localizes
//! the naive projection into the configured reference zone. The reference
//! instant is passed in explicitly, which keeps prediction deterministic
//! under test.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::{AnalysisError, AnalysisResult};

/// Sentinel estimate for projections that are already in the past.
pub const ALREADY_DUE: &str = "Already due";

/// The configured reference timezone as a name plus fixed UTC offset.
///
/// The deployment zone (UTC+7) has no daylight saving, so a fixed offset is
/// sufficient and avoids carrying a tz database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceZone {
    pub name: String,
    #[serde(with = "offset_serde")]
    pub offset: FixedOffset,
}

impl ReferenceZone {
    pub fn new(name: impl Into<String>, offset: FixedOffset) -> Self {
        Self {
            name: name.into(),
            offset,
        }
    }

    /// Parses an offset string of the form `"+07:00"` or `"-03:30"`.
    pub fn parse(name: impl Into<String>, offset: &str) -> AnalysisResult<Self> {
        Ok(Self::new(name.into(), parse_offset(offset)?))
    }

    /// Attaches this zone to a naive local timestamp.
    pub fn localize(&self, naive: NaiveDateTime) -> AnalysisResult<DateTime<FixedOffset>> {
        self.offset
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| {
                AnalysisError::TimezoneInconsistency(format!(
                    "cannot localize {} into zone {}",
                    naive, self.name
                ))
            })
    }
}

/// An explicit reference instant in the configured zone.
///
/// Passed into prediction instead of reading ambient global time.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceClock {
    pub zone: ReferenceZone,
    pub now: DateTime<FixedOffset>,
}

impl ReferenceClock {
    /// Pins a clock at an explicit zone-aware instant.
    pub fn new(zone: ReferenceZone, now: DateTime<FixedOffset>) -> Self {
        Self { zone, now }
    }

    /// Converts a UTC instant into the reference zone.
    pub fn from_utc(zone: ReferenceZone, now_utc: DateTime<Utc>) -> Self {
        let now = now_utc.with_timezone(&zone.offset);
        Self { zone, now }
    }
}

/// Formats the lead time between a naive projected opening and the
/// reference clock.
///
/// The projection is localized into the reference zone before subtraction;
/// past projections yield the [`ALREADY_DUE`] sentinel rather than a
/// negative duration.
pub fn lead_time_estimate(
    projected: NaiveDateTime,
    clock: &ReferenceClock,
) -> AnalysisResult<String> {
    let projected_aware = clock.zone.localize(projected)?;
    let remaining: Duration = projected_aware.signed_duration_since(clock.now);

    if remaining < Duration::zero() {
        return Ok(ALREADY_DUE.to_string());
    }

    let days = remaining.num_days();
    let hours = (remaining - Duration::days(days)).num_hours();
    Ok(format!("{} days {} hours", days, hours))
}

fn parse_offset(offset: &str) -> AnalysisResult<FixedOffset> {
    let err = || {
        AnalysisError::Configuration(format!(
            "invalid UTC offset '{}', expected e.g. '+07:00'",
            offset
        ))
    };

    let bytes = offset.as_bytes();
    if bytes.len() != 6 || bytes[3] != b':' {
        return Err(err());
    }
    let sign = match bytes[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return Err(err()),
    };
    let hours: i32 = offset[1..3].parse().map_err(|_| err())?;
    let minutes: i32 = offset[4..6].parse().map_err(|_| err())?;
    if hours > 23 || minutes > 59 {
        return Err(err());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(err)
}

mod offset_serde {
    use chrono::FixedOffset;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(offset: &FixedOffset, s: S) -> Result<S::Ok, S::Error> {
        offset.to_string().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<FixedOffset, D::Error> {
        let text = String::deserialize(d)?;
        super::parse_offset(&text).map_err(serde::de::Error::custom)
    }
}
