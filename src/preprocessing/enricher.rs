//! Derived-field enrichment of raw server records.
//!
//! Raw records arrive from the ingestion collaborator with only the
//! externally sourced fields. Enrichment computes the calendar-derived
//! fields (hour, weekday, month, year) exactly once; afterwards the table
//! is treated as immutable. Missing map types are normalized to a fixed
//! placeholder so every record carries a usable categorical tag.

use crate::core::domain::{RawServerRecord, ServerRecord};

/// Placeholder tag for records whose map type is missing.
pub const UNKNOWN_MAP_TYPE: &str = "Unknown";

/// Enricher turning raw records into analysis-ready ones.
pub struct RecordEnricher;

impl RecordEnricher {
    /// Computes derived calendar fields for a batch of raw records.
    pub fn enrich(raw: Vec<RawServerRecord>) -> Vec<ServerRecord> {
        raw.into_iter().map(Self::enrich_one).collect()
    }

    fn enrich_one(raw: RawServerRecord) -> ServerRecord {
        let map_type = match raw.map_type {
            Some(tag) if !tag.trim().is_empty() => tag,
            _ => UNKNOWN_MAP_TYPE.to_string(),
        };
        ServerRecord::new(raw.server_id, raw.open_datetime, map_type, raw.district_id)
    }
}
