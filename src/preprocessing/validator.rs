//! Event-table validation with detailed error and warning reporting.
//!
//! Validates server records for completeness and consistency: duplicate or
//! non-positive ids, out-of-order timestamps where id order is assumed,
//! and placeholder map types. Errors make the result invalid; warnings are
//! informational — the pipeline re-sorts defensively rather than rejecting
//! a reordered table.

use serde::{Deserialize, Serialize};

use crate::core::domain::EventTable;
use crate::preprocessing::enricher::UNKNOWN_MAP_TYPE;

/// Validation outcome with categorized issues and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ValidationStats,
}

/// Summary statistics computed during validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total_records: usize,
    pub distinct_map_types: usize,
    pub duplicate_ids: usize,
    pub nonpositive_ids: usize,
    pub unknown_map_types: usize,
    pub out_of_order_timestamps: usize,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: ValidationStats::default(),
        }
    }

    /// Adds a critical error and marks the result as invalid.
    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
        self.is_valid = false;
    }

    /// Adds a non-critical warning without failing validation.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator over an enriched event table.
pub struct TableValidator;

impl TableValidator {
    /// Validates an event table.
    pub fn validate(table: &EventTable) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.stats.total_records = table.len();

        if table.is_empty() {
            result.add_error("Event table holds no records".to_string());
            return result;
        }

        let mut ids: Vec<i64> = table.records.iter().map(|r| r.server_id).collect();
        ids.sort_unstable();
        let duplicate_ids = ids.windows(2).filter(|w| w[0] == w[1]).count();
        if duplicate_ids > 0 {
            result.add_error(format!("{} duplicate server ids", duplicate_ids));
        }
        result.stats.duplicate_ids = duplicate_ids;

        let nonpositive_ids = table.records.iter().filter(|r| r.server_id <= 0).count();
        if nonpositive_ids > 0 {
            result.add_error(format!("{} non-positive server ids", nonpositive_ids));
        }
        result.stats.nonpositive_ids = nonpositive_ids;

        let unknown_map_types = table
            .records
            .iter()
            .filter(|r| r.map_type == UNKNOWN_MAP_TYPE)
            .count();
        if unknown_map_types > 0 {
            result.add_warning(format!("{} records with unknown map type", unknown_map_types));
        }
        result.stats.unknown_map_types = unknown_map_types;

        // Ids are the external identity and are assumed to follow opening
        // order; disagreement is recoverable because consumers re-sort.
        let mut by_id = table.records.clone();
        by_id.sort_by_key(|r| r.server_id);
        let out_of_order = by_id
            .windows(2)
            .filter(|w| w[1].open_datetime < w[0].open_datetime)
            .count();
        if out_of_order > 0 {
            result.add_warning(format!(
                "{} timestamps out of order relative to id order",
                out_of_order
            ));
        }
        result.stats.out_of_order_timestamps = out_of_order;

        let mut map_types: Vec<&str> =
            table.records.iter().map(|r| r.map_type.as_str()).collect();
        map_types.sort_unstable();
        map_types.dedup();
        result.stats.distinct_map_types = map_types.len();

        result
    }
}
