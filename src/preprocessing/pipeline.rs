//! Ingestion pipeline from raw records to an analysis-ready table.
//!
//! The pipeline enriches raw records with derived calendar fields, sorts
//! them by opening time, and validates the result. It also prepares the
//! regularly spaced count series consumed by decomposition and
//! forecasting.

use anyhow::{ensure, Context, Result};

use crate::core::domain::{Cadence, CountPoint, CountSeries, EventTable, RawServerRecord};
use crate::preprocessing::enricher::RecordEnricher;
use crate::preprocessing::validator::{TableValidator, ValidationResult};
use crate::time::calendar::{bucket, complete_calendar};

/// Result of one ingestion pass.
pub struct IngestResult {
    pub table: EventTable,
    pub validation: ValidationResult,
}

/// Configuration for the ingestion pipeline.
pub struct IngestConfig {
    /// Run validation after enrichment.
    pub validate: bool,
    /// Refuse tables whose validation reports errors.
    pub strict: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            validate: true,
            strict: false,
        }
    }
}

/// Main ingestion pipeline.
pub struct IngestPipeline {
    config: IngestConfig,
}

impl IngestPipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self {
            config: IngestConfig::default(),
        }
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: IngestConfig) -> Self {
        Self { config }
    }

    /// Process raw records into a validated, sorted event table.
    ///
    /// # Arguments
    /// * `raw` - Raw records from the ingestion collaborator
    ///
    /// # Returns
    /// IngestResult with the table and validation info
    pub fn process(&self, raw: Vec<RawServerRecord>) -> Result<IngestResult> {
        // Step 1: Compute derived fields once.
        let mut records = RecordEnricher::enrich(raw);

        // Step 2: Sort by opening time; positional analysis assumes it.
        records.sort_by_key(|r| r.open_datetime);
        let table = EventTable::new(records);

        // Step 3: Validate (if requested).
        let validation = if self.config.validate {
            TableValidator::validate(&table)
        } else {
            ValidationResult::new()
        };

        if self.config.strict {
            ensure!(
                validation.is_valid,
                "table failed validation: {}",
                validation.errors.join("; ")
            );
        } else if !validation.is_valid {
            log::warn!("ingested table has validation errors: {:?}", validation.errors);
        }

        Ok(IngestResult { table, validation })
    }

    /// Process records already carrying derived fields.
    pub fn process_table(&self, table: EventTable) -> Result<IngestResult> {
        let raw = table
            .records
            .into_iter()
            .map(|r| RawServerRecord {
                server_id: r.server_id,
                open_datetime: r.open_datetime,
                map_type: Some(r.map_type),
                district_id: r.district_id,
            })
            .collect();
        self.process(raw).context("reprocessing an existing table")
    }
}

impl Default for IngestPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Buckets a table into a gap-filled count series at the given cadence.
///
/// Daily series count openings per calendar day, monthly series per
/// month-start bucket; missing buckets between the first and last opening
/// are filled with zero so the series is evenly spaced.
pub fn prepare_count_series(table: &EventTable, cadence: Cadence) -> CountSeries {
    let mut points: Vec<CountPoint> = Vec::new();
    for record in table.sorted_by_open() {
        let date = bucket(record.open_date(), cadence);
        match points.last_mut() {
            Some(last) if last.date == date => last.count += 1.0,
            _ => points.push(CountPoint { date, count: 1.0 }),
        }
    }

    complete_calendar(&CountSeries::new(cadence, points))
}
