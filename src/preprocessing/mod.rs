pub mod enricher;
pub mod pipeline;
pub mod validator;

pub use enricher::RecordEnricher;
pub use pipeline::{prepare_count_series, IngestConfig, IngestPipeline, IngestResult};
pub use validator::{TableValidator, ValidationResult, ValidationStats};
