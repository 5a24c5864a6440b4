//! Error types for analytics operations.

/// Result type for analytics operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Error type for analytics operations
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The input holds fewer observations than the operation needs.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// The statistical solver failed to converge or hit a singular
    /// configuration.
    #[error("Model fit error: {0}")]
    ModelFit(String),

    /// Required fields are missing or an assumed ordering does not hold.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Zone-aware and zone-naive timestamps were mixed where a subtraction
    /// is required.
    #[error("Timezone inconsistency: {0}")]
    TimezoneInconsistency(String),

    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<String> for AnalysisError {
    fn from(s: String) -> Self {
        AnalysisError::ModelFit(s)
    }
}

impl From<&str> for AnalysisError {
    fn from(s: &str) -> Self {
        AnalysisError::ModelFit(s.to_string())
    }
}
