//! Analytics configuration file support.
//!
//! This module provides utilities for reading engine configuration from
//! TOML configuration files. Every field carries a default, so an absent or
//! partial file still yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{AnalysisError, AnalysisResult};
use crate::time::zone::ReferenceZone;

/// Engine configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub time: TimeSettings,
    #[serde(default)]
    pub prediction: PredictionSettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

/// Reference timezone settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSettings {
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Fixed UTC offset of the reference zone, e.g. `"+07:00"`.
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
}

/// Prediction heuristics settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionSettings {
    /// Number of most recent records used for timing statistics.
    #[serde(default = "default_recency_window")]
    pub recency_window: usize,
    /// Predicted servers per district before the district id increments.
    #[serde(default = "default_district_span")]
    pub district_span: i64,
    /// Map rotation assumed when the history is too short to infer one.
    #[serde(default = "default_map_cycle")]
    pub default_map_cycle: Vec<String>,
}

/// Result-cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Cache entry lifetime in seconds; zero disables caching.
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
}

fn default_timezone() -> String {
    "Asia/Jakarta".to_string()
}

fn default_utc_offset() -> String {
    "+07:00".to_string()
}

fn default_recency_window() -> usize {
    30
}

fn default_district_span() -> i64 {
    4
}

fn default_map_cycle() -> Vec<String> {
    crate::algorithms::patterns::DEFAULT_MAP_CYCLE.clone()
}

fn default_cache_ttl() -> u64 {
    1800
}

impl Default for TimeSettings {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            utc_offset: default_utc_offset(),
        }
    }
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self {
            recency_window: default_recency_window(),
            district_span: default_district_span(),
            default_map_cycle: default_map_cycle(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl(),
        }
    }
}

impl AnalyticsConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(AnalyticsConfig)` if successful
    /// * `Err(AnalysisError)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> AnalysisResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            AnalysisError::Configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: AnalyticsConfig = toml::from_str(&content).map_err(|e| {
            AnalysisError::Configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `servercast.toml` in the current directory and its
    /// parent; falls back to defaults when no file exists.
    pub fn from_default_location() -> Self {
        let search_paths = vec![
            PathBuf::from("servercast.toml"),
            PathBuf::from("../servercast.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return config,
                    Err(e) => {
                        log::warn!("Ignoring unreadable config {}: {}", path.display(), e);
                    }
                }
            }
        }

        Self::default()
    }

    /// The configured reference zone.
    pub fn reference_zone(&self) -> AnalysisResult<ReferenceZone> {
        ReferenceZone::parse(self.time.timezone.clone(), &self.time.utc_offset)
    }
}
