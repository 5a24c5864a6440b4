//! Core domain models for server-opening analytics.
//!
//! This module defines the fundamental data structures used throughout the
//! engine, representing historical server records, regularly spaced count
//! series, and synthesized predictions.

pub mod domain;
pub mod error;

pub use domain::{
    Cadence, CountPoint, CountSeries, EventTable, PredictedServer, RawServerRecord, ServerRecord,
};
pub use error::{AnalysisError, AnalysisResult};
