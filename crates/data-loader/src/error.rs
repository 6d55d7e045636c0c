//! Error types for the data-loader crate.
//!
//! Ingestion is the only fallible path in this crate. Record construction
//! normalizes bad values instead of failing (see [`crate::types::MovieRecord`]).

use thiserror::Error;

/// Errors that can occur while ingesting movie metadata.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading the source
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The payload was not valid JSON, or not the shape we expect
    #[error("Malformed movie payload: {0}")]
    Json(#[from] serde_json::Error),

    /// A field had a value we cannot use at all (e.g. a negative id)
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Convenience alias for Results in this crate.
pub type Result<T> = std::result::Result<T, DataLoadError>;
