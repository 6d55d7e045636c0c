//! Error types for the catalog service and its boundary.

use data_loader::MovieId;
use pipeline::QueryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// No record has this id
    #[error("Movie {id} not found")]
    MovieNotFound { id: MovieId },

    /// Comment missing or whitespace only
    #[error("Comment must not be blank")]
    BlankComment,

    /// User rating outside the 0-5 scale
    #[error("Rating {value} is outside {min} - {max}")]
    RatingOutOfRange { value: f64, min: f64, max: f64 },

    /// Year criterion outside the accepted input range
    #[error("Year {year} is outside {min} - {max}")]
    YearOutOfRange { year: u32, min: u32, max: u32 },

    /// Bad filter or sort token, or a bad payload
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Configuration file unreadable or invalid
    #[error("Invalid configuration {path}: {reason}")]
    Config { path: String, reason: String },

    /// Export serialization failed
    #[error("Failed to export catalog: {0}")]
    Export(#[from] serde_json::Error),

    /// Export format token not recognized
    #[error("Unknown export format '{0}' (expected pretty, json or csv)")]
    UnknownExportFormat(String),

    /// CSV encoding failed
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Writing an export failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// True for errors caused by caller input rather than catalog state.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CatalogError::BlankComment
                | CatalogError::RatingOutOfRange { .. }
                | CatalogError::YearOutOfRange { .. }
                | CatalogError::Query(_)
                | CatalogError::UnknownExportFormat(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
