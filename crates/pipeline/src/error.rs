//! Error types for building queries.
//!
//! Every variant is raised while a query is being assembled, before any
//! record is looked at. A query that fails to build is never partially
//! applied.

use crate::criteria::FilterKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Filter token is not one of the known kinds
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    /// Sort token is not one of the known keys
    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    /// Payload could not be parsed or is unusable for its kind
    #[error("Invalid value for {kind}: {reason}")]
    MalformedPayload { kind: FilterKind, reason: String },

    /// The same kind appeared twice in one query
    #[error("Filter {0} given more than once")]
    DuplicateFilter(FilterKind),
}

pub type Result<T> = std::result::Result<T, QueryError>;
