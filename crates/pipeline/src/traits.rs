//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to a list of movie records.

use data_loader::{MovieHandle, MovieRecord};
use rayon::prelude::*;

/// A single predicate over movie records.
///
/// ## Design Note
/// - `Send + Sync` lets a pipeline be shared between request handlers
/// - Filters take ownership of the Vec and return the survivors, so a chain
///   of filters moves handles along instead of cloning them
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Whether `record` passes this filter.
    fn matches(&self, record: &MovieRecord) -> bool;

    /// Keep the records that match, preserving their relative order.
    fn apply(&self, records: Vec<MovieHandle>) -> Vec<MovieHandle> {
        records
            .into_par_iter()
            .filter(|record| self.matches(record))
            .collect()
    }
}

/// Lowercase once so per-record checks only lowercase the record side.
pub(crate) fn normalize(needle: &str) -> String {
    needle.to_lowercase()
}

/// Case-insensitive substring test against an already-lowercased needle.
pub(crate) fn contains_ci(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}
