//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern, and the mapping
//! from a typed [`Query`] to the filters that evaluate it.

use crate::criteria::{FilterCriterion, Query};
use crate::filters::*;
use crate::traits::Filter;
use data_loader::MovieHandle;
use tracing;

/// Chains multiple filters together into an AND-chain.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(DirectorFilter::new("nolan"))
///     .add_filter(MinRatingFilter::new(8.5));
///
/// let filtered = pipeline.apply(records);
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Build the pipeline that evaluates every criterion of `query`.
    pub fn from_query(query: &Query) -> Self {
        query
            .iter()
            .fold(FilterPipeline::new(), |pipeline, criterion| {
                pipeline.add_boxed(filter_for(criterion))
            })
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    fn add_boxed(mut self, filter: Box<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence to the records.
    ///
    /// The output of each filter is the input of the next. An empty
    /// pipeline returns the input untouched.
    pub fn apply(&self, records: Vec<MovieHandle>) -> Vec<MovieHandle> {
        let mut current = records;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current);
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
            if current.is_empty() {
                break;
            }
        }
        current
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// The filter that evaluates one criterion.
fn filter_for(criterion: &FilterCriterion) -> Box<dyn Filter> {
    match criterion {
        FilterCriterion::TitleKeyword(keyword) => Box::new(TitleKeywordFilter::new(keyword)),
        FilterCriterion::ExactTitle(title) => Box::new(ExactTitleFilter::new(title)),
        FilterCriterion::Director(name) => Box::new(DirectorFilter::new(name)),
        FilterCriterion::Actor(name) => Box::new(ActorFilter::new(name)),
        FilterCriterion::Genre(genre) => Box::new(GenreFilter::new(genre)),
        FilterCriterion::Year(year) => Box::new(YearFilter::new(*year)),
        FilterCriterion::YearRange(start, end) => Box::new(YearRangeFilter::new(*start, *end)),
        FilterCriterion::MinRating(min) => Box::new(MinRatingFilter::new(*min)),
        FilterCriterion::MaxRating(max) => Box::new(MaxRatingFilter::new(*max)),
        FilterCriterion::CommentKeyword(keyword) => Box::new(CommentKeywordFilter::new(keyword)),
        FilterCriterion::MinInAppRating(min) => Box::new(MinInAppRatingFilter::new(*min)),
    }
}

/// Filter `records` by every criterion of `query`.
pub fn apply_query(records: Vec<MovieHandle>, query: &Query) -> Vec<MovieHandle> {
    if query.is_empty() {
        return records;
    }
    FilterPipeline::from_query(query).apply(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::fixtures::{catalog, ids};

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        let filtered = pipeline.apply(catalog());
        assert_eq!(ids(&filtered), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_single_filter() {
        let pipeline = FilterPipeline::new().add_filter(YearFilter::new(2010));
        let filtered = pipeline.apply(catalog());
        assert_eq!(ids(&filtered), vec![1]);
    }

    #[test]
    fn test_from_query_builds_one_filter_per_criterion() {
        let query = Query::new()
            .with(FilterCriterion::Director("nolan".to_string()))
            .and_then(|q| q.with(FilterCriterion::MinRating(8.9)))
            .unwrap();
        let pipeline = FilterPipeline::from_query(&query);
        assert_eq!(pipeline.len(), 2);
        assert_eq!(ids(&pipeline.apply(catalog())), vec![2]);
    }

    #[test]
    fn test_apply_query_identity() {
        let records = catalog();
        let filtered = apply_query(records.clone(), &Query::new());
        assert_eq!(ids(&filtered), ids(&records));
        assert!(filtered.iter().zip(&records).all(|(a, b)| std::sync::Arc::ptr_eq(a, b)));
    }
}
