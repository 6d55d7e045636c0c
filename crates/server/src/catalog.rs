//! # Catalog Service
//!
//! Holds the ingested movies and the most recent query result:
//!
//! - `original`: every ingested record, fixed at construction
//! - `processed`: the last filtered/sorted view, replaced wholesale by
//!   [`CatalogService::search`] and [`CatalogService::sort`]
//!
//! A search filters `original` and then orders the result by the default
//! sort key. A sort reorders the current `processed` view, so it refines the
//! last search instead of starting over from the whole catalog.
//!
//! Comments and ratings go straight to the record in `original`. Views share
//! the same records, so the feedback shows up everywhere at once.
//!
//! ## Locking
//! `processed` and the default sort key sit behind one lock, held for the
//! whole read-sort-replace of a search or sort so concurrent requests can't
//! lose each other's update. Feedback uses the per-record lock inside
//! [`MovieRecord`]. `original` never changes after construction and is read
//! without locking.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use tracing::{debug, info, warn};

use data_loader::{parser, Genre, MovieHandle, MovieId, MovieRecord, MovieSnapshot};
use pipeline::{apply_query, sort_records, Query, SortKey};

use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};

#[derive(Debug)]
struct ViewState {
    processed: Vec<MovieHandle>,
    default_sort: SortKey,
}

#[derive(Debug)]
pub struct CatalogService {
    original: Vec<MovieHandle>,
    view: RwLock<ViewState>,
}

impl CatalogService {
    /// Build a catalog over `records`. The processed view starts out equal
    /// to the original list.
    ///
    /// Ids are unique within a catalog: a record whose id was already seen
    /// is dropped with a warning and the first one is kept.
    pub fn new(records: Vec<MovieRecord>, default_sort: SortKey) -> Self {
        let mut seen = HashSet::with_capacity(records.len());
        let original: Vec<MovieHandle> = records
            .into_iter()
            .filter(|record| {
                let first = seen.insert(record.id());
                if !first {
                    warn!("Dropping duplicate movie {} ({})", record.id(), record.title());
                }
                first
            })
            .map(Arc::new)
            .collect();
        info!(
            "Catalog created with {} movies (default sort: {})",
            original.len(),
            default_sort
        );
        Self {
            view: RwLock::new(ViewState {
                processed: original.clone(),
                default_sort,
            }),
            original,
        }
    }

    /// Ingest the configured listing and build a catalog from it.
    ///
    /// Ingestion failures leave the catalog empty rather than failing.
    pub fn from_config(config: &CatalogConfig) -> Self {
        let records = parser::load_movies(&config.data_path, config.max_movies);
        Self::new(records, config.default_sort)
    }

    /// Filter the whole catalog, order the result by the default sort key,
    /// and make it the processed view.
    pub fn search(&self, query: &Query) -> Vec<MovieSnapshot> {
        self.run_search(query, None)
    }

    /// Like [`search`](Self::search), then reorder the result by `key`.
    ///
    /// Both sorts happen under the same guard, so the caller gets back its
    /// own matches even when other searches run at the same time.
    pub fn search_sorted(&self, query: &Query, key: SortKey) -> Vec<MovieSnapshot> {
        self.run_search(query, Some(key))
    }

    fn run_search(&self, query: &Query, then_by: Option<SortKey>) -> Vec<MovieSnapshot> {
        let start = Instant::now();
        let filtered = apply_query(self.original.clone(), query);

        let processed = {
            let mut view = self.view.write().unwrap_or_else(PoisonError::into_inner);
            let mut sorted = sort_records(&filtered, view.default_sort);
            if let Some(key) = then_by {
                sorted = sort_records(&sorted, key);
            }
            view.processed = sorted;
            view.processed.clone()
        };

        info!(
            "Search with {} criteria matched {}/{} movies in {:.2?}",
            query.len(),
            processed.len(),
            self.original.len(),
            start.elapsed()
        );
        snapshots(&processed)
    }

    /// Reorder the current processed view by `key`.
    pub fn sort(&self, key: SortKey) -> Vec<MovieSnapshot> {
        let processed = {
            let mut view = self.view.write().unwrap_or_else(PoisonError::into_inner);
            view.processed = sort_records(&view.processed, key);
            view.processed.clone()
        };
        info!("Sorted {} movies by {}", processed.len(), key);
        snapshots(&processed)
    }

    pub fn default_sort(&self) -> SortKey {
        self.view
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .default_sort
    }

    /// Change the key applied after every search. The current view is left
    /// as it is.
    pub fn set_default_sort(&self, key: SortKey) {
        self.view
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .default_sort = key;
        info!("Default sort set to {}", key);
    }

    /// Append a comment to a movie.
    pub fn update_comment(&self, id: MovieId, comment: impl Into<String>) -> Result<()> {
        let movie = self.find(id).ok_or(CatalogError::MovieNotFound { id })?;
        movie.add_comment(comment);
        debug!("Comment added to movie {}", id);
        Ok(())
    }

    /// Append a user rating to a movie.
    pub fn update_rating(&self, id: MovieId, rating: f64) -> Result<()> {
        let movie = self.find(id).ok_or(CatalogError::MovieNotFound { id })?;
        movie.add_rating(rating);
        debug!(
            "Rating {} added to movie {} (average now {:.2})",
            rating,
            id,
            movie.average_rating()
        );
        Ok(())
    }

    /// Snapshot of every ingested movie, in ingestion order.
    pub fn original(&self) -> Vec<MovieSnapshot> {
        snapshots(&self.original)
    }

    /// Snapshot of the current processed view.
    pub fn processed(&self) -> Vec<MovieSnapshot> {
        let processed = self
            .view
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .processed
            .clone();
        snapshots(&processed)
    }

    pub fn movie(&self, id: MovieId) -> Option<MovieSnapshot> {
        self.find(id).map(|movie| movie.snapshot())
    }

    /// Names accepted by the genre filter.
    pub fn genres(&self) -> Vec<&'static str> {
        Genre::ALL.iter().map(|genre| genre.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.original.len()
    }

    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    // Linear scan; catalogs are a few hundred movies
    fn find(&self, id: MovieId) -> Option<&MovieHandle> {
        self.original.iter().find(|movie| movie.id() == id)
    }
}

fn snapshots(records: &[MovieHandle]) -> Vec<MovieSnapshot> {
    records.iter().map(|record| record.snapshot()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::FilterCriterion;

    fn build_test_catalog() -> CatalogService {
        CatalogService::new(
            vec![
                MovieRecord::new(1, "Inception").with_year(2010).with_rating(8.8),
                MovieRecord::new(2, "The Dark Knight").with_year(2008).with_rating(9.0),
                MovieRecord::new(3, "Spirited Away").with_year(2001).with_rating(8.5),
            ],
            SortKey::RatingDesc,
        )
    }

    fn ids(movies: &[MovieSnapshot]) -> Vec<MovieId> {
        movies.iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_processed_starts_as_original() {
        let catalog = build_test_catalog();
        assert_eq!(ids(&catalog.processed()), vec![1, 2, 3]);
        assert_eq!(ids(&catalog.original()), vec![1, 2, 3]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_search_applies_default_sort() {
        let catalog = build_test_catalog();
        let result = catalog.search(&Query::new());
        assert_eq!(ids(&result), vec![2, 1, 3]);
        assert_eq!(ids(&catalog.processed()), vec![2, 1, 3]);
        // The original order is never touched
        assert_eq!(ids(&catalog.original()), vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_composes_on_last_search() {
        let catalog = build_test_catalog();
        let query = Query::new().with(FilterCriterion::YearRange(2005, 2015)).unwrap();
        catalog.search(&query);

        let sorted = catalog.sort(SortKey::TitleAsc);
        assert_eq!(ids(&sorted), vec![1, 2]);
    }

    #[test]
    fn test_default_sort_is_settable() {
        let catalog = build_test_catalog();
        catalog.set_default_sort(SortKey::YearAsc);
        assert_eq!(catalog.default_sort(), SortKey::YearAsc);
        // Not applied until the next search
        assert_eq!(ids(&catalog.processed()), vec![1, 2, 3]);
        assert_eq!(ids(&catalog.search(&Query::new())), vec![3, 2, 1]);
    }

    #[test]
    fn test_feedback_is_visible_from_every_view() {
        let catalog = build_test_catalog();
        catalog.search(&Query::new().with(FilterCriterion::Year(2010)).unwrap());

        catalog.update_rating(1, 4.0).unwrap();
        catalog.update_rating(1, 5.0).unwrap();
        catalog.update_comment(1, "Dreams within dreams").unwrap();

        let processed = catalog.processed();
        assert_eq!(processed[0].in_app_rating, 4.5);
        assert_eq!(processed[0].comments, vec!["Dreams within dreams".to_string()]);

        let original = catalog.movie(1).unwrap();
        assert_eq!(original.user_ratings, vec![4.0, 5.0]);
    }

    #[test]
    fn test_unknown_movie_is_reported_and_changes_nothing() {
        let catalog = build_test_catalog();
        let before = catalog.original();

        let result = catalog.update_comment(999, "x");
        assert!(matches!(result, Err(CatalogError::MovieNotFound { id: 999 })));
        let result = catalog.update_rating(999, 3.0);
        assert!(matches!(result, Err(CatalogError::MovieNotFound { id: 999 })));

        assert_eq!(catalog.original(), before);
    }

    #[test]
    fn test_duplicate_ids_keep_the_first_record() {
        let catalog = CatalogService::new(
            vec![
                MovieRecord::new(1, "Heat").with_rating(8.0),
                MovieRecord::new(2, "Ronin"),
                MovieRecord::new(1, "Heat again").with_rating(2.0),
            ],
            SortKey::TitleAsc,
        );
        assert_eq!(catalog.len(), 2);
        assert_eq!(ids(&catalog.original()), vec![1, 2]);

        catalog.update_rating(1, 4.0).unwrap();
        let query = Query::new().with(FilterCriterion::MinInAppRating(4.0)).unwrap();
        let matches = catalog.search(&query);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "Heat");
        assert_eq!(matches[0].user_ratings, vec![4.0]);
    }

    #[test]
    fn test_search_sorted_applies_both_keys() {
        let catalog = build_test_catalog();
        let query = Query::new().with(FilterCriterion::YearRange(2005, 2015)).unwrap();
        let result = catalog.search_sorted(&query, SortKey::TitleAsc);
        assert_eq!(ids(&result), vec![1, 2]);
        assert_eq!(ids(&catalog.processed()), vec![1, 2]);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = CatalogService::new(Vec::new(), SortKey::TitleAsc);
        assert!(catalog.is_empty());
        assert!(catalog.search(&Query::new()).is_empty());
        assert!(catalog.sort(SortKey::YearDesc).is_empty());
        assert!(catalog.movie(1).is_none());
    }

    #[test]
    fn test_from_config_with_missing_file() {
        let config = CatalogConfig {
            data_path: "no/such/listing.json".into(),
            ..CatalogConfig::default()
        };
        let catalog = CatalogService::from_config(&config);
        assert!(catalog.is_empty());
        assert_eq!(catalog.default_sort(), config.default_sort);
    }
}
