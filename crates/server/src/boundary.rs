//! Request handling in front of the catalog service.
//!
//! Front ends (the CLI today) speak in tokens and raw strings. This layer
//! turns them into typed queries, rejects anything invalid before the
//! service sees it, and never mutates state on a rejected request.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use data_loader::{MovieId, MovieSnapshot};
use pipeline::{FilterCriterion, Query, SortKey};

use crate::catalog::CatalogService;
use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::export::{self, ExportFormat};

/// Accepted range for user ratings
pub const MIN_USER_RATING: f64 = 0.0;
pub const MAX_USER_RATING: f64 = 5.0;

#[derive(Clone)]
pub struct CatalogBoundary {
    catalog: Arc<CatalogService>,
    min_year: u32,
    max_year: u32,
}

impl CatalogBoundary {
    pub fn new(catalog: Arc<CatalogService>, config: &CatalogConfig) -> Self {
        Self {
            catalog,
            min_year: config.min_year,
            max_year: config.max_year,
        }
    }

    pub fn catalog(&self) -> &Arc<CatalogService> {
        &self.catalog
    }

    /// Run a search from `(filter token, raw value)` pairs, optionally
    /// followed by a sort.
    ///
    /// Everything is validated up front, so a bad sort token doesn't leave
    /// a half-applied search behind.
    pub fn search<K, V>(
        &self,
        filters: &[(K, V)],
        sort: Option<&str>,
    ) -> Result<Vec<MovieSnapshot>>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let query =
            Query::from_tokens(filters).inspect_err(|err| warn!("Rejected search: {}", err))?;
        self.check_years(&query)?;
        let sort = sort.map(parse_sort).transpose()?;

        Ok(match sort {
            Some(key) => self.catalog.search_sorted(&query, key),
            None => self.catalog.search(&query),
        })
    }

    /// Reorder the current view.
    pub fn sort(&self, token: &str) -> Result<Vec<MovieSnapshot>> {
        let key = parse_sort(token)?;
        Ok(self.catalog.sort(key))
    }

    pub fn set_default_sort(&self, token: &str) -> Result<SortKey> {
        let key = parse_sort(token)?;
        self.catalog.set_default_sort(key);
        Ok(key)
    }

    /// Submit a comment. Absent or blank comments are rejected.
    pub fn comment(&self, id: MovieId, comment: Option<&str>) -> Result<()> {
        let comment = comment
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| {
                warn!("Rejected blank comment for movie {}", id);
                CatalogError::BlankComment
            })?;
        self.catalog.update_comment(id, comment)
    }

    /// Submit a rating on the 0-5 scale.
    pub fn rate(&self, id: MovieId, rating: f64) -> Result<()> {
        if !(MIN_USER_RATING..=MAX_USER_RATING).contains(&rating) {
            warn!("Rejected rating {} for movie {}", rating, id);
            return Err(CatalogError::RatingOutOfRange {
                value: rating,
                min: MIN_USER_RATING,
                max: MAX_USER_RATING,
            });
        }
        self.catalog.update_rating(id, rating)
    }

    pub fn movie(&self, id: MovieId) -> Result<MovieSnapshot> {
        self.catalog
            .movie(id)
            .ok_or(CatalogError::MovieNotFound { id })
    }

    pub fn genres(&self) -> Vec<&'static str> {
        self.catalog.genres()
    }

    /// The processed view rendered in `format`.
    ///
    /// The processed view starts out as the whole catalog, so this exports
    /// everything until the first search or sort.
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        let mut out = Vec::new();
        export::write_movies(&self.catalog.processed(), format, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Write the processed view to `path` in `format`.
    pub fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<()> {
        let movies = self.catalog.processed();
        let file = File::create(path)?;
        export::write_movies(&movies, format, BufWriter::new(file))?;
        info!(
            "Exported {} movies as {} to {}",
            movies.len(),
            format,
            path.display()
        );
        Ok(())
    }

    fn check_years(&self, query: &Query) -> Result<()> {
        let years: Vec<u32> = query
            .iter()
            .flat_map(|criterion| match criterion {
                FilterCriterion::Year(year) => vec![*year],
                FilterCriterion::YearRange(lo, hi) => vec![*lo, *hi],
                _ => Vec::new(),
            })
            .collect();

        match years
            .into_iter()
            .find(|year| !(self.min_year..=self.max_year).contains(year))
        {
            Some(year) => {
                warn!("Rejected search: year {} out of range", year);
                Err(CatalogError::YearOutOfRange {
                    year,
                    min: self.min_year,
                    max: self.max_year,
                })
            }
            None => Ok(()),
        }
    }
}

fn parse_sort(token: &str) -> Result<SortKey> {
    token.parse::<SortKey>().map_err(|err| {
        warn!("Rejected sort: {}", err);
        CatalogError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::MovieRecord;

    fn build_boundary() -> CatalogBoundary {
        let catalog = CatalogService::new(
            vec![
                MovieRecord::new(1, "Inception").with_year(2010).with_rating(8.8),
                MovieRecord::new(2, "The Dark Knight").with_year(2008).with_rating(9.0),
            ],
            SortKey::RatingDesc,
        );
        CatalogBoundary::new(Arc::new(catalog), &CatalogConfig::default())
    }

    fn ids(movies: &[MovieSnapshot]) -> Vec<MovieId> {
        movies.iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_search_with_tokens() {
        let boundary = build_boundary();
        let result = boundary.search(&[("title_keyword", "dark")], None).unwrap();
        assert_eq!(ids(&result), vec![2]);

        let result = boundary.search(&[("year_range", "2009,2011")], None).unwrap();
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn test_search_with_sort_token() {
        let boundary = build_boundary();
        let result = boundary
            .search::<&str, &str>(&[], Some("title_asc"))
            .unwrap();
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn test_rejected_search_leaves_view_alone() {
        let boundary = build_boundary();
        boundary.search(&[("year", "2008")], None).unwrap();

        let err = boundary.search(&[("mood", "happy")], None).unwrap_err();
        assert!(err.is_validation());

        let err = boundary.search(&[("year", "1492")], None).unwrap_err();
        assert!(matches!(err, CatalogError::YearOutOfRange { year: 1492, .. }));

        let err = boundary.search(&[("year", "2010")], Some("shuffle")).unwrap_err();
        assert!(err.is_validation());

        assert_eq!(ids(&boundary.catalog().processed()), vec![2]);
    }

    #[test]
    fn test_comment_validation() {
        let boundary = build_boundary();
        assert!(matches!(boundary.comment(1, None), Err(CatalogError::BlankComment)));
        assert!(matches!(boundary.comment(1, Some("  \t")), Err(CatalogError::BlankComment)));
        assert!(boundary.movie(1).unwrap().comments.is_empty());

        boundary.comment(1, Some("Great score")).unwrap();
        assert_eq!(boundary.movie(1).unwrap().comments, vec!["Great score".to_string()]);
    }

    #[test]
    fn test_rating_validation() {
        let boundary = build_boundary();
        for bad in [-0.1, 5.01, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                boundary.rate(1, bad),
                Err(CatalogError::RatingOutOfRange { .. })
            ));
        }
        assert!(boundary.movie(1).unwrap().user_ratings.is_empty());

        boundary.rate(1, 0.0).unwrap();
        boundary.rate(1, 5.0).unwrap();
        assert_eq!(boundary.movie(1).unwrap().in_app_rating, 2.5);
    }

    #[test]
    fn test_valid_feedback_for_unknown_movie() {
        let boundary = build_boundary();
        assert!(matches!(
            boundary.rate(42, 3.0),
            Err(CatalogError::MovieNotFound { id: 42 })
        ));
        assert!(matches!(
            boundary.movie(42),
            Err(CatalogError::MovieNotFound { id: 42 })
        ));
    }

    #[test]
    fn test_export_follows_processed_view() {
        let boundary = build_boundary();
        boundary.search(&[("title_keyword", "incep")], None).unwrap();

        let json = boundary.export(ExportFormat::Json).unwrap();
        let exported: Vec<MovieSnapshot> = serde_json::from_str(&json).unwrap();
        assert_eq!(ids(&exported), vec![1]);

        let text = boundary.export(ExportFormat::Pretty).unwrap();
        assert!(text.starts_with("Title: Inception\n"));
        assert!(!text.contains("The Dark Knight"));

        let csv = boundary.export(ExportFormat::Csv).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.lines().nth(1).unwrap().starts_with("1,Inception,2010,8.8,"));
    }

    #[test]
    fn test_export_to_file() {
        let boundary = build_boundary();
        let path = std::env::temp_dir()
            .join(format!("catalog-export-{}.csv", std::process::id()));
        boundary.export_to_file(&path, ExportFormat::Csv).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(written.starts_with("Id,Title,Year"));
        assert_eq!(written.lines().count(), 3);

        let err = boundary
            .export_to_file(Path::new("no/such/dir/export.json"), ExportFormat::Json)
            .unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[test]
    fn test_genres_lists_every_name() {
        let boundary = build_boundary();
        let genres = boundary.genres();
        assert_eq!(genres.len(), 19);
        assert!(genres.contains(&"SCIENCE_FICTION"));
    }
}
