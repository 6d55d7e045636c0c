//! Parser for TMDB-shaped movie listings.
//!
//! Accepts either a bare JSON array of movie summaries or the paged object
//! TMDB returns (`{"page": 1, "results": [...]}`). Each summary may carry an
//! inline `credits` object with the `crew` and `cast` lists; directors are the
//! crew members whose job is `Director`.
//!
//! ```json
//! {
//!   "id": 27205,
//!   "title": "Inception",
//!   "release_date": "2010-07-15",
//!   "genre_ids": [28, 878],
//!   "vote_average": 8.4,
//!   "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg",
//!   "credits": {
//!     "crew": [{ "job": "Director", "name": "Christopher Nolan" }],
//!     "cast": [{ "name": "Leonardo DiCaprio" }]
//!   }
//! }
//! ```

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Root URL prepended to TMDB poster paths
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Upper bound on how many movies one ingestion keeps
pub const MAX_MOVIES: usize = 200;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing {
    Bare(Vec<serde_json::Value>),
    Paged { results: Vec<serde_json::Value> },
}

#[derive(Debug, Deserialize)]
struct MovieSummary {
    id: i64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    genre_ids: Vec<i64>,
    #[serde(default)]
    vote_average: Option<f64>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    credits: Option<Credits>,
}

#[derive(Debug, Default, Deserialize)]
struct Credits {
    #[serde(default)]
    crew: Vec<CrewMember>,
    #[serde(default)]
    cast: Vec<CastMember>,
}

#[derive(Debug, Deserialize)]
struct CrewMember {
    #[serde(default)]
    job: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct CastMember {
    name: String,
}

/// Parse a TMDB listing into records, keeping at most `limit` of them.
///
/// Only a listing that isn't JSON, or isn't a list of entries, is an error.
/// Entries that can't be read and repeats of an id already seen are skipped
/// with a warning.
pub fn parse_movies_limited(json: &str, limit: usize) -> Result<Vec<MovieRecord>> {
    let entries = match serde_json::from_str::<Listing>(json)? {
        Listing::Bare(entries) => entries,
        Listing::Paged { results } => results,
    };

    let mut seen = HashSet::new();
    let mut movies = Vec::with_capacity(entries.len().min(limit));
    for (index, entry) in entries.into_iter().enumerate() {
        if movies.len() == limit {
            break;
        }
        let parsed = serde_json::from_value::<MovieSummary>(entry)
            .map_err(DataLoadError::from)
            .and_then(into_record);
        match parsed {
            Ok(movie) if seen.insert(movie.id()) => movies.push(movie),
            Ok(movie) => {
                tracing::warn!("Skipping entry {}: duplicate movie id {}", index, movie.id())
            }
            Err(err) => tracing::warn!("Skipping entry {}: {}", index, err),
        }
    }
    Ok(movies)
}

/// Parse a TMDB listing into records, keeping at most [`MAX_MOVIES`].
pub fn parse_movies(json: &str) -> Result<Vec<MovieRecord>> {
    parse_movies_limited(json, MAX_MOVIES)
}

/// Read and parse a listing file, propagating every failure.
pub fn read_movies(path: &Path, limit: usize) -> Result<Vec<MovieRecord>> {
    let json = fs::read_to_string(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(err),
    })?;
    parse_movies_limited(&json, limit)
}

/// Load a listing file for the catalog.
///
/// Upstream failures never reach the catalog: they are logged and an empty
/// list is returned, so the service simply starts with no movies.
pub fn load_movies(path: &Path, limit: usize) -> Vec<MovieRecord> {
    match read_movies(path, limit) {
        Ok(movies) => {
            tracing::info!("Ingested {} movies from {}", movies.len(), path.display());
            movies
        }
        Err(err) => {
            tracing::error!("Failed to ingest movies from {}: {}", path.display(), err);
            Vec::new()
        }
    }
}

fn into_record(summary: MovieSummary) -> Result<MovieRecord> {
    let id = MovieId::try_from(summary.id).map_err(|_| DataLoadError::InvalidValue {
        field: "id".to_string(),
        value: summary.id.to_string(),
    })?;

    let genres = summary
        .genre_ids
        .iter()
        .filter_map(|&code| Genre::from_code(code))
        .collect();

    let credits = summary.credits.unwrap_or_default();
    let directors = credits
        .crew
        .into_iter()
        .filter(|member| member.job == "Director")
        .map(|member| member.name)
        .collect();
    let castings = credits.cast.into_iter().map(|member| member.name).collect();

    let img_url = summary
        .poster_path
        .filter(|path| !path.trim().is_empty())
        .map(|path| format!("{}{}", IMAGE_BASE_URL, path))
        .unwrap_or_default();

    let mut record = MovieRecord::new(id, summary.title.unwrap_or_default())
        .with_directors(directors)
        .with_genres(genres)
        .with_castings(castings)
        .with_img_url(img_url)
        .with_overview(summary.overview.unwrap_or_default());

    if let Some(year) = summary.release_date.as_deref().and_then(parse_release_year) {
        record = record.with_year(year);
    }
    if let Some(rating) = summary.vote_average {
        record = record.with_rating(rating);
    }

    Ok(record)
}

/// Extract the year from a `YYYY-MM-DD` release date.
fn parse_release_year(date: &str) -> Option<u32> {
    date.trim().split('-').next()?.parse().ok()
}
