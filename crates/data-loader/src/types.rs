//! Core domain types for the movie catalog.
//!
//! A [`MovieRecord`] is built once at ingestion time and then shared
//! (`Arc<MovieRecord>`) between the catalog views. Its descriptive fields are
//! immutable after construction; the user feedback (comments and in-app
//! ratings) sits behind a per-record lock so that concurrent submissions for
//! different movies never contend with each other.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie (the upstream TMDB id)
pub type MovieId = u32;

/// Shared handle to a record. Catalog views hold these, never copies.
pub type MovieHandle = Arc<MovieRecord>;

/// Title used when the upstream title is blank
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Overview used when the upstream overview is blank
pub const NO_OVERVIEW: &str = "No Overview";

/// Years at or below this are treated as unknown and stored as 0
pub const MIN_KNOWN_YEAR: u32 = 1800;

/// Upper bound of the critic rating scale
pub const MAX_CRITIC_RATING: f64 = 10.0;

// =============================================================================
// Genre
// =============================================================================

/// Movie genres as published by TMDB.
///
/// Each variant carries the stable numeric code TMDB uses in `genre_ids`.
/// The external name (used for filtering and serialization) is the
/// SCREAMING_SNAKE_CASE form, e.g. `SCIENCE_FICTION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Genre {
    Action,
    Adventure,
    Animation,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Family,
    Fantasy,
    History,
    Horror,
    Music,
    Mystery,
    Romance,
    ScienceFiction,
    TvMovie,
    Thriller,
    War,
    Western,
}

impl Genre {
    /// Every genre, in declaration order.
    pub const ALL: [Genre; 19] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Animation,
        Genre::Comedy,
        Genre::Crime,
        Genre::Documentary,
        Genre::Drama,
        Genre::Family,
        Genre::Fantasy,
        Genre::History,
        Genre::Horror,
        Genre::Music,
        Genre::Mystery,
        Genre::Romance,
        Genre::ScienceFiction,
        Genre::TvMovie,
        Genre::Thriller,
        Genre::War,
        Genre::Western,
    ];

    /// TMDB genre code.
    pub fn code(self) -> i64 {
        match self {
            Genre::Action => 28,
            Genre::Adventure => 12,
            Genre::Animation => 16,
            Genre::Comedy => 35,
            Genre::Crime => 80,
            Genre::Documentary => 99,
            Genre::Drama => 18,
            Genre::Family => 10751,
            Genre::Fantasy => 14,
            Genre::History => 36,
            Genre::Horror => 27,
            Genre::Music => 10402,
            Genre::Mystery => 9648,
            Genre::Romance => 10749,
            Genre::ScienceFiction => 878,
            Genre::TvMovie => 10770,
            Genre::Thriller => 53,
            Genre::War => 10752,
            Genre::Western => 37,
        }
    }

    /// External name of the genre.
    pub fn name(self) -> &'static str {
        match self {
            Genre::Action => "ACTION",
            Genre::Adventure => "ADVENTURE",
            Genre::Animation => "ANIMATION",
            Genre::Comedy => "COMEDY",
            Genre::Crime => "CRIME",
            Genre::Documentary => "DOCUMENTARY",
            Genre::Drama => "DRAMA",
            Genre::Family => "FAMILY",
            Genre::Fantasy => "FANTASY",
            Genre::History => "HISTORY",
            Genre::Horror => "HORROR",
            Genre::Music => "MUSIC",
            Genre::Mystery => "MYSTERY",
            Genre::Romance => "ROMANCE",
            Genre::ScienceFiction => "SCIENCE_FICTION",
            Genre::TvMovie => "TV_MOVIE",
            Genre::Thriller => "THRILLER",
            Genre::War => "WAR",
            Genre::Western => "WESTERN",
        }
    }

    /// Look up a genre by its TMDB code.
    pub fn from_code(code: i64) -> Option<Genre> {
        Genre::ALL.into_iter().find(|genre| genre.code() == code)
    }

    /// Look up a genre by its external name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Genre> {
        let name = name.trim();
        Genre::ALL
            .into_iter()
            .find(|genre| genre.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// User feedback
// =============================================================================

/// Append-only user contributions for one movie.
#[derive(Debug, Clone, Default)]
struct Feedback {
    comments: Vec<String>,
    user_ratings: Vec<f64>,
}

// =============================================================================
// MovieRecord
// =============================================================================

/// A movie in the catalog.
///
/// Built with [`MovieRecord::new`] plus the `with_*` methods, which apply the
/// same normalization as the upstream loader: blank text falls back to a
/// sentinel, years at or below 1800 mean "unknown" (0), and critic ratings
/// outside `[0, 10]` are ignored so the record keeps its previous value.
#[derive(Debug)]
pub struct MovieRecord {
    id: MovieId,
    title: String,
    directors: Vec<String>,
    year: u32,
    rating: f64,
    genres: Vec<Genre>,
    overview: String,
    castings: Vec<String>,
    img_url: String,
    feedback: RwLock<Feedback>,
}

impl MovieRecord {
    /// Create a record with every optional field at its default.
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id,
            title: if title.trim().is_empty() {
                UNKNOWN_TITLE.to_string()
            } else {
                title
            },
            directors: Vec::new(),
            year: 0,
            rating: 0.0,
            genres: Vec::new(),
            overview: NO_OVERVIEW.to_string(),
            castings: Vec::new(),
            img_url: String::new(),
            feedback: RwLock::new(Feedback::default()),
        }
    }

    /// Replace the title; blank titles are ignored.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        if !title.trim().is_empty() {
            self.title = title;
        }
        self
    }

    pub fn with_directors(mut self, directors: Vec<String>) -> Self {
        self.directors = directors;
        self
    }

    /// Set the release year; values at or below 1800 are ignored.
    pub fn with_year(mut self, year: u32) -> Self {
        if year > MIN_KNOWN_YEAR {
            self.year = year;
        }
        self
    }

    /// Set the critic rating; values outside `[0, 10]` (or NaN) are ignored.
    pub fn with_rating(mut self, rating: f64) -> Self {
        if (0.0..=MAX_CRITIC_RATING).contains(&rating) {
            self.rating = unsigned_zero(rating);
        }
        self
    }

    /// Set the genres. Duplicates are dropped, first occurrence wins.
    pub fn with_genres(mut self, genres: Vec<Genre>) -> Self {
        let mut unique = Vec::with_capacity(genres.len());
        for genre in genres {
            if !unique.contains(&genre) {
                unique.push(genre);
            }
        }
        self.genres = unique;
        self
    }

    /// Replace the overview; blank overviews are ignored.
    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        let overview = overview.into();
        if !overview.trim().is_empty() {
            self.overview = overview;
        }
        self
    }

    pub fn with_castings(mut self, castings: Vec<String>) -> Self {
        self.castings = castings;
        self
    }

    pub fn with_img_url(mut self, img_url: impl Into<String>) -> Self {
        self.img_url = img_url.into();
        self
    }

    // Getters

    pub fn id(&self) -> MovieId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn directors(&self) -> &[String] {
        &self.directors
    }

    /// Release year, 0 when unknown.
    pub fn year(&self) -> u32 {
        self.year
    }

    /// Critic (upstream) rating on a 0-10 scale.
    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    pub fn overview(&self) -> &str {
        &self.overview
    }

    pub fn castings(&self) -> &[String] {
        &self.castings
    }

    pub fn img_url(&self) -> &str {
        &self.img_url
    }

    // Feedback. Every guarded operation is a single push or a read, so a
    // poisoned lock still holds consistent data and is recovered.

    /// Append a user comment verbatim.
    pub fn add_comment(&self, comment: impl Into<String>) {
        self.feedback
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .comments
            .push(comment.into());
    }

    /// Append a user rating verbatim. Range checks belong to the caller.
    pub fn add_rating(&self, rating: f64) {
        self.feedback
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .user_ratings
            .push(unsigned_zero(rating));
    }

    /// Mean of the user ratings, or 0.0 when there are none.
    ///
    /// Recomputed on every call; there is no cached average to go stale.
    pub fn average_rating(&self) -> f64 {
        let feedback = self.feedback.read().unwrap_or_else(PoisonError::into_inner);
        mean(&feedback.user_ratings)
    }

    pub fn rating_count(&self) -> usize {
        self.feedback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user_ratings
            .len()
    }

    pub fn comments(&self) -> Vec<String> {
        self.feedback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .comments
            .clone()
    }

    pub fn user_ratings(&self) -> Vec<f64> {
        self.feedback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user_ratings
            .clone()
    }

    /// True if any comment satisfies `predicate`. Avoids cloning the list.
    pub fn any_comment(&self, predicate: impl Fn(&str) -> bool) -> bool {
        self.feedback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .comments
            .iter()
            .any(|comment| predicate(comment))
    }

    /// Owned copy of the record, feedback included, taken under one read lock.
    pub fn snapshot(&self) -> MovieSnapshot {
        let feedback = self
            .feedback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        MovieSnapshot {
            id: self.id,
            title: self.title.clone(),
            directors: self.directors.clone(),
            year: self.year,
            rating: self.rating,
            genres: self.genres.clone(),
            overview: self.overview.clone(),
            castings: self.castings.clone(),
            img_url: self.img_url.clone(),
            in_app_rating: mean(&feedback.user_ratings),
            comments: feedback.comments,
            user_ratings: feedback.user_ratings,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

// -0.0 would sort before 0.0 under total_cmp
fn unsigned_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

// =============================================================================
// MovieSnapshot
// =============================================================================

/// Immutable, owned view of a [`MovieRecord`] handed to callers.
///
/// Mutating a snapshot never touches the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSnapshot {
    pub id: MovieId,
    pub title: String,
    pub directors: Vec<String>,
    pub year: u32,
    pub rating: f64,
    pub genres: Vec<Genre>,
    pub overview: String,
    pub castings: Vec<String>,
    pub img_url: String,
    pub comments: Vec<String>,
    pub user_ratings: Vec<f64>,
    /// Mean of `user_ratings` at the time the snapshot was taken
    pub in_app_rating: f64,
}
