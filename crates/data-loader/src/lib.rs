//! # Data Loader Crate
//!
//! This crate owns the movie records the catalog is built from.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieRecord, Genre, MovieSnapshot)
//! - **parser**: Ingest TMDB-shaped JSON listings into records
//! - **error**: Error types for ingestion
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{parser, MovieRecord};
//! use std::path::Path;
//!
//! let movies = parser::load_movies(Path::new("data/movies.json"), parser::MAX_MOVIES);
//!
//! let movie = &movies[0];
//! movie.add_rating(4.0);
//! movie.add_comment("Loved the soundtrack");
//! println!("{} averages {:.1}", movie.title(), movie.average_rating());
//! ```

pub mod error;
pub mod types;
pub mod parser;

pub use error::{DataLoadError, Result};
pub use types::{
    Genre,
    MovieHandle,
    MovieId,
    MovieRecord,
    MovieSnapshot,
    NO_OVERVIEW,
    UNKNOWN_TITLE,
};
