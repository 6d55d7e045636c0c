//! Export of movie lists as readable text, JSON or CSV.
//!
//! List fields (directors, genres, cast, comments) are joined with `"; "` in
//! CSV so each movie stays on one row.

use std::fmt;
use std::fmt::Write as _;
use std::io::Write;
use std::str::FromStr;

use data_loader::MovieSnapshot;

use crate::error::{CatalogError, Result};

const CSV_HEADER: [&str; 11] = [
    "Id",
    "Title",
    "Year",
    "Rating",
    "Overview",
    "Directors",
    "Genres",
    "Castings",
    "Comments",
    "InAppRating",
    "ImgUrl",
];

const LIST_SEPARATOR: &str = "-------------------";

/// Output format for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Human-readable blocks, one per movie
    #[default]
    Pretty,
    /// Pretty-printed JSON array of snapshots
    Json,
    /// One row per movie under a header row
    Csv,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] =
        [ExportFormat::Pretty, ExportFormat::Json, ExportFormat::Csv];

    pub fn token(self) -> &'static str {
        match self {
            ExportFormat::Pretty => "pretty",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ExportFormat {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        ExportFormat::ALL
            .into_iter()
            .find(|format| format.token().eq_ignore_ascii_case(token))
            .ok_or_else(|| CatalogError::UnknownExportFormat(s.to_string()))
    }
}

/// Write `movies` to `out` in `format`.
pub fn write_movies<W: Write>(
    movies: &[MovieSnapshot],
    format: ExportFormat,
    mut out: W,
) -> Result<()> {
    match format {
        ExportFormat::Pretty => out.write_all(format_movie_list(movies).as_bytes())?,
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut out, movies)?;
            out.write_all(b"\n")?;
        }
        ExportFormat::Csv => write_csv(movies, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn write_csv<W: Write>(movies: &[MovieSnapshot], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_HEADER)?;
    for movie in movies {
        writer.write_record([
            movie.id.to_string(),
            movie.title.clone(),
            movie.year.to_string(),
            format!("{:.1}", movie.rating),
            movie.overview.clone(),
            movie.directors.join("; "),
            genre_names(movie, "; "),
            movie.castings.join("; "),
            movie.comments.join("; "),
            format!("{:.1}", movie.in_app_rating),
            movie.img_url.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// One movie as a block of `Label: value` lines.
pub fn format_movie(movie: &MovieSnapshot) -> String {
    let mut text = String::new();
    // Writing into a String never fails
    let _ = writeln!(text, "Title: {}", movie.title);
    let _ = writeln!(text, "Id: {}", movie.id);
    let _ = writeln!(text, "Year: {}", movie.year);
    let _ = writeln!(text, "Rating: {:.1}", movie.rating);
    let _ = writeln!(text, "Overview: {}", movie.overview);
    let _ = writeln!(text, "Directors: {}", or_unknown(movie.directors.join(", ")));
    let _ = writeln!(text, "Genres: {}", or_unknown(genre_names(movie, ", ")));
    let _ = writeln!(text, "Cast: {}", or_unknown(movie.castings.join(", ")));
    if !movie.comments.is_empty() {
        let _ = writeln!(text, "Comments:");
        for comment in &movie.comments {
            let _ = writeln!(text, "  - {}", comment);
        }
    }
    let _ = writeln!(
        text,
        "App Rating: {:.1} ({} ratings)",
        movie.in_app_rating,
        movie.user_ratings.len()
    );
    if !movie.img_url.is_empty() {
        let _ = writeln!(text, "Poster: {}", movie.img_url);
    }
    text
}

/// Every movie's block, each followed by a separator line.
pub fn format_movie_list(movies: &[MovieSnapshot]) -> String {
    movies
        .iter()
        .map(|movie| format!("{}{}\n", format_movie(movie), LIST_SEPARATOR))
        .collect()
}

fn genre_names(movie: &MovieSnapshot, separator: &str) -> String {
    movie
        .genres
        .iter()
        .map(|genre| genre.name())
        .collect::<Vec<_>>()
        .join(separator)
}

fn or_unknown(joined: String) -> String {
    if joined.is_empty() {
        "Unknown".to_string()
    } else {
        joined
    }
}
