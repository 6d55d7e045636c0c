//! Filter implementations for the catalog pipeline.
//!
//! One filter per criterion kind. They are composed into a FilterPipeline,
//! usually via `FilterPipeline::from_query`.

pub mod comment;
pub mod genre;
pub mod people;
pub mod rating;
pub mod title;
pub mod year;

// Re-export for convenience
pub use comment::CommentKeywordFilter;
pub use genre::GenreFilter;
pub use people::{ActorFilter, DirectorFilter};
pub use rating::{MaxRatingFilter, MinInAppRatingFilter, MinRatingFilter};
pub use title::{ExactTitleFilter, TitleKeywordFilter};
pub use year::{YearFilter, YearRangeFilter};

#[cfg(test)]
pub(crate) mod fixtures {
    use data_loader::{Genre, MovieHandle, MovieRecord};
    use std::sync::Arc;

    /// Small catalog shared by the filter tests.
    pub fn catalog() -> Vec<MovieHandle> {
        vec![
            Arc::new(
                MovieRecord::new(1, "Inception")
                    .with_year(2010)
                    .with_rating(8.8)
                    .with_directors(vec!["Christopher Nolan".to_string()])
                    .with_castings(vec!["Leonardo DiCaprio".to_string(), "Elliot Page".to_string()])
                    .with_genres(vec![Genre::Action, Genre::ScienceFiction]),
            ),
            Arc::new(
                MovieRecord::new(2, "The Dark Knight")
                    .with_year(2008)
                    .with_rating(9.0)
                    .with_directors(vec!["Christopher Nolan".to_string()])
                    .with_castings(vec!["Christian Bale".to_string(), "Heath Ledger".to_string()])
                    .with_genres(vec![Genre::Action, Genre::Crime, Genre::Drama]),
            ),
            Arc::new(
                MovieRecord::new(3, "Spirited Away")
                    .with_year(2001)
                    .with_rating(8.5)
                    .with_directors(vec!["Hayao Miyazaki".to_string()])
                    .with_genres(vec![Genre::Animation, Genre::Family, Genre::Fantasy]),
            ),
            // Nothing known beyond the title
            Arc::new(MovieRecord::new(4, "Untitled Project")),
        ]
    }

    pub fn ids(records: &[MovieHandle]) -> Vec<u32> {
        records.iter().map(|r| r.id()).collect()
    }
}
