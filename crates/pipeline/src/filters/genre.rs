//! Filter to keep only movies in a genre.

use crate::traits::{contains_ci, normalize, Filter};
use data_loader::MovieRecord;

/// Keeps records where any genre's external name contains the value.
///
/// Matching on the name rather than the enum lets `"fiction"` find
/// `SCIENCE_FICTION`.
pub struct GenreFilter {
    genre: String,
}

impl GenreFilter {
    pub fn new(genre: &str) -> Self {
        Self {
            genre: normalize(genre),
        }
    }
}

impl Filter for GenreFilter {
    fn name(&self) -> &str {
        "GenreFilter"
    }

    fn matches(&self, record: &MovieRecord) -> bool {
        record
            .genres()
            .iter()
            .any(|genre| contains_ci(genre.name(), &self.genre))
    }
}
