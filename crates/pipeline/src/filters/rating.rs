//! Filters on critic and in-app ratings.
//!
//! `MinRatingFilter` and `MaxRatingFilter` look at the upstream critic
//! rating (0-10). `MinInAppRatingFilter` looks at the mean of user ratings
//! (0-5), read fresh for every record.

use crate::traits::Filter;
use data_loader::MovieRecord;

/// Keeps records with a critic rating of at least `min_rating`.
pub struct MinRatingFilter {
    min_rating: f64,
}

impl MinRatingFilter {
    pub fn new(min_rating: f64) -> Self {
        Self { min_rating }
    }
}

impl Filter for MinRatingFilter {
    fn name(&self) -> &str {
        "MinRatingFilter"
    }

    fn matches(&self, record: &MovieRecord) -> bool {
        record.rating() >= self.min_rating
    }
}

/// Keeps records with a critic rating of at most `max_rating`.
pub struct MaxRatingFilter {
    max_rating: f64,
}

impl MaxRatingFilter {
    pub fn new(max_rating: f64) -> Self {
        Self { max_rating }
    }
}

impl Filter for MaxRatingFilter {
    fn name(&self) -> &str {
        "MaxRatingFilter"
    }

    fn matches(&self, record: &MovieRecord) -> bool {
        record.rating() <= self.max_rating
    }
}

/// Keeps records whose in-app average is at least `min_rating`.
///
/// Movies nobody rated average 0.0.
pub struct MinInAppRatingFilter {
    min_rating: f64,
}

impl MinInAppRatingFilter {
    pub fn new(min_rating: f64) -> Self {
        Self { min_rating }
    }
}

impl Filter for MinInAppRatingFilter {
    fn name(&self) -> &str {
        "MinInAppRatingFilter"
    }

    fn matches(&self, record: &MovieRecord) -> bool {
        record.average_rating() >= self.min_rating
    }
}
