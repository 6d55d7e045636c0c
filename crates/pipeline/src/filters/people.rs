//! Filters on the people credited on a movie.
//!
//! A record with no directors (or no cast) never matches the corresponding
//! filter.

use crate::traits::{contains_ci, normalize, Filter};
use data_loader::MovieRecord;

/// Keeps records where any director's name contains the value.
pub struct DirectorFilter {
    name: String,
}

impl DirectorFilter {
    pub fn new(name: &str) -> Self {
        Self {
            name: normalize(name),
        }
    }
}

impl Filter for DirectorFilter {
    fn name(&self) -> &str {
        "DirectorFilter"
    }

    fn matches(&self, record: &MovieRecord) -> bool {
        record
            .directors()
            .iter()
            .any(|director| contains_ci(director, &self.name))
    }
}

/// Keeps records where any cast member's name contains the value.
pub struct ActorFilter {
    name: String,
}

impl ActorFilter {
    pub fn new(name: &str) -> Self {
        Self {
            name: normalize(name),
        }
    }
}

impl Filter for ActorFilter {
    fn name(&self) -> &str {
        "ActorFilter"
    }

    fn matches(&self, record: &MovieRecord) -> bool {
        record
            .castings()
            .iter()
            .any(|actor| contains_ci(actor, &self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::fixtures::{catalog, ids};

    #[test]
    fn test_director_filter() {
        let filtered = DirectorFilter::new("NOLAN").apply(catalog());
        assert_eq!(ids(&filtered), vec![1, 2]);

        let filtered = DirectorFilter::new("miyazaki").apply(catalog());
        assert_eq!(ids(&filtered), vec![3]);
    }

    #[test]
    fn test_actor_filter() {
        let filtered = ActorFilter::new("ledger").apply(catalog());
        assert_eq!(ids(&filtered), vec![2]);

        // Matches any cast member, record 3 and 4 have no cast at all
        let filtered = ActorFilter::new("e").apply(catalog());
        assert_eq!(ids(&filtered), vec![1, 2]);
    }
}
