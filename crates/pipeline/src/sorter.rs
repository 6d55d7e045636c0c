//! Sorting of movie records.
//!
//! Eight keys: title, year, critic rating and in-app rating, each ascending
//! or descending. Sorting is stable, so records that tie on the key keep
//! their input order; descending keys compare reversed operands rather than
//! reversing the output, which would flip ties.
//!
//! Key values are read once per record at the start of a pass and the
//! decorated list is sorted. A user rating landing mid-sort therefore can't
//! give the comparator two different answers for the same record.

use crate::error::QueryError;
use data_loader::{MovieHandle, MovieRecord};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sort order for a list of movies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    TitleAsc,
    TitleDesc,
    YearAsc,
    YearDesc,
    RatingAsc,
    RatingDesc,
    InAppRatingAsc,
    InAppRatingDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::TitleAsc,
        SortKey::TitleDesc,
        SortKey::YearAsc,
        SortKey::YearDesc,
        SortKey::RatingAsc,
        SortKey::RatingDesc,
        SortKey::InAppRatingAsc,
        SortKey::InAppRatingDesc,
    ];

    /// Token used at the query boundary.
    pub fn token(self) -> &'static str {
        match self {
            SortKey::TitleAsc => "title_asc",
            SortKey::TitleDesc => "title_desc",
            SortKey::YearAsc => "year_asc",
            SortKey::YearDesc => "year_desc",
            SortKey::RatingAsc => "rating_asc",
            SortKey::RatingDesc => "rating_desc",
            SortKey::InAppRatingAsc => "inapp_rating_asc",
            SortKey::InAppRatingDesc => "inapp_rating_desc",
        }
    }

    pub fn is_descending(self) -> bool {
        matches!(
            self,
            SortKey::TitleDesc | SortKey::YearDesc | SortKey::RatingDesc | SortKey::InAppRatingDesc
        )
    }
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::RatingDesc
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for SortKey {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        SortKey::ALL
            .into_iter()
            .find(|key| key.token().eq_ignore_ascii_case(token))
            .ok_or_else(|| QueryError::UnknownSortKey(s.to_string()))
    }
}

/// Return a new list of `records` ordered by `key`. The input is untouched.
pub fn sort_records(records: &[MovieHandle], key: SortKey) -> Vec<MovieHandle> {
    if records.is_empty() {
        return Vec::new();
    }

    let descending = key.is_descending();
    let sorted = match key {
        SortKey::TitleAsc | SortKey::TitleDesc => {
            sort_sampled(records, descending, |r| r.title().to_string(), String::cmp)
        }
        SortKey::YearAsc | SortKey::YearDesc => {
            sort_sampled(records, descending, MovieRecord::year, u32::cmp)
        }
        SortKey::RatingAsc | SortKey::RatingDesc => {
            sort_sampled(records, descending, MovieRecord::rating, f64::total_cmp)
        }
        SortKey::InAppRatingAsc | SortKey::InAppRatingDesc => {
            sort_sampled(records, descending, MovieRecord::average_rating, f64::total_cmp)
        }
    };

    tracing::debug!("Sorted {} records by {}", sorted.len(), key);
    sorted
}

/// Decorate each record with `sample`, stable-sort on `compare`, undecorate.
fn sort_sampled<T, S, C>(
    records: &[MovieHandle],
    descending: bool,
    sample: S,
    compare: C,
) -> Vec<MovieHandle>
where
    T: Send,
    S: Fn(&MovieRecord) -> T,
    C: Fn(&T, &T) -> Ordering + Sync,
{
    let mut decorated: Vec<(T, MovieHandle)> = records
        .iter()
        .map(|record| (sample(record), record.clone()))
        .collect();

    // par_sort_by is a stable merge sort
    if descending {
        decorated.par_sort_by(|a, b| compare(&b.0, &a.0));
    } else {
        decorated.par_sort_by(|a, b| compare(&a.0, &b.0));
    }

    decorated.into_iter().map(|(_, record)| record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::fixtures::{catalog, ids};
    use data_loader::MovieRecord;
    use std::sync::Arc;

    #[test]
    fn test_sort_key_tokens() {
        for key in SortKey::ALL {
            assert_eq!(key.token().parse::<SortKey>(), Ok(key));
        }
        assert_eq!("YEAR_DESC".parse(), Ok(SortKey::YearDesc));
        assert!("popularity".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_sort_by_each_key() {
        let records = catalog();
        assert_eq!(ids(&sort_records(&records, SortKey::TitleAsc)), vec![1, 3, 2, 4]);
        assert_eq!(ids(&sort_records(&records, SortKey::YearAsc)), vec![4, 3, 2, 1]);
        assert_eq!(ids(&sort_records(&records, SortKey::RatingDesc)), vec![2, 1, 3, 4]);
        assert_eq!(ids(&sort_records(&records, SortKey::TitleDesc)), vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_sort_by_in_app_rating() {
        let records = catalog();
        records[2].add_rating(5.0);
        records[0].add_rating(3.0);
        records[0].add_rating(4.0);

        let sorted = sort_records(&records, SortKey::InAppRatingDesc);
        // 5.0, 3.5, then the two unrated in input order
        assert_eq!(ids(&sorted), vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_title_order_is_byte_order() {
        let records: Vec<MovieHandle> = vec![
            Arc::new(MovieRecord::new(1, "alpha")),
            Arc::new(MovieRecord::new(2, "Beta")),
            Arc::new(MovieRecord::new(3, "Alpha")),
        ];
        assert_eq!(ids(&sort_records(&records, SortKey::TitleAsc)), vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let records: Vec<MovieHandle> = (1..=6)
            .map(|id| Arc::new(MovieRecord::new(id, "Same").with_year(2000 + id % 2)))
            .collect();

        let ascending = sort_records(&records, SortKey::YearAsc);
        assert_eq!(ids(&ascending), vec![2, 4, 6, 1, 3, 5]);

        let descending = sort_records(&records, SortKey::YearDesc);
        assert_eq!(ids(&descending), vec![1, 3, 5, 2, 4, 6]);
    }

    #[test]
    fn test_zero_ratings_tie_whatever_their_sign() {
        let records: Vec<MovieHandle> = vec![
            Arc::new(MovieRecord::new(1, "Plain zero").with_rating(0.0)),
            Arc::new(MovieRecord::new(2, "Signed zero").with_rating(-0.0)),
            Arc::new(MovieRecord::new(3, "Unrated")),
        ];
        assert_eq!(ids(&sort_records(&records, SortKey::RatingAsc)), vec![1, 2, 3]);
        assert_eq!(ids(&sort_records(&records, SortKey::RatingDesc)), vec![1, 2, 3]);

        records[1].add_rating(-0.0);
        records[0].add_rating(0.0);
        assert_eq!(ids(&sort_records(&records, SortKey::InAppRatingAsc)), vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_does_not_touch_input() {
        let records = catalog();
        let _ = sort_records(&records, SortKey::YearAsc);
        assert_eq!(ids(&records), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_sort_empty() {
        for key in SortKey::ALL {
            assert!(sort_records(&[], key).is_empty());
        }
    }
}
