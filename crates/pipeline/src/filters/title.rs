//! Filters on the movie title.

use crate::traits::{contains_ci, normalize, Filter};
use data_loader::MovieRecord;

/// Keeps records whose title contains a keyword (case-insensitive).
pub struct TitleKeywordFilter {
    keyword: String,
}

impl TitleKeywordFilter {
    pub fn new(keyword: &str) -> Self {
        Self {
            keyword: normalize(keyword),
        }
    }
}

impl Filter for TitleKeywordFilter {
    fn name(&self) -> &str {
        "TitleKeywordFilter"
    }

    fn matches(&self, record: &MovieRecord) -> bool {
        contains_ci(record.title(), &self.keyword)
    }
}

/// Keeps records whose whole title equals the value, ignoring case.
pub struct ExactTitleFilter {
    title: String,
}

impl ExactTitleFilter {
    pub fn new(title: &str) -> Self {
        Self {
            title: normalize(title),
        }
    }
}

impl Filter for ExactTitleFilter {
    fn name(&self) -> &str {
        "ExactTitleFilter"
    }

    fn matches(&self, record: &MovieRecord) -> bool {
        record.title().to_lowercase() == self.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::fixtures::{catalog, ids};

    #[test]
    fn test_title_keyword_filter() {
        let filtered = TitleKeywordFilter::new("dark").apply(catalog());
        assert_eq!(ids(&filtered), vec![2]);

        // Substring anywhere in the title, any case
        let filtered = TitleKeywordFilter::new("T").apply(catalog());
        assert_eq!(ids(&filtered), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_exact_title_filter() {
        let filtered = ExactTitleFilter::new("the dark knight").apply(catalog());
        assert_eq!(ids(&filtered), vec![2]);

        // Not a substring match
        let filtered = ExactTitleFilter::new("dark knight").apply(catalog());
        assert!(filtered.is_empty());
    }
}
