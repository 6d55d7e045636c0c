//! Filter on user-submitted comments.

use crate::traits::{contains_ci, normalize, Filter};
use data_loader::MovieRecord;

/// Keeps records where any comment contains the keyword.
pub struct CommentKeywordFilter {
    keyword: String,
}

impl CommentKeywordFilter {
    pub fn new(keyword: &str) -> Self {
        Self {
            keyword: normalize(keyword),
        }
    }
}

impl Filter for CommentKeywordFilter {
    fn name(&self) -> &str {
        "CommentKeywordFilter"
    }

    fn matches(&self, record: &MovieRecord) -> bool {
        record.any_comment(|comment| contains_ci(comment, &self.keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::fixtures::{catalog, ids};

    #[test]
    fn test_comment_keyword_filter() {
        let records = catalog();
        records[1].add_comment("Best JOKER ever");
        records[2].add_comment("beautiful animation");
        records[2].add_comment("the bathhouse scene!");

        let filtered = CommentKeywordFilter::new("joker").apply(records.clone());
        assert_eq!(ids(&filtered), vec![2]);

        let filtered = CommentKeywordFilter::new("bath").apply(records.clone());
        assert_eq!(ids(&filtered), vec![3]);

        let filtered = CommentKeywordFilter::new("boring").apply(records);
        assert!(filtered.is_empty());
    }
}
