//! Typed filter criteria and the queries built from them.
//!
//! A [`FilterCriterion`] carries its own strongly typed payload, so the
//! filter engine dispatches with an exhaustive match and never has to guess
//! what a payload is. Payload sanity (non-blank text, finite numbers, ordered
//! ranges) is checked when a criterion enters a [`Query`].

use crate::error::{QueryError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The kind of a criterion, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterKind {
    TitleKeyword,
    ExactTitle,
    Director,
    Actor,
    Genre,
    Year,
    YearRange,
    MinRating,
    MaxRating,
    CommentKeyword,
    MinInAppRating,
}

impl FilterKind {
    pub const ALL: [FilterKind; 11] = [
        FilterKind::TitleKeyword,
        FilterKind::ExactTitle,
        FilterKind::Director,
        FilterKind::Actor,
        FilterKind::Genre,
        FilterKind::Year,
        FilterKind::YearRange,
        FilterKind::MinRating,
        FilterKind::MaxRating,
        FilterKind::CommentKeyword,
        FilterKind::MinInAppRating,
    ];

    /// Token used at the query boundary.
    pub fn token(self) -> &'static str {
        match self {
            FilterKind::TitleKeyword => "title_keyword",
            FilterKind::ExactTitle => "exact_title",
            FilterKind::Director => "director",
            FilterKind::Actor => "actor",
            FilterKind::Genre => "genre",
            FilterKind::Year => "year",
            FilterKind::YearRange => "year_range",
            FilterKind::MinRating => "min_rating",
            FilterKind::MaxRating => "max_rating",
            FilterKind::CommentKeyword => "comment_keyword",
            FilterKind::MinInAppRating => "min_inapp_rating",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for FilterKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.token().eq_ignore_ascii_case(token))
            .ok_or_else(|| QueryError::UnknownFilter(s.to_string()))
    }
}

/// One filter predicate with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCriterion {
    /// Title contains the keyword
    TitleKeyword(String),
    /// Title equals the value (case-insensitive)
    ExactTitle(String),
    /// Any director contains the value
    Director(String),
    /// Any cast member contains the value
    Actor(String),
    /// Any genre name contains the value
    Genre(String),
    /// Release year equals the value
    Year(u32),
    /// Release year within `lo..=hi`
    YearRange(u32, u32),
    /// Critic rating at least the value
    MinRating(f64),
    /// Critic rating at most the value
    MaxRating(f64),
    /// Any user comment contains the value
    CommentKeyword(String),
    /// In-app (user) average at least the value
    MinInAppRating(f64),
}

impl FilterCriterion {
    pub fn kind(&self) -> FilterKind {
        match self {
            FilterCriterion::TitleKeyword(_) => FilterKind::TitleKeyword,
            FilterCriterion::ExactTitle(_) => FilterKind::ExactTitle,
            FilterCriterion::Director(_) => FilterKind::Director,
            FilterCriterion::Actor(_) => FilterKind::Actor,
            FilterCriterion::Genre(_) => FilterKind::Genre,
            FilterCriterion::Year(_) => FilterKind::Year,
            FilterCriterion::YearRange(_, _) => FilterKind::YearRange,
            FilterCriterion::MinRating(_) => FilterKind::MinRating,
            FilterCriterion::MaxRating(_) => FilterKind::MaxRating,
            FilterCriterion::CommentKeyword(_) => FilterKind::CommentKeyword,
            FilterCriterion::MinInAppRating(_) => FilterKind::MinInAppRating,
        }
    }

    /// Parse a raw boundary payload for `kind`.
    ///
    /// Year ranges are written `lo,hi` or `lo-hi`.
    pub fn parse(kind: FilterKind, raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let criterion = match kind {
            FilterKind::TitleKeyword => FilterCriterion::TitleKeyword(raw.to_string()),
            FilterKind::ExactTitle => FilterCriterion::ExactTitle(raw.to_string()),
            FilterKind::Director => FilterCriterion::Director(raw.to_string()),
            FilterKind::Actor => FilterCriterion::Actor(raw.to_string()),
            FilterKind::Genre => FilterCriterion::Genre(raw.to_string()),
            FilterKind::CommentKeyword => FilterCriterion::CommentKeyword(raw.to_string()),
            FilterKind::Year => FilterCriterion::Year(parse_year(kind, raw)?),
            FilterKind::YearRange => {
                let (lo, hi) = raw
                    .split_once(',')
                    .or_else(|| raw.split_once('-'))
                    .ok_or_else(|| malformed(kind, format!("expected 'lo,hi', got '{}'", raw)))?;
                FilterCriterion::YearRange(parse_year(kind, lo)?, parse_year(kind, hi)?)
            }
            FilterKind::MinRating => FilterCriterion::MinRating(parse_float(kind, raw)?),
            FilterKind::MaxRating => FilterCriterion::MaxRating(parse_float(kind, raw)?),
            FilterKind::MinInAppRating => FilterCriterion::MinInAppRating(parse_float(kind, raw)?),
        };
        criterion.validate()?;
        Ok(criterion)
    }

    /// Reject payloads no record could sensibly be matched against.
    pub fn validate(&self) -> Result<()> {
        let kind = self.kind();
        match self {
            FilterCriterion::TitleKeyword(text)
            | FilterCriterion::ExactTitle(text)
            | FilterCriterion::Director(text)
            | FilterCriterion::Actor(text)
            | FilterCriterion::Genre(text)
            | FilterCriterion::CommentKeyword(text) => {
                if text.trim().is_empty() {
                    return Err(malformed(kind, "value is blank".to_string()));
                }
            }
            FilterCriterion::Year(_) => {}
            FilterCriterion::YearRange(lo, hi) => {
                if lo > hi {
                    return Err(malformed(kind, format!("range {}..{} is inverted", lo, hi)));
                }
            }
            FilterCriterion::MinRating(value)
            | FilterCriterion::MaxRating(value)
            | FilterCriterion::MinInAppRating(value) => {
                if !value.is_finite() {
                    return Err(malformed(kind, format!("{} is not a number", value)));
                }
            }
        }
        Ok(())
    }
}

fn malformed(kind: FilterKind, reason: String) -> QueryError {
    QueryError::MalformedPayload { kind, reason }
}

fn parse_year(kind: FilterKind, raw: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .map_err(|_| malformed(kind, format!("'{}' is not a year", raw.trim())))
}

fn parse_float(kind: FilterKind, raw: &str) -> Result<f64> {
    raw.trim()
        .parse()
        .map_err(|_| malformed(kind, format!("'{}' is not a number", raw.trim())))
}

/// A set of criteria combined with AND, at most one per kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    criteria: BTreeMap<FilterKind, FilterCriterion>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a criterion, rejecting invalid payloads and repeated kinds.
    pub fn insert(&mut self, criterion: FilterCriterion) -> Result<()> {
        criterion.validate()?;
        let kind = criterion.kind();
        if self.criteria.contains_key(&kind) {
            return Err(QueryError::DuplicateFilter(kind));
        }
        self.criteria.insert(kind, criterion);
        Ok(())
    }

    /// Builder form of [`Query::insert`].
    pub fn with(mut self, criterion: FilterCriterion) -> Result<Self> {
        self.insert(criterion)?;
        Ok(self)
    }

    /// Build a query from boundary tokens, e.g. `[("genre", "drama")]`.
    pub fn from_tokens<K, V>(pairs: &[(K, V)]) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Query::new();
        for (token, raw) in pairs {
            let kind: FilterKind = token.as_ref().parse()?;
            query.insert(FilterCriterion::parse(kind, raw.as_ref())?)?;
        }
        Ok(query)
    }

    pub fn get(&self, kind: FilterKind) -> Option<&FilterCriterion> {
        self.criteria.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterCriterion> {
        self.criteria.values()
    }
}

impl FromIterator<FilterCriterion> for Query {
    /// Collect criteria into a query; a later criterion of the same kind
    /// replaces an earlier one. Use [`Query::insert`] to reject duplicates.
    fn from_iter<I: IntoIterator<Item = FilterCriterion>>(iter: I) -> Self {
        Self {
            criteria: iter.into_iter().map(|c| (c.kind(), c)).collect(),
        }
    }
}
