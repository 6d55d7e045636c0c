//! Filters on the release year.
//!
//! Unknown years are stored as 0, so they only match a query that asks for
//! year 0 explicitly.

use crate::traits::Filter;
use data_loader::MovieRecord;

/// Keeps records released in exactly one year.
pub struct YearFilter {
    year: u32,
}

impl YearFilter {
    pub fn new(year: u32) -> Self {
        Self { year }
    }
}

impl Filter for YearFilter {
    fn name(&self) -> &str {
        "YearFilter"
    }

    fn matches(&self, record: &MovieRecord) -> bool {
        record.year() == self.year
    }
}

/// Keeps records released within `start..=end`.
pub struct YearRangeFilter {
    start: u32,
    end: u32,
}

impl YearRangeFilter {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

impl Filter for YearRangeFilter {
    fn name(&self) -> &str {
        "YearRangeFilter"
    }

    fn matches(&self, record: &MovieRecord) -> bool {
        (self.start..=self.end).contains(&record.year())
    }
}
