//! Query engine for the movie catalog: filtering and sorting.
//!
//! This crate provides:
//! - Typed filter criteria and the Query that groups them
//! - Filter trait and one implementation per criterion kind
//! - FilterPipeline for composing filters into an AND-chain
//! - A stable, key-driven sorter
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{apply_query, sort_records, FilterCriterion, Query, SortKey};
//!
//! let query = Query::new()
//!     .with(FilterCriterion::Director("nolan".into()))?
//!     .with(FilterCriterion::YearRange(2005, 2015))?;
//!
//! let filtered = apply_query(records, &query);
//! let sorted = sort_records(&filtered, SortKey::RatingDesc);
//! ```

pub mod criteria;
pub mod error;
pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod sorter;

// Re-export main types
pub use criteria::{FilterCriterion, FilterKind, Query};
pub use error::QueryError;
pub use traits::Filter;
pub use filter_pipeline::{apply_query, FilterPipeline};
pub use sorter::{sort_records, SortKey};
