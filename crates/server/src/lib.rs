//! Server crate for the movie catalog.
//!
//! This crate contains the catalog service that owns the movie records and
//! their query views, the configuration it is built from, the boundary layer
//! that validates requests before they reach the service, and export of the
//! current view as text, JSON or CSV.

pub mod boundary;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;

pub use boundary::CatalogBoundary;
pub use catalog::CatalogService;
pub use config::CatalogConfig;
pub use error::{CatalogError, Result};
pub use export::ExportFormat;
