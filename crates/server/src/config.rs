//! Configuration for the catalog service.
//!
//! Every field has a default, so a config file only needs the fields it
//! changes:
//!
//! ```json
//! { "data_path": "data/movies.json", "default_sort": "year_desc" }
//! ```

use crate::error::{CatalogError, Result};
use pipeline::SortKey;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// TMDB listing to ingest at startup.
    pub data_path: PathBuf,
    /// Sort applied after every search.
    #[serde(deserialize_with = "deserialize_sort_key")]
    pub default_sort: SortKey,
    /// Earliest year accepted in year criteria.
    pub min_year: u32,
    /// Latest year accepted in year criteria.
    pub max_year: u32,
    /// Cap on how many movies one ingestion keeps.
    pub max_movies: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/movies.json"),
            default_sort: SortKey::RatingDesc,
            min_year: 1800,
            max_year: 2100,
            max_movies: data_loader::parser::MAX_MOVIES,
        }
    }
}

impl CatalogConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_error = |reason: String| CatalogError::Config {
            path: path.display().to_string(),
            reason,
        };

        let json = fs::read_to_string(path).map_err(|err| config_error(err.to_string()))?;
        let config: CatalogConfig =
            serde_json::from_str(&json).map_err(|err| config_error(err.to_string()))?;

        if config.min_year > config.max_year {
            return Err(config_error(format!(
                "min_year {} is after max_year {}",
                config.min_year, config.max_year
            )));
        }
        Ok(config)
    }
}

fn deserialize_sort_key<'de, D>(deserializer: D) -> std::result::Result<SortKey, D::Error>
where
    D: Deserializer<'de>,
{
    let token = String::deserialize(deserializer)?;
    token.parse().map_err(serde::de::Error::custom)
}
