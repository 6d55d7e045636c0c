//! Simple test harness for the catalog service.
//!
//! Loads a listing, runs a search, then fires concurrent ratings at the
//! top result from blocking tasks and checks that none were lost.
//!
//! Usage: `server [CONFIG_JSON]`

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use server::{CatalogBoundary, CatalogConfig, CatalogService};

const CONCURRENT_RATERS: usize = 32;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,pipeline=debug")),
        )
        .init();

    info!("Starting catalog test harness");

    let config = match std::env::args().nth(1) {
        Some(path) => CatalogConfig::from_file(Path::new(&path)).context("Failed to load config")?,
        None => CatalogConfig::default(),
    };

    info!("Loading catalog from {}...", config.data_path.display());
    let catalog = Arc::new(CatalogService::from_config(&config));
    let boundary = CatalogBoundary::new(catalog.clone(), &config);
    info!("Catalog loaded with {} movies", catalog.len());

    let results = boundary.search(&[("min_rating", "7.0")], None)?;
    info!("{} movies rated 7.0 or better:", results.len());
    for (i, movie) in results.iter().take(10).enumerate() {
        info!(
            "{}. {} ({}) - {:.1}",
            i + 1,
            movie.title,
            movie.year,
            movie.rating
        );
    }

    let Some(target) = results.first().map(|movie| movie.id) else {
        info!("Nothing to rate, done");
        return Ok(());
    };

    let mut handles = Vec::with_capacity(CONCURRENT_RATERS);
    for n in 0..CONCURRENT_RATERS {
        let boundary = boundary.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            boundary.rate(target, (n % 6) as f64)?;
            boundary.comment(target, Some(&format!("rater {} was here", n)))
        }));
    }
    for handle in handles {
        handle.await.context("Rating task panicked")??;
    }

    let movie = boundary.movie(target)?;
    info!(
        "Movie {} now has {} ratings (average {:.2}) and {} comments",
        movie.title,
        movie.user_ratings.len(),
        movie.in_app_rating,
        movie.comments.len()
    );
    anyhow::ensure!(
        movie.user_ratings.len() == CONCURRENT_RATERS,
        "lost ratings: expected {}, found {}",
        CONCURRENT_RATERS,
        movie.user_ratings.len()
    );

    Ok(())
}
