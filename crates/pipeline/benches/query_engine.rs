//! Benchmarks for filtering and sorting
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses a synthetic catalog a few times larger than a real ingestion.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Genre, MovieHandle, MovieRecord};
use pipeline::{apply_query, sort_records, FilterCriterion, Query, SortKey};
use std::sync::Arc;

const CATALOG_SIZE: u32 = 1_000;

fn build_catalog() -> Vec<MovieHandle> {
    (1..=CATALOG_SIZE)
        .map(|id| {
            let genre = Genre::ALL[id as usize % Genre::ALL.len()];
            let record = MovieRecord::new(id, format!("Movie {}", id))
                .with_year(1950 + id % 75)
                .with_rating(f64::from(id % 100) / 10.0)
                .with_directors(vec![format!("Director {}", id % 40)])
                .with_castings((0..5).map(|n| format!("Actor {}", (id + n) % 300)).collect())
                .with_genres(vec![genre]);
            for n in 0..(id % 4) {
                record.add_rating(f64::from(n + 1));
                record.add_comment(format!("comment {} on {}", n, id));
            }
            Arc::new(record)
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let catalog = build_catalog();
    let mut query = Query::new();
    query.insert(FilterCriterion::Actor("actor 1".to_string())).unwrap();
    query.insert(FilterCriterion::YearRange(1970, 2010)).unwrap();
    query.insert(FilterCriterion::MinInAppRating(1.5)).unwrap();

    c.bench_function("apply_query_three_criteria", |b| {
        b.iter(|| {
            let filtered = apply_query(black_box(catalog.clone()), black_box(&query));
            black_box(filtered)
        })
    });
}

fn bench_sort(c: &mut Criterion) {
    let catalog = build_catalog();

    c.bench_function("sort_title_asc", |b| {
        b.iter(|| black_box(sort_records(black_box(&catalog), SortKey::TitleAsc)))
    });

    c.bench_function("sort_inapp_rating_desc", |b| {
        b.iter(|| black_box(sort_records(black_box(&catalog), SortKey::InAppRatingDesc)))
    });
}

criterion_group!(benches, bench_filter, bench_sort);
criterion_main!(benches);
