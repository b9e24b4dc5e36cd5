//! Benchmarks for genre filtering
//!
//! Run with: cargo bench --package dataset-store
//!
//! Uses a synthetic dataset shaped like MovieLens-100k (943 users,
//! 1682 items, 19 genres) so no data files are needed.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dataset_store::{DatasetStore, Gender, GenreMapping};

const USERS: usize = 943;
const ITEMS: usize = 1682;
const GENRES: usize = 19;

fn build_synthetic_store() -> DatasetStore {
    let mapping = GenreMapping::from_pairs(
        (0..GENRES).map(|id| (format!("Genre{:02}", id), id)),
    )
    .expect("Failed to build genre mapping");

    let genders = (0..USERS)
        .map(|id| {
            if id % 3 == 0 {
                Gender::Female
            } else {
                Gender::Male
            }
        })
        .collect();

    // Each item carries one to three genres derived from its id
    let item_genres: Vec<Vec<usize>> = (0..ITEMS)
        .map(|id| {
            let mut genres = vec![id % GENRES];
            if id % 2 == 0 {
                genres.push((id / 2) % GENRES);
            }
            if id % 5 == 0 {
                genres.push((id / 5) % GENRES);
            }
            genres
        })
        .collect();

    // Roughly 100k interactions spread over the matrix
    let interactions: Vec<(usize, usize)> = (0..100_000)
        .map(|k| ((k * 7) % USERS, (k * 13) % ITEMS))
        .collect();

    DatasetStore::new(genders, mapping, item_genres, &interactions)
        .expect("Failed to build synthetic store")
}

fn bench_filter_inclusive(c: &mut Criterion) {
    let store = build_synthetic_store();
    let query = ["Genre00", "Genre05", "Genre11"];

    c.bench_function("filter_by_genre_inclusive", |b| {
        b.iter(|| {
            let subset = store.filter_by_genre(black_box(&query), false).unwrap();
            black_box(subset)
        })
    });
}

fn bench_filter_exclusive(c: &mut Criterion) {
    let store = build_synthetic_store();
    let query = ["Genre00", "Genre05", "Genre11"];

    c.bench_function("filter_by_genre_exclusive", |b| {
        b.iter(|| {
            let subset = store.filter_by_genre(black_box(&query), true).unwrap();
            black_box(subset)
        })
    });
}

criterion_group!(benches, bench_filter_inclusive, bench_filter_exclusive);
criterion_main!(benches);
