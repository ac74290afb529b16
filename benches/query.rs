//! Query benchmarks over a synthetic catalog
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use hubindex::index::build::prepare_document;
use hubindex::index::{IndexWriter, License, SearchIndex};
use hubindex::query::{SearchFilters, SearchOptions, SortBy};
use serde_json::json;

const CATEGORIES: &[&str] = &["utility", "economy", "minigame", "magic", "adventure", "admin-tools"];
const WORDS: &[&str] = &["allay", "world", "edit", "bed", "wars", "spell", "coins", "homes", "guard", "chat"];

/// Serialize a catalog of `size` generated plugins
fn synthetic_artifact(size: usize) -> Vec<u8> {
    let mut writer = IndexWriter::new();
    for i in 0..size {
        let record = json!({
            "id": format!("owner{}/plugin{}", i % 97, i),
            "name": format!("{}{} {}", WORDS[i % WORDS.len()], i, WORDS[(i / 7) % WORDS.len()]),
            "owner": format!("owner{}", i % 97),
            "categories": [CATEGORIES[i % CATEGORIES.len()], CATEGORIES[(i / 3) % CATEGORIES.len()]],
            "license": if i % 4 == 0 { "ARR" } else { "MIT" },
            "api_version": format!("{}.{}.0", i % 3, i % 10),
            "downloads": (i * 7919) % 100_000,
            "stars": (i * 31) % 500,
            "created_at": 1_600_000_000 + i as u64 * 60,
            "updated_at": 1_700_000_000 + (i as u64 * 7) % 86_400,
        });
        let doc = prepare_document(i, &record).expect("generated record is valid");
        writer.add_document(doc);
    }
    writer.to_bytes().expect("serialize synthetic index")
}

fn bench_restore(c: &mut Criterion) {
    let mut group = c.benchmark_group("restore");
    for size in [1_000, 10_000] {
        let bytes = synthetic_artifact(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| SearchIndex::restore(black_box(bytes)))
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let index = SearchIndex::restore(&synthetic_artifact(10_000)).expect("restore synthetic index");

    let mut group = c.benchmark_group("search");

    group.bench_function("match_all_downloads", |b| {
        let options = SearchOptions::default().with_sort(SortBy::Downloads);
        b.iter(|| index.search(black_box(&options)))
    });

    group.bench_function("single_term", |b| {
        let options = SearchOptions::new("allay");
        b.iter(|| index.search(black_box(&options)))
    });

    group.bench_function("fuzzy_term", |b| {
        let options = SearchOptions::new("spelll guard");
        b.iter(|| index.search(black_box(&options)))
    });

    group.bench_function("filtered", |b| {
        let options = SearchOptions::default()
            .with_sort(SortBy::Updated)
            .with_filters(SearchFilters {
                categories: Some(vec!["magic".into(), "economy".into()]),
                license: Some(License::OpenSource),
                api_major: Some(1),
            });
        b.iter(|| index.search(black_box(&options)))
    });

    group.finish();
}

criterion_group!(benches, bench_restore, bench_search);
criterion_main!(benches);
