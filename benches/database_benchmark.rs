use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use covindex::core::database::Database;
use covindex::query::types::{GrowthWindow, Query, QueryLineage, SearchOpts, SortProperty};
use covindex::search::executor;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

const DATES: [&str; 4] = ["2021-03-01", "2021-03-02", "2021-03-03", "2021-03-04"];
const CLADES: [&str; 6] = ["B.", "B.1.", "B.1.1.", "B.1.1.7.", "B.1.617.2.", "AY.4."];
const GENES: [&str; 4] = ["S", "N", "ORF1ab", "ORF8"];

/// Helper to build a store of random records
fn create_database(records: usize) -> Database {
    let mut rng = StdRng::seed_from_u64(42);
    let mut builder = Database::builder(":");
    for _ in 0..records {
        let mutations: Vec<String> = (0..rng.gen_range(0..6))
            .map(|_| format!("{}:{}", GENES[rng.gen_range(0..GENES.len())], rng.gen_range(0..400)))
            .collect();
        builder
            .add_record(
                &format!("E0700{:04}", rng.gen_range(0..300)),
                DATES[rng.gen_range(0..DATES.len())],
                CLADES[rng.gen_range(0..CLADES.len())],
                &mutations,
                rng.gen_range(1..50),
            )
            .unwrap();
    }
    builder.finish()
}

fn rollup_query() -> Query {
    Query {
        lineages: vec![
            QueryLineage::new("B.1.1.7", "B.1.1.7."),
            QueryLineage::new("B.1", "B.1."),
            QueryLineage::new("B", "B."),
        ],
        ..Query::default()
    }
}

/// Benchmark the single-pass reducers
fn bench_reducers(c: &mut Criterion) {
    let db = create_database(100_000);
    let query = rollup_query();

    let mut group = c.benchmark_group("reducers");
    group.bench_function("frequency", |b| {
        b.iter(|| black_box(executor::frequency(&db, &query)))
    });
    group.bench_function("spatiotemporal", |b| {
        b.iter(|| black_box(executor::spatiotemporal(&db, &query)))
    });
    group.bench_function("totals", |b| {
        b.iter(|| black_box(executor::totals(&db, &query, 5)))
    });
    group.bench_function("lineages", |b| {
        b.iter(|| black_box(executor::lineages(&db, &Query::default())))
    });
    group.finish();
}

/// Benchmark mutation search across shard counts
fn bench_search_mutations(c: &mut Criterion) {
    let db = create_database(100_000);
    let query = rollup_query();

    let mut group = c.benchmark_group("search_mutations");
    group.sample_size(20);
    for parallelism in [1, 2, 4, 8] {
        let opts = SearchOpts {
            lineage: "B.1".to_string(),
            sort_property: SortProperty::Change,
            growth: GrowthWindow::new(DATES[0], DATES[3]),
            parallelism,
            ..SearchOpts::default()
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(parallelism),
            &opts,
            |b, opts| {
                b.iter(|| black_box(executor::search_mutations(&db, &query, opts)))
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_reducers, bench_search_mutations);
criterion_main!(benches);
