use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId, Throughput};
use covindex::core::config::Config;
use covindex::core::loader::load_csv;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

// Helper to render aggregated CSV rows
fn create_csv(rows: usize) -> String {
    let mut rng = StdRng::seed_from_u64(3);
    let clades = ["B.1", "B.1.1.7", "B.1.351", "P.1", "AY.4.2"];
    let mut csv = String::new();
    for _ in 0..rows {
        let clade = clades[rng.gen_range(0..clades.len())];
        let mutations: Vec<String> = (0..rng.gen_range(0..5))
            .map(|_| format!("S:{}", rng.gen_range(0..200)))
            .collect();
        csv.push_str(&format!(
            "E0800{:04},2021-0{}-1{},{},{},{},{}\n",
            rng.gen_range(0..300),
            rng.gen_range(1..10),
            rng.gen_range(0..10),
            clade,
            clade,
            mutations.join("|"),
            rng.gen_range(1..100),
        ));
    }
    csv
}

/// Benchmark loading rows into a frozen store
fn bench_load_csv(c: &mut Criterion) {
    let config = Config::default();

    let mut group = c.benchmark_group("load_csv");
    group.sample_size(10);
    for rows in [10_000, 100_000] {
        let csv = create_csv(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &csv, |b, csv| {
            b.iter(|| black_box(load_csv(csv.as_bytes(), &config).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_load_csv);
criterion_main!(benches);
