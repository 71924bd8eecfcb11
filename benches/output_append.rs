use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use source_atlas::output::{OutputAggregator, OutputLayout};
use tempfile::TempDir;

fn prepared_aggregator(dir: &TempDir) -> OutputAggregator {
    let layout = OutputLayout::new(dir.path().join("out"), None);
    layout.ensure_run_dirs().expect("Failed to create output directories");
    OutputAggregator::new(&layout).expect("Failed to open index streams")
}

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("output_append");

    for size in [1_000usize, 10_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("file_index", size), size, |b, &size| {
            let dir = TempDir::new().unwrap();
            let aggregator = prepared_aggregator(&dir);
            b.iter(|| {
                for i in 0..size {
                    let line = format!("proj/file_{i}.cpp");
                    aggregator.append_to_file_index(black_box(&line)).unwrap();
                }
            });
        });

        // Keyed streams exercise the handle cache: eight hot keys.
        group.bench_with_input(BenchmarkId::new("symbol_index", size), size, |b, &size| {
            let dir = TempDir::new().unwrap();
            let aggregator = prepared_aggregator(&dir);
            b.iter(|| {
                for i in 0..size {
                    let key = format!("sym_{}", i % 8);
                    aggregator.append_to_symbol_index(&key, black_box("proj/file.cpp#42")).unwrap();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_append);
criterion_main!(benches);
