//! Benchmarks for row operations on tab content.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tabba_buffer::{add_row, blocks, delete_last_row, extract_string_labels, DeviceClass, Instrument};

/// Builds guitar content with `rows` blank rows.
fn generate_content(rows: usize) -> String {
    let mut content = tabba_buffer::reset_content(Instrument::Guitar, DeviceClass::Wide);
    for _ in 1..rows {
        content = add_row(&content, Instrument::Guitar, DeviceClass::Wide);
    }
    content
}

/// Benchmarks appending a row.
fn bench_add_row(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_row");

    for rows in [1, 100, 1000].iter() {
        let content = generate_content(*rows);

        group.bench_with_input(BenchmarkId::new("guitar", rows), &content, |b, content| {
            b.iter(|| {
                let next = add_row(black_box(content), Instrument::Guitar, DeviceClass::Wide);
                black_box(next)
            })
        });
    }

    group.finish();
}

/// Benchmarks deleting the last row, which re-splits the whole content.
fn bench_delete_last_row(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete_last_row");

    for rows in [2, 100, 1000].iter() {
        let content = generate_content(*rows);

        group.bench_with_input(BenchmarkId::new("guitar", rows), &content, |b, content| {
            b.iter(|| {
                let next = delete_last_row(black_box(content));
                black_box(next)
            })
        });
    }

    group.finish();
}

/// Benchmarks block splitting and label extraction.
fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    let content = generate_content(1000);

    group.bench_function("blocks", |b| {
        b.iter(|| {
            let blocks = blocks(black_box(&content));
            black_box(blocks.len())
        })
    });

    group.bench_function("extract_string_labels", |b| {
        b.iter(|| {
            let labels = extract_string_labels(black_box(&content), Instrument::Guitar);
            black_box(labels)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_add_row, bench_delete_last_row, bench_parsing);
criterion_main!(benches);
