//! Ranking and chunking throughput.

#![allow(missing_docs, clippy::expect_used)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ragchat::chunking::{Chunker, WordChunker};
use ragchat::search::rank;
use std::hint::black_box;

const PARAGRAPH: &str = "Employees accrue vacation days monthly and may carry over up to five \
    unused days. Dental and vision insurance are available from the first day of employment. \
    Remote work requires written approval from a manager and is limited to two days per week. ";

fn document(paragraphs: usize) -> String {
    PARAGRAPH.repeat(paragraphs)
}

fn bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");

    for paragraphs in [10, 100, 1000] {
        let text = document(paragraphs);
        let chunks = WordChunker::new().chunk(&text).expect("chunk");

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(BenchmarkId::new("chunk", paragraphs), |b| {
            b.iter(|| WordChunker::new().chunk(black_box(&text)));
        });
        group.bench_function(BenchmarkId::new("top3", paragraphs), |b| {
            b.iter(|| rank(black_box(&chunks), "how many vacation days carry over", 3));
        });
    }

    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench
);

criterion_main!(benches);
