//! Benchmarks for signal extraction, the hot path of heuristic routing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use counsel_core::routing::extract;

fn bench_extract(c: &mut Criterion) {
    let short = "Classify this review as positive or negative";
    let long = format!(
        "Analyze the tradeoffs in this design and decide what to change:\n\
         ```rust\nfn main() {{}}\n```\n{}",
        "lorem ipsum dolor sit amet ".repeat(400)
    );

    c.bench_function("extract_short_prompt", |b| {
        b.iter(|| extract(black_box(short), None))
    });

    c.bench_function("extract_long_prompt_with_context", |b| {
        b.iter(|| extract(black_box(&long), Some("see the attached screenshot")))
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
