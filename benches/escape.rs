use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use json_quote::{escape, escape_bytes};

fn fixture() -> String {
    concat!(
        "The quick brown fox jumps over the lazy dog 0123456789. ",
        "He said \"hello\\world\"\twith tabs\nand newlines, ",
        "\u{4e2d}\u{6587} mixed with English, emoji \u{1f680}, ",
        "and a line\u{2028}separator. ",
    )
    .repeat(512)
}

fn criterion_benchmark(c: &mut Criterion) {
    let input = fixture();
    c.bench_function("escape", |b| b.iter(|| black_box(escape(input.as_str()))));
    c.bench_function("escape_bytes", |b| {
        b.iter(|| black_box(escape_bytes(input.as_bytes())))
    });
    c.bench_function("serde_json", |b| {
        b.iter(|| black_box(serde_json::to_string(input.as_str()).unwrap()))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
