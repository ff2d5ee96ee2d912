use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizlens_core::loader::{load, DocumentKind, RawDocument};
use quizlens_core::segmenter::segment;

fn bench_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment");

    let small = generate_worksheet(10);
    let medium = generate_worksheet(100);
    let large = generate_worksheet(1000);

    let wrapped = {
        let mut s = String::new();
        for i in 1..=100 {
            s.push_str(&format!(
                "{i}. Describe the stages of process {i} in\nthe order they occur and\nthe conditions each needs.\n\n"
            ));
        }
        s
    };

    group.bench_function("10_questions", |b| b.iter(|| segment(black_box(&small))));
    group.bench_function("100_questions", |b| b.iter(|| segment(black_box(&medium))));
    group.bench_function("1000_questions", |b| b.iter(|| segment(black_box(&large))));
    group.bench_function("100_wrapped", |b| b.iter(|| segment(black_box(&wrapped))));

    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    let plain = RawDocument::from_text(generate_worksheet(500));
    let tabular = {
        let mut s = String::from("id,question,marks\n");
        for i in 1..=500 {
            s.push_str(&format!("{i},\"Explain, with an example, concept {i}.\",4\n"));
        }
        RawDocument::new(DocumentKind::Tabular, s)
    };

    group.bench_function("plain_500", |b| b.iter(|| load(black_box(&plain))));
    group.bench_function("tabular_500", |b| b.iter(|| load(black_box(&tabular))));

    group.finish();
}

fn generate_worksheet(n: usize) -> String {
    let mut s = String::new();
    for i in 1..=n {
        s.push_str(&format!("{i}. Explain how factor {i} affects the outcome.\n"));
    }
    s
}

criterion_group!(benches, bench_segment, bench_load);
criterion_main!(benches);
