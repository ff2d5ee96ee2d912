use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizlens_core::model::{AnalysisOptions, Question};
use quizlens_core::{analyze, bloom, clarity, difficulty, RawDocument};

fn make_question(text: &str) -> Question {
    Question {
        ordinal: 1,
        text: text.into(),
        source_span: None,
    }
}

fn bench_classifiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let options = AnalysisOptions::default();

    let recall = make_question("Define photosynthesis.");
    let analytical = make_question(
        "Critically evaluate the economic impact of renewable energy policy and justify your conclusion.",
    );
    let long = make_question(&format!(
        "Using the data in the table, {} explain the trend.",
        "compare the values for each region and ".repeat(10)
    ));

    for (name, q) in [("recall", &recall), ("analytical", &analytical), ("long", &long)] {
        group.bench_function(format!("difficulty_{name}"), |b| {
            b.iter(|| difficulty::classify(black_box(q), black_box(&options)))
        });
        group.bench_function(format!("bloom_{name}"), |b| {
            b.iter(|| bloom::classify(black_box(q), black_box(&options)))
        });
        group.bench_function(format!("clarity_{name}"), |b| {
            b.iter(|| clarity::assess(black_box(q), black_box(&options)))
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    let options = AnalysisOptions::default();

    for n in [10usize, 100, 500] {
        let mut text = String::new();
        for i in 1..=n {
            text.push_str(&format!(
                "{i}. Compare method {i} with the standard approach and justify which is better.\n"
            ));
        }
        let doc = RawDocument::from_text(text);
        group.bench_function(format!("{n}_questions"), |b| {
            b.iter(|| analyze(black_box(&doc), black_box(&options)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classifiers, bench_pipeline);
criterion_main!(benches);
