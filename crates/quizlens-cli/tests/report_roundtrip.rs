//! Report persistence through the report crate.

use quizlens_core::{analyze, AnalysisOptions, RawDocument};
use quizlens_report::{load_json, render_markdown, save_json};

fn sample() -> quizlens_core::AnalysisReport {
    let text = "\
1. Define photosynthesis.
2. Critically evaluate the economic impact of renewable energy policy and justify your conclusion.
3. Design a greenhouse that keeps plants warm in winter
4. Why do some of them fail?
";
    analyze(&RawDocument::from_text(text), &AnalysisOptions::default()).unwrap()
}

#[test]
fn json_roundtrip_preserves_everything() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reports").join("report.json");
    let report = sample();

    save_json(&report, &path).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(loaded, report);
    assert_eq!(loaded.summary(), report.summary());
    assert_eq!(render_markdown(&loaded), render_markdown(&report));
}

#[test]
fn saved_json_uses_stable_tags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    save_json(&sample(), &path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["question_count"], 4);
    assert_eq!(json["annotations"][2]["bloom"]["level"], "create");
    let kinds: Vec<&str> = json["findings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["kind"].as_str().unwrap())
        .collect();
    assert!(kinds.contains(&"missing-terminal-punctuation"));
    assert!(kinds.contains(&"ambiguous-reference"));
}
