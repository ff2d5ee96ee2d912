//! JSON persistence for analysis reports.

use std::path::Path;

use anyhow::{Context, Result};

use quizlens_core::report::AnalysisReport;

/// Save the report as pretty-printed JSON, creating parent directories.
pub fn save_json(report: &AnalysisReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(())
}

/// Load a report from a JSON file.
pub fn load_json(path: &Path) -> Result<AnalysisReport> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read report from {}", path.display()))?;
    let report: AnalysisReport =
        serde_json::from_str(&content).context("failed to parse report JSON")?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizlens_core::{analyze, AnalysisOptions, RawDocument};

    fn sample_report() -> AnalysisReport {
        let doc = RawDocument::from_text(
            "1. Define osmosis.\n2. Design an experiment to measure osmosis and explain your controls.\n",
        );
        analyze(&doc, &AnalysisOptions::default()).unwrap()
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("report.json");
        save_json(&sample_report(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = sample_report();
        save_json(&report, &path).unwrap();
        assert_eq!(load_json(&path).unwrap(), report);
    }

    #[test]
    fn load_missing_file_mentions_path() {
        let err = load_json(Path::new("/nonexistent/quizlens/report.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/quizlens/report.json"));
    }

    #[test]
    fn load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_json(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse report JSON"));
    }
}
