//! Markdown report rendering.

use std::path::Path;

use anyhow::{Context, Result};

use quizlens_core::model::{BloomLevel, DifficultyLevel};
use quizlens_core::report::AnalysisReport;

/// Longest question excerpt shown in the per-question table.
const EXCERPT_CHARS: usize = 80;

/// Escape characters that would break a Markdown table cell.
fn cell(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace('\n', " ")
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(EXCERPT_CHARS - 3).collect();
        format!("{}...", cut.trim_end())
    }
}

/// Render the report as a Markdown document.
pub fn render_markdown(report: &AnalysisReport) -> String {
    let mut md = String::new();

    md.push_str("# Question quality report\n\n");
    md.push_str(&format!("**Overall assessment:** {}\n\n", report.summary()));
    md.push_str(&format!(
        "| Questions | Clarity score | Verdict |\n|-----------|---------------|---------|\n| {} | {}/100 | {} |\n\n",
        report.question_count, report.clarity_score, report.clarity_verdict
    ));

    md.push_str("## Difficulty\n\n");
    md.push_str("| Level | Count | Percent |\n|-------|-------|---------|\n");
    for level in DifficultyLevel::ALL {
        let share = report.difficulty.get(level);
        md.push_str(&format!("| {level} | {} | {}% |\n", share.count, share.percent));
    }
    md.push('\n');

    md.push_str("## Bloom's taxonomy\n\n");
    md.push_str("| Level | Count |\n|-------|-------|\n");
    for level in BloomLevel::ALL {
        md.push_str(&format!("| {level} | {} |\n", report.bloom.get(level)));
    }
    md.push('\n');

    if !report.findings.is_empty() {
        md.push_str("## Clarity findings\n\n");
        md.push_str("| Issue | Questions | Guidance |\n|-------|-----------|----------|\n");
        for f in &report.findings {
            let ordinals: Vec<String> = f.ordinals.iter().map(|o| o.to_string()).collect();
            md.push_str(&format!(
                "| `{}` | {} ({}) | {} |\n",
                f.kind,
                f.occurrences,
                ordinals.join(", "),
                cell(&f.guidance)
            ));
        }
        md.push('\n');
    }

    let strengths: Vec<_> = report.strengths().collect();
    if !strengths.is_empty() {
        md.push_str("## Strengths\n\n");
        for i in strengths {
            md.push_str(&format!("- {}\n", i.message));
        }
        md.push('\n');
    }

    let improvements: Vec<_> = report.improvements().collect();
    if !improvements.is_empty() {
        md.push_str("## Improvement areas\n\n");
        for i in improvements {
            md.push_str(&format!("- {}\n", i.message));
        }
        md.push('\n');
    }

    md.push_str("## Questions\n\n");
    md.push_str("| # | Question | Difficulty | Bloom | Clarity | Issues |\n");
    md.push_str("|---|----------|------------|-------|---------|--------|\n");
    for a in &report.annotations {
        let bloom = if a.bloom.low_confidence {
            format!("{}?", a.bloom.level)
        } else {
            a.bloom.level.to_string()
        };
        let issues: Vec<String> = a.clarity.issues.iter().map(|i| i.kind.to_string()).collect();
        md.push_str(&format!(
            "| {} | {} | {} ({}) | {} | {} | {} |\n",
            a.question.ordinal,
            cell(&excerpt(&a.question.text)),
            a.difficulty.level,
            a.difficulty.score,
            bloom,
            a.clarity.score,
            if issues.is_empty() {
                "-".to_string()
            } else {
                issues.join(", ")
            }
        ));
    }

    md
}

/// Render and write the report to `path`, creating parent directories.
pub fn write_markdown(report: &AnalysisReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, render_markdown(report))
        .with_context(|| format!("failed to write report to {}", path.display()))
}
