//! The `quizlens analyze` command.

use std::ops::Range;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};

use quizlens_core::engine::{AnalysisEngine, Classifier, EngineConfig, ProgressReporter};
use quizlens_core::model::{BloomLevel, DifficultyLevel, Ordinal};
use quizlens_core::{AnalysisReport, DocumentKind};
use quizlens_report::{render_markdown, save_json, write_markdown};

use crate::config::load_config_from;

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Input file (.txt, .md, .csv, .tsv, .pdf); stdin when omitted
    #[arg(long, conflicts_with = "text")]
    pub input: Option<PathBuf>,

    /// Analyze this text instead of a file
    #[arg(long)]
    pub text: Option<String>,

    /// Document kind: plain, tabular, paged (default: from extension)
    #[arg(long)]
    pub kind: Option<DocumentKind>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Highest score still labeled Easy
    #[arg(long)]
    pub easy_max: Option<u8>,

    /// Highest score still labeled Medium
    #[arg(long)]
    pub medium_max: Option<u8>,

    /// Word count above which questions lose clarity points
    #[arg(long)]
    pub word_ceiling: Option<usize>,

    /// Max concurrent classification tasks
    #[arg(long)]
    pub parallelism: Option<usize>,

    /// Time budget for loading and segmentation, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Output format: text, json, markdown, all
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Write report files to this directory instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_segmented(&self, questions: usize) {
        tracing::info!(questions, "segmented input");
    }

    fn on_chunk_classified(&self, classifier: Classifier, ordinals: Range<Ordinal>) {
        tracing::debug!(
            classifier = classifier.name(),
            first = ordinals.start,
            end = ordinals.end,
            "chunk classified"
        );
    }

    fn on_complete(&self, report: &AnalysisReport, elapsed: Duration) {
        tracing::info!(
            questions = report.question_count,
            "analysis complete ({:.2}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(args: AnalyzeArgs) -> Result<()> {
    let mut config = load_config_from(args.config.as_deref())?;

    if let Some(easy_max) = args.easy_max {
        config.analysis.difficulty_thresholds.easy_max = easy_max;
    }
    if let Some(medium_max) = args.medium_max {
        config.analysis.difficulty_thresholds.medium_max = medium_max;
    }
    if let Some(word_ceiling) = args.word_ceiling {
        config.analysis.clarity_word_ceiling = word_ceiling;
    }
    if let Some(parallelism) = args.parallelism {
        config.parallelism = parallelism;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.timeout_secs = Some(timeout_secs);
    }
    anyhow::ensure!(config.parallelism >= 1, "parallelism must be at least 1");
    anyhow::ensure!(config.chunk_size >= 1, "chunk_size must be at least 1");

    let formats: Vec<&str> = if args.format == "all" {
        vec!["text", "json", "markdown"]
    } else {
        args.format.split(',').map(str::trim).collect()
    };
    for fmt in &formats {
        anyhow::ensure!(
            matches!(*fmt, "text" | "json" | "markdown"),
            "unknown format '{fmt}' (expected text, json, markdown or all)"
        );
    }

    let doc = super::read_input(args.input, args.text, args.kind)?;

    let engine = AnalysisEngine::new(EngineConfig {
        parallelism: config.parallelism,
        chunk_size: config.chunk_size,
        time_budget: config.timeout_secs.map(Duration::from_secs),
    });
    let report = engine.run(doc, &config.analysis, &ConsoleReporter).await?;

    // "all" without --output still writes files, to the configured directory.
    let output_dir = match (&args.output, args.format == "all") {
        (Some(dir), _) => Some(dir.clone()),
        (None, true) => Some(config.output_dir.clone()),
        (None, false) => None,
    };
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    for fmt in &formats {
        match (*fmt, &output_dir) {
            ("text", _) => print_tables(&report),
            ("json", Some(dir)) => {
                let path = dir.join(format!("report-{timestamp}.json"));
                save_json(&report, &path)?;
                eprintln!("JSON report: {}", path.display());
            }
            ("json", None) => println!("{}", serde_json::to_string_pretty(&report)?),
            ("markdown", Some(dir)) => {
                let path = dir.join(format!("report-{timestamp}.md"));
                write_markdown(&report, &path)?;
                eprintln!("Markdown report: {}", path.display());
            }
            ("markdown", None) => print!("{}", render_markdown(&report)),
            _ => {}
        }
    }

    Ok(())
}

fn print_tables(report: &AnalysisReport) {
    let mut overview = Table::new();
    overview.set_header(vec!["Questions", "Clarity", "Verdict"]);
    overview.add_row(vec![
        Cell::new(report.question_count),
        Cell::new(format!("{}/100", report.clarity_score)),
        Cell::new(report.clarity_verdict),
    ]);
    println!("{overview}");

    let mut difficulty = Table::new();
    difficulty.set_header(vec!["Difficulty", "Count", "Percent"]);
    for level in DifficultyLevel::ALL {
        let share = report.difficulty.get(level);
        difficulty.add_row(vec![
            Cell::new(level),
            Cell::new(share.count),
            Cell::new(format!("{}%", share.percent)),
        ]);
    }
    println!("{difficulty}");

    let mut bloom = Table::new();
    bloom.set_header(vec!["Bloom level", "Count"]);
    for level in BloomLevel::ALL {
        bloom.add_row(vec![Cell::new(level), Cell::new(report.bloom.get(level))]);
    }
    println!("{bloom}");

    let mut questions = Table::new();
    questions.set_header(vec!["#", "Difficulty", "Bloom", "Clarity", "Issues"]);
    for a in &report.annotations {
        let issues: Vec<String> = a.clarity.issues.iter().map(|i| i.kind.to_string()).collect();
        questions.add_row(vec![
            Cell::new(a.question.ordinal),
            Cell::new(format!("{} ({})", a.difficulty.level, a.difficulty.score)),
            Cell::new(if a.bloom.low_confidence {
                format!("{}?", a.bloom.level)
            } else {
                a.bloom.level.to_string()
            }),
            Cell::new(a.clarity.score),
            Cell::new(issues.join(", ")),
        ]);
    }
    println!("{questions}");

    if !report.findings.is_empty() {
        println!("\nClarity findings:");
        for f in &report.findings {
            println!("  {} x{}: {}", f.kind, f.occurrences, f.guidance);
        }
    }

    let strengths: Vec<_> = report.strengths().collect();
    if !strengths.is_empty() {
        println!("\nStrengths:");
        for i in strengths {
            println!("  + {}", i.message);
        }
    }
    let improvements: Vec<_> = report.improvements().collect();
    if !improvements.is_empty() {
        println!("\nImprovement areas:");
        for i in improvements {
            println!("  - {}", i.message);
        }
    }

    println!("\n{}", report.summary());
}
