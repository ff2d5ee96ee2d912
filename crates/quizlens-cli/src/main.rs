//! quizlens CLI — analyze question sets from the command line.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use quizlens_core::{AnalysisError, DocumentKind};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "quizlens", version, about = "Question-quality analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a question set and print a report
    Analyze(commands::analyze::AnalyzeArgs),

    /// Show how a document is split into questions
    Segment {
        /// Input file (.txt, .md, .csv, .tsv, .pdf); stdin when omitted
        #[arg(long, conflicts_with = "text")]
        input: Option<PathBuf>,

        /// Analyze this text instead of a file
        #[arg(long)]
        text: Option<String>,

        /// Document kind: plain, tabular, paged (default: from extension)
        #[arg(long)]
        kind: Option<DocumentKind>,
    },

    /// Create a starter config and sample question set
    Init,
}

#[tokio::main]
async fn main() {
    let filter = match "quizlens=info".parse() {
        Ok(directive) => tracing_subscriber::EnvFilter::from_default_env().add_directive(directive),
        Err(_) => tracing_subscriber::EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze(args) => commands::analyze::execute(args).await,
        Commands::Segment { input, text, kind } => commands::segment::execute(input, text, kind),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        if let Some(analysis) = e.downcast_ref::<AnalysisError>() {
            eprintln!("Hint: {}", analysis.guidance());
        }
        process::exit(1);
    }
}
