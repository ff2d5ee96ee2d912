//! The `quizlens segment` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizlens_core::loader::load;
use quizlens_core::segmenter::segment;
use quizlens_core::DocumentKind;

pub fn execute(
    input: Option<PathBuf>,
    text: Option<String>,
    kind: Option<DocumentKind>,
) -> Result<()> {
    let doc = super::read_input(input, text, kind)?;
    let normalized = load(&doc)?;
    let questions = segment(&normalized)?;

    let mut table = Table::new();
    table.set_header(vec!["#", "Source", "Question"]);
    for q in &questions {
        table.add_row(vec![
            Cell::new(q.ordinal),
            Cell::new(
                q.source_span
                    .map(|span| span.to_string())
                    .unwrap_or_default(),
            ),
            Cell::new(&q.text),
        ]);
    }
    println!("{table}");
    println!(
        "{} question{} found ({} input)",
        questions.len(),
        if questions.len() == 1 { "" } else { "s" },
        doc.kind
    );

    Ok(())
}
