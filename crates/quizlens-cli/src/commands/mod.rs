pub mod analyze;
pub mod init;
pub mod segment;

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};

use quizlens_core::{DocumentKind, RawDocument};

/// Build the raw document from `--input`, `--text`, or stdin.
///
/// The kind comes from `--kind`, then the file extension, then plain text.
pub fn read_input(
    input: Option<PathBuf>,
    text: Option<String>,
    kind: Option<DocumentKind>,
) -> Result<RawDocument> {
    match (input, text) {
        (Some(path), _) => {
            let kind = match kind {
                Some(kind) => kind,
                None => DocumentKind::from_path(&path)?,
            };
            let content = std::fs::read(&path)
                .with_context(|| format!("failed to read input: {}", path.display()))?;
            tracing::debug!(path = %path.display(), %kind, bytes = content.len(), "read input");
            Ok(RawDocument::new(kind, content))
        }
        (None, Some(text)) => Ok(RawDocument::new(
            kind.unwrap_or(DocumentKind::PlainText),
            text.into_bytes(),
        )),
        (None, None) => {
            let mut content = Vec::new();
            std::io::stdin()
                .read_to_end(&mut content)
                .context("failed to read stdin")?;
            Ok(RawDocument::new(
                kind.unwrap_or(DocumentKind::PlainText),
                content,
            ))
        }
    }
}
