//! Document loading and text normalization.
//!
//! Turns a [`RawDocument`] into one normalized text blob: decoded to UTF-8,
//! `\n` line endings, tabular records flattened to lines, and paged documents
//! concatenated page by page.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Declared kind of a raw document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    /// Plain text, one or more questions per line.
    PlainText,
    /// Delimited records (CSV/TSV), one question per record.
    Tabular,
    /// A paged document: PDF bytes, or text with form-feed page breaks.
    Paged,
}

impl DocumentKind {
    /// Map a file extension (without the dot) to a document kind.
    pub fn from_extension(ext: &str) -> Result<Self, AnalysisError> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" | "text" | "md" => Ok(DocumentKind::PlainText),
            "csv" | "tsv" => Ok(DocumentKind::Tabular),
            "pdf" => Ok(DocumentKind::Paged),
            other => Err(AnalysisError::UnsupportedFormat(format!(
                "unknown extension '.{other}'"
            ))),
        }
    }

    /// Infer the kind from a path's extension. Does not touch the filesystem.
    pub fn from_path(path: &Path) -> Result<Self, AnalysisError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                AnalysisError::UnsupportedFormat(format!(
                    "no file extension on {}",
                    path.display()
                ))
            })?;
        Self::from_extension(ext)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::PlainText => write!(f, "plain"),
            DocumentKind::Tabular => write!(f, "tabular"),
            DocumentKind::Paged => write!(f, "paged"),
        }
    }
}

impl FromStr for DocumentKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "text" | "txt" => Ok(DocumentKind::PlainText),
            "tabular" | "csv" | "tsv" => Ok(DocumentKind::Tabular),
            "paged" | "pdf" => Ok(DocumentKind::Paged),
            other => Err(AnalysisError::UnsupportedFormat(format!(
                "unknown document kind '{other}'"
            ))),
        }
    }
}

/// Raw input handed over by the caller: a kind tag plus the payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub kind: DocumentKind,
    pub content: Vec<u8>,
}

impl RawDocument {
    pub fn new(kind: DocumentKind, content: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    /// Pasted text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(DocumentKind::PlainText, text.into().into_bytes())
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const PAGE_BREAK: char = '\u{000C}';

/// Column headings that mark the question column of a tabular document.
const QUESTION_HEADERS: &[&str] = &["question", "questions", "prompt", "item", "question text"];

/// Load a raw document into normalized text.
pub fn load(doc: &RawDocument) -> Result<String, AnalysisError> {
    let text = match doc.kind {
        DocumentKind::PlainText => normalize(&decode_text(&doc.content)?),
        DocumentKind::Tabular => flatten_tabular(&normalize(&decode_text(&doc.content)?))?,
        DocumentKind::Paged => {
            let pages = if doc.content.starts_with(PDF_MAGIC) {
                extract_pdf_pages(&doc.content)?
            } else {
                decode_text(&doc.content)?
                    .split(PAGE_BREAK)
                    .map(str::to_string)
                    .collect()
            };
            tracing::debug!(pages = pages.len(), "flattening paged document");
            normalize(&pages.join("\n"))
        }
    };

    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    tracing::debug!(kind = %doc.kind, bytes = doc.content.len(), chars = text.len(), "document loaded");
    Ok(text)
}

/// Decode bytes as UTF-8, or UTF-16 when a byte-order mark says so.
fn decode_text(bytes: &[u8]) -> Result<String, AnalysisError> {
    let text = if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        utf8(rest)?
    } else if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        utf16(rest, u16::from_le_bytes)?
    } else if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        utf16(rest, u16::from_be_bytes)?
    } else {
        utf8(bytes)?
    };

    if text.contains('\0') {
        return Err(AnalysisError::DecodingFailure(
            "input contains NUL bytes; it looks like a binary file".into(),
        ));
    }
    Ok(text)
}

fn utf8(bytes: &[u8]) -> Result<String, AnalysisError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| {
        AnalysisError::DecodingFailure(format!(
            "invalid UTF-8 at byte {}",
            e.utf8_error().valid_up_to()
        ))
    })
}

fn utf16(bytes: &[u8], read: fn([u8; 2]) -> u16) -> Result<String, AnalysisError> {
    if bytes.len() % 2 != 0 {
        return Err(AnalysisError::DecodingFailure(
            "UTF-16 payload has an odd number of bytes".into(),
        ));
    }
    let units = bytes.chunks_exact(2).map(|pair| read([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|e| AnalysisError::DecodingFailure(format!("invalid UTF-16: {e}")))
}

/// Unify line endings and replace non-breaking spaces.
fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace(['\u{00A0}', '\u{202F}'], " ")
}

#[cfg(feature = "pdf")]
fn extract_pdf_pages(bytes: &[u8]) -> Result<Vec<String>, AnalysisError> {
    let document = lopdf::Document::load_mem(bytes)
        .map_err(|e| AnalysisError::DecodingFailure(format!("corrupted PDF: {e}")))?;

    // get_pages is keyed by page number, so iteration is already in page order.
    let mut pages = Vec::new();
    for page_number in document.get_pages().keys() {
        let text = document.extract_text(&[*page_number]).map_err(|e| {
            AnalysisError::DecodingFailure(format!("page {page_number}: {e}"))
        })?;
        pages.push(text);
    }
    Ok(pages)
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf_pages(_bytes: &[u8]) -> Result<Vec<String>, AnalysisError> {
    Err(AnalysisError::UnsupportedFormat(
        "PDF support is not enabled in this build".into(),
    ))
}

/// Flatten delimited records into one line per record.
fn flatten_tabular(text: &str) -> Result<String, AnalysisError> {
    let delimiter = sniff_delimiter(text);
    let records = split_records(text, delimiter)?;

    let question_column = records.first().and_then(|header| {
        header
            .iter()
            .position(|cell| QUESTION_HEADERS.contains(&cell.trim().to_lowercase().as_str()))
    });

    let body = match question_column {
        Some(_) => &records[1..],
        None => &records[..],
    };

    let mut lines = Vec::with_capacity(body.len());
    for (i, record) in body.iter().enumerate() {
        let line = match question_column {
            Some(col) => record
                .get(col)
                .map(|cell| collapse_whitespace(cell))
                .unwrap_or_default(),
            None => {
                let mut cells: Vec<String> = record
                    .iter()
                    .map(|cell| collapse_whitespace(cell))
                    .filter(|cell| !cell.is_empty())
                    .collect();
                // A leading numeric field is a row id, not question text.
                if cells.len() > 1 && is_row_id(&cells[0]) {
                    cells.remove(0);
                }
                cells.join(" ")
            }
        };
        if line.is_empty() {
            tracing::warn!(record = i + 1, "skipping tabular record without text");
            continue;
        }
        lines.push(line);
    }

    // Blank lines keep records apart so unpunctuated rows are not merged.
    Ok(lines.join("\n\n"))
}

fn is_row_id(cell: &str) -> bool {
    cell.chars().all(|c| c.is_ascii_digit())
}

fn sniff_delimiter(text: &str) -> char {
    let first = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    if first.contains('\t') {
        '\t'
    } else if first.matches(';').count() > first.matches(',').count() {
        ';'
    } else {
        ','
    }
}

/// Quote-aware record splitting: `"a, b"` is one field, `""` is an escaped
/// quote, and quoted fields may span lines.
fn split_records(text: &str, delimiter: char) -> Result<Vec<Vec<String>>, AnalysisError> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            '\n' => {
                record.push(std::mem::take(&mut field));
                if record.iter().any(|f| !f.trim().is_empty()) {
                    records.push(std::mem::take(&mut record));
                } else {
                    record.clear();
                }
            }
            c if c == delimiter => record.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(AnalysisError::DecodingFailure(
            "unterminated quoted field in tabular input".into(),
        ));
    }
    record.push(field);
    if record.iter().any(|f| !f.trim().is_empty()) {
        records.push(record);
    }
    Ok(records)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
