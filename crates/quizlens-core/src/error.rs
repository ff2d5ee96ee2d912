//! Analysis error types.
//!
//! Input errors are the caller's to fix and are never retried. Invariant
//! violations mean an internal contract was broken; they are logged where
//! they are raised and surfaced like any other error.

use thiserror::Error;

use crate::model::Ordinal;

/// Errors that can occur while analyzing a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The declared kind or file extension is not one the loader understands.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The document has no text after trimming.
    #[error("input is empty")]
    EmptyInput,

    /// The payload could not be interpreted as text.
    #[error("could not decode input: {0}")]
    DecodingFailure(String),

    /// Segmentation produced zero questions.
    #[error("no questions found in input")]
    NoQuestionsFound,

    /// The aggregator was invoked with zero questions.
    #[error("cannot build a report from an empty annotation set")]
    EmptyAnnotationSet,

    /// Analysis options are inconsistent.
    #[error("invalid analysis options: {0}")]
    InvalidOptions(String),

    /// A classifier produced no output for a question at join time.
    #[error("{classifier} classifier produced no output for question {ordinal}")]
    IncompleteAnnotation {
        ordinal: Ordinal,
        classifier: &'static str,
    },

    /// Loading and segmentation exceeded the caller's wall-clock budget.
    #[error("analysis timed out after {budget_ms}ms")]
    AnalysisTimedOut { budget_ms: u64 },

    /// A classification worker panicked or was cancelled.
    #[error("classification worker failed: {0}")]
    WorkerFailed(String),
}

impl AnalysisError {
    /// Returns `true` for errors caused by the caller's input or options.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::UnsupportedFormat(_)
                | AnalysisError::EmptyInput
                | AnalysisError::DecodingFailure(_)
                | AnalysisError::NoQuestionsFound
                | AnalysisError::InvalidOptions(_)
        )
    }

    /// Returns `true` for errors that indicate a broken internal contract.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            AnalysisError::EmptyAnnotationSet
                | AnalysisError::IncompleteAnnotation { .. }
                | AnalysisError::WorkerFailed(_)
        )
    }

    /// A short hint to show the end user alongside the error.
    pub fn guidance(&self) -> &'static str {
        match self {
            AnalysisError::UnsupportedFormat(_) => {
                "File format not supported. Use a .txt, .csv, .tsv, or .pdf file, or paste the questions as text."
            }
            AnalysisError::EmptyInput => "The input is empty. Add some questions and try again.",
            AnalysisError::DecodingFailure(_) => {
                "The file could not be read as text. Check that it is not corrupted and is saved as UTF-8."
            }
            AnalysisError::NoQuestionsFound => {
                "No questions detected. Put each question on its own line or number them (1., 2., ...)."
            }
            AnalysisError::InvalidOptions(_) => {
                "Check the analysis settings: thresholds must be increasing and below 100, ceilings above 0."
            }
            AnalysisError::AnalysisTimedOut { .. } => {
                "The document took too long to process. Try a smaller document or a longer time budget."
            }
            AnalysisError::EmptyAnnotationSet
            | AnalysisError::IncompleteAnnotation { .. }
            | AnalysisError::WorkerFailed(_) => {
                "An internal error occurred while building the report. Please report this issue."
            }
        }
    }
}
