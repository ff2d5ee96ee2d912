//! quizlens-core — Question segmentation, classification, and clarity scoring.
//!
//! This crate turns a raw document of assessment questions into an
//! [`AnalysisReport`](report::AnalysisReport): a difficulty breakdown, a
//! Bloom's-taxonomy breakdown, and a clarity score with findings. Everything
//! here is a pure transform over in-memory input; reading files and rendering
//! output belong to the callers.

pub mod bloom;
pub mod clarity;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod lexicon;
pub mod loader;
pub mod model;
pub mod report;
pub mod segmenter;

pub use engine::{analyze, AnalysisEngine, EngineConfig};
pub use error::AnalysisError;
pub use loader::{DocumentKind, RawDocument};
pub use model::{AnalysisOptions, Question};
pub use report::AnalysisReport;
