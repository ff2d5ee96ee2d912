//! Report output for quizlens: JSON persistence and Markdown rendering.

pub mod json;
pub mod markdown;

pub use json::{load_json, save_json};
pub use markdown::{render_markdown, write_markdown};
