//! Core data model types for quizlens.
//!
//! Questions, the label enums every classifier agrees on, and the analysis
//! options that are threaded through the whole pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalysisError;

/// 1-based position of a question in the segmented document.
pub type Ordinal = u32;

/// A single question extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Position in source order, 1-based and contiguous.
    pub ordinal: Ordinal,
    /// Trimmed, non-empty question text with any ordinal marker removed.
    pub text: String,
    /// Where the question came from in the normalized text.
    #[serde(default)]
    pub source_span: Option<SourceSpan>,
}

/// Inclusive range of 1-based lines in the normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start_line: usize,
    pub end_line: usize,
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start_line == self.end_line {
            write!(f, "line {}", self.start_line)
        } else {
            write!(f, "lines {}-{}", self.start_line, self.end_line)
        }
    }
}

/// Difficulty buckets, easiest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [
        DifficultyLevel::Easy,
        DifficultyLevel::Medium,
        DifficultyLevel::Hard,
    ];
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifficultyLevel::Easy => write!(f, "Easy"),
            DifficultyLevel::Medium => write!(f, "Medium"),
            DifficultyLevel::Hard => write!(f, "Hard"),
        }
    }
}

/// The six levels of Bloom's taxonomy, ordered by cognitive demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BloomLevel {
    Remember,
    Understand,
    Apply,
    Analyze,
    Evaluate,
    Create,
}

impl BloomLevel {
    pub const ALL: [BloomLevel; 6] = [
        BloomLevel::Remember,
        BloomLevel::Understand,
        BloomLevel::Apply,
        BloomLevel::Analyze,
        BloomLevel::Evaluate,
        BloomLevel::Create,
    ];

    /// Zero-based position in [`BloomLevel::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Analyze, Evaluate and Create.
    pub fn is_higher_order(self) -> bool {
        self >= BloomLevel::Analyze
    }
}

impl fmt::Display for BloomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BloomLevel::Remember => "Remember",
            BloomLevel::Understand => "Understand",
            BloomLevel::Apply => "Apply",
            BloomLevel::Analyze => "Analyze",
            BloomLevel::Evaluate => "Evaluate",
            BloomLevel::Create => "Create",
        };
        f.write_str(name)
    }
}

impl FromStr for BloomLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remember" | "knowledge" => Ok(BloomLevel::Remember),
            "understand" | "comprehension" => Ok(BloomLevel::Understand),
            "apply" | "application" => Ok(BloomLevel::Apply),
            "analyze" | "analyse" | "analysis" => Ok(BloomLevel::Analyze),
            "evaluate" | "evaluation" => Ok(BloomLevel::Evaluate),
            "create" | "synthesis" => Ok(BloomLevel::Create),
            other => Err(format!("unknown Bloom level: {other}")),
        }
    }
}

/// Upper bounds of the Easy and Medium buckets. Both bounds are inclusive,
/// so a score sitting exactly on a boundary gets the lower difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyThresholds {
    #[serde(default = "default_easy_max")]
    pub easy_max: u8,
    #[serde(default = "default_medium_max")]
    pub medium_max: u8,
}

impl Default for DifficultyThresholds {
    fn default() -> Self {
        Self {
            easy_max: default_easy_max(),
            medium_max: default_medium_max(),
        }
    }
}

impl DifficultyThresholds {
    /// Bucket a raw score in `0..=100`.
    pub fn level_for(&self, score: u8) -> DifficultyLevel {
        if score <= self.easy_max {
            DifficultyLevel::Easy
        } else if score <= self.medium_max {
            DifficultyLevel::Medium
        } else {
            DifficultyLevel::Hard
        }
    }
}

fn default_easy_max() -> u8 {
    33
}

fn default_medium_max() -> u8 {
    66
}

/// Options for one analysis run. Passed explicitly down the call chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Difficulty bucket boundaries.
    #[serde(default)]
    pub difficulty_thresholds: DifficultyThresholds,
    /// Word count above which a question is penalized for length.
    #[serde(default = "default_clarity_word_ceiling")]
    pub clarity_word_ceiling: usize,
    /// Level assigned when no cue matches.
    #[serde(default = "default_bloom_level")]
    pub bloom_default_level: BloomLevel,
    /// Token count after which length adds difficulty with diminishing returns.
    #[serde(default = "default_difficulty_token_ceiling")]
    pub difficulty_token_ceiling: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            difficulty_thresholds: DifficultyThresholds::default(),
            clarity_word_ceiling: default_clarity_word_ceiling(),
            bloom_default_level: default_bloom_level(),
            difficulty_token_ceiling: default_difficulty_token_ceiling(),
        }
    }
}

impl AnalysisOptions {
    /// Reject option combinations the classifiers cannot work with.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let t = &self.difficulty_thresholds;
        if t.easy_max >= t.medium_max {
            return Err(AnalysisError::InvalidOptions(format!(
                "easy_max ({}) must be below medium_max ({})",
                t.easy_max, t.medium_max
            )));
        }
        if t.medium_max >= 100 {
            return Err(AnalysisError::InvalidOptions(format!(
                "medium_max ({}) must be below 100",
                t.medium_max
            )));
        }
        if self.clarity_word_ceiling == 0 {
            return Err(AnalysisError::InvalidOptions(
                "clarity_word_ceiling must be at least 1".into(),
            ));
        }
        if self.difficulty_token_ceiling == 0 {
            return Err(AnalysisError::InvalidOptions(
                "difficulty_token_ceiling must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn default_clarity_word_ceiling() -> usize {
    40
}

fn default_bloom_level() -> BloomLevel {
    BloomLevel::Understand
}

fn default_difficulty_token_ceiling() -> usize {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive_low() {
        let t = DifficultyThresholds::default();
        assert_eq!(t.level_for(0), DifficultyLevel::Easy);
        assert_eq!(t.level_for(33), DifficultyLevel::Easy);
        assert_eq!(t.level_for(34), DifficultyLevel::Medium);
        assert_eq!(t.level_for(66), DifficultyLevel::Medium);
        assert_eq!(t.level_for(67), DifficultyLevel::Hard);
        assert_eq!(t.level_for(100), DifficultyLevel::Hard);
    }

    #[test]
    fn bloom_levels_order_by_demand() {
        assert!(BloomLevel::Create > BloomLevel::Evaluate);
        assert!(BloomLevel::Remember < BloomLevel::Understand);
        assert_eq!(BloomLevel::Analyze.index(), 3);
        assert!(BloomLevel::Analyze.is_higher_order());
        assert!(!BloomLevel::Apply.is_higher_order());
    }

    #[test]
    fn bloom_level_parse() {
        assert_eq!("Create".parse::<BloomLevel>().unwrap(), BloomLevel::Create);
        assert_eq!("analyse".parse::<BloomLevel>().unwrap(), BloomLevel::Analyze);
        assert_eq!(
            "comprehension".parse::<BloomLevel>().unwrap(),
            BloomLevel::Understand
        );
        assert!("memorize".parse::<BloomLevel>().is_err());
    }

    #[test]
    fn options_defaults() {
        let opts = AnalysisOptions::default();
        assert_eq!(opts.difficulty_thresholds.easy_max, 33);
        assert_eq!(opts.difficulty_thresholds.medium_max, 66);
        assert_eq!(opts.clarity_word_ceiling, 40);
        assert_eq!(opts.bloom_default_level, BloomLevel::Understand);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn options_partial_json_uses_defaults() {
        let opts: AnalysisOptions = serde_json::from_str(
            r#"{ "difficulty_thresholds": { "easy_max": 20 }, "bloom_default_level": "apply" }"#,
        )
        .unwrap();
        assert_eq!(opts.difficulty_thresholds.easy_max, 20);
        assert_eq!(opts.difficulty_thresholds.medium_max, 66);
        assert_eq!(opts.bloom_default_level, BloomLevel::Apply);
        assert_eq!(opts.clarity_word_ceiling, 40);
    }

    #[test]
    fn options_reject_inverted_thresholds() {
        let mut opts = AnalysisOptions::default();
        opts.difficulty_thresholds.easy_max = 70;
        assert!(matches!(
            opts.validate(),
            Err(AnalysisError::InvalidOptions(_))
        ));

        let mut opts = AnalysisOptions::default();
        opts.difficulty_thresholds.medium_max = 100;
        assert!(opts.validate().is_err());

        let opts = AnalysisOptions {
            clarity_word_ceiling: 0,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn span_display() {
        let one = SourceSpan {
            start_line: 4,
            end_line: 4,
        };
        let many = SourceSpan {
            start_line: 4,
            end_line: 6,
        };
        assert_eq!(one.to_string(), "line 4");
        assert_eq!(many.to_string(), "lines 4-6");
    }
}
