//! Difficulty classification.
//!
//! A question's raw score is a weighted sum of its length, its structure,
//! and the cue words it contains, normalized to `0..=100` and bucketed with
//! [`DifficultyThresholds`](crate::model::DifficultyThresholds).

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::lexicon::{chained_clause_count, cue_regex, word_count};
use crate::model::{AnalysisOptions, DifficultyLevel, Question};

/// One cue-word entry: a regex fragment and the points it contributes.
#[derive(Debug, Clone, Copy)]
pub struct DifficultyCue {
    /// Name reported in explanations.
    pub label: &'static str,
    /// Case-insensitive, whole-word regex fragment.
    pub pattern: &'static str,
    /// Positive for multi-step or analytical demand, negative for recall.
    pub weight: i32,
}

const fn cue(label: &'static str, pattern: &'static str, weight: i32) -> DifficultyCue {
    DifficultyCue {
        label,
        pattern,
        weight,
    }
}

/// Cue table. Each entry counts at most once per question.
pub const DIFFICULTY_CUES: &[DifficultyCue] = &[
    // Analytical and multi-step demand
    cue("analyze", r"analy[sz](?:e|es|ed|ing|is)", 18),
    cue("evaluate", r"evaluat(?:e|es|ed|ing|ion)", 20),
    cue("justify", r"justif(?:y|ies|ied|ying|ication)", 18),
    cue("design", r"design(?:s|ed|ing)?", 18),
    cue("critically", r"critical(?:ly)?|critiqu(?:e|es|ed|ing)", 14),
    cue("assess", r"assess(?:es|ed|ing|ment)?", 14),
    cue("synthesize", r"synthes[iz](?:e|es|ed|ing)", 16),
    cue("formulate", r"formulat(?:e|es|ed|ing)", 16),
    cue("to what extent", r"to\s+what\s+extent", 16),
    cue("prove", r"prove|derive", 14),
    cue("compare", r"compar(?:e|es|ed|ing|ison)|contrast(?:s|ed|ing)?", 12),
    cue("differentiate", r"differentiat(?:e|es|ed|ing)|distinguish(?:es|ed|ing)?", 12),
    cue("argue", r"argu(?:e|es|ed|ing)|defend(?:s|ed|ing)?", 12),
    cue("create", r"creat(?:e|es|ed|ing)|construct|develop|propos(?:e|es|ed|ing)|devis(?:e|es|ed|ing)", 12),
    cue("predict", r"predict(?:s|ed|ing)?|hypothesi[sz](?:e|es|ed|ing)", 10),
    cue("apply", r"appl(?:y|ies|ied|ying)|solv(?:e|es|ed|ing)|calculat(?:e|es|ed|ing)|comput(?:e|es|ed|ing)", 8),
    cue("explain", r"explain(?:s|ed|ing)?|describ(?:e|es|ed|ing)|discuss(?:es|ed|ing)?|interpret(?:s|ed|ing)?", 5),
    // Simple recall
    cue("define", r"defin(?:e|es|ed|ition)", -15),
    cue("list", r"list", -12),
    cue("name", r"name", -12),
    cue("recall", r"recall|memori[sz]e", -12),
    cue("state", r"state", -10),
    cue("label", r"label", -10),
    cue("true or false", r"true\s+or\s+false", -10),
    cue("identify", r"identify", -8),
    cue("what is", r"what\s+is", -6),
];

static COMPILED_CUES: LazyLock<Vec<(Regex, DifficultyCue)>> = LazyLock::new(|| {
    DIFFICULTY_CUES
        .iter()
        .filter_map(|c| match cue_regex(&[c.pattern]) {
            Ok(re) => Some((re, *c)),
            Err(e) => {
                tracing::error!(cue = c.label, error = %e, "skipping invalid difficulty cue pattern");
                None
            }
        })
        .collect()
});

const BASE_SCORE: f64 = 25.0;
/// Points for length up to the token ceiling.
const LENGTH_WEIGHT: f64 = 35.0;
/// Extra points approached asymptotically beyond the ceiling.
const OVERFLOW_WEIGHT: f64 = 10.0;
const CLAUSE_BONUS: f64 = 8.0;
const EXTRA_QUESTION_BONUS: f64 = 6.0;
const MAX_STRUCTURE_UNITS: usize = 2;

/// Difficulty label for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyLabel {
    pub level: DifficultyLevel,
    /// Raw score in `0..=100` that produced the level.
    pub score: u8,
    /// Cue labels that contributed to the score.
    #[serde(default)]
    pub cues: Vec<String>,
}

/// Classify a question's difficulty.
pub fn classify(question: &Question, options: &AnalysisOptions) -> DifficultyLabel {
    let text = question.text.as_str();
    let tokens = word_count(text);

    let mut raw = BASE_SCORE + length_points(tokens, options.difficulty_token_ceiling);

    let clauses = chained_clause_count(text).min(MAX_STRUCTURE_UNITS);
    let extra_questions = text
        .matches('?')
        .count()
        .saturating_sub(1)
        .min(MAX_STRUCTURE_UNITS);
    raw += clauses as f64 * CLAUSE_BONUS + extra_questions as f64 * EXTRA_QUESTION_BONUS;

    let mut cues = Vec::new();
    for (re, cue) in COMPILED_CUES.iter() {
        if re.is_match(text) {
            raw += f64::from(cue.weight);
            cues.push(cue.label.to_string());
        }
    }

    let score = normalize(raw);
    DifficultyLabel {
        level: options.difficulty_thresholds.level_for(score),
        score,
        cues,
    }
}

/// Linear up to `ceiling` tokens, then diminishing returns.
fn length_points(tokens: usize, ceiling: usize) -> f64 {
    let ceiling = ceiling.max(1) as f64;
    let tokens = tokens as f64;
    if tokens <= ceiling {
        LENGTH_WEIGHT * tokens / ceiling
    } else {
        LENGTH_WEIGHT + OVERFLOW_WEIGHT * (1.0 - ceiling / tokens)
    }
}

/// Clamp to `0..=100` and round half-up.
fn normalize(raw: f64) -> u8 {
    (raw.clamp(0.0, 100.0) + 0.5).floor() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str) -> Question {
        Question {
            ordinal: 1,
            text: text.into(),
            source_span: None,
        }
    }

    fn classify_text(text: &str) -> DifficultyLabel {
        classify(&question(text), &AnalysisOptions::default())
    }

    #[test]
    fn every_cue_table_entry_compiles() {
        assert_eq!(COMPILED_CUES.len(), DIFFICULTY_CUES.len());
    }

    #[test]
    fn inflected_verbs_count_as_cues() {
        let label = classify_text("Analyzing the data, what trend emerges?");
        assert!(label.cues.contains(&"analyze".to_string()), "{:?}", label.cues);
        let label = classify_text("Solving for x, describing each step.");
        assert!(label.cues.contains(&"apply".to_string()), "{:?}", label.cues);
        assert!(label.cues.contains(&"explain".to_string()), "{:?}", label.cues);
    }

    #[test]
    fn recall_question_is_easy() {
        let label = classify_text("Define photosynthesis.");
        assert_eq!(label.level, DifficultyLevel::Easy);
        assert_eq!(label.cues, vec!["define"]);
    }

    #[test]
    fn multi_cue_analytical_question_is_hard() {
        let label = classify_text(
            "Critically evaluate the economic impact of renewable energy policy and justify your conclusion.",
        );
        assert_eq!(label.level, DifficultyLevel::Hard);
        assert!(label.cues.contains(&"evaluate".to_string()));
        assert!(label.cues.contains(&"justify".to_string()));
        assert!(label.cues.contains(&"critically".to_string()));
    }

    #[test]
    fn single_explain_is_medium() {
        let label = classify_text("Explain how the heart pumps blood through the body.");
        assert_eq!(label.level, DifficultyLevel::Medium);
    }

    #[test]
    fn longer_is_harder() {
        let short = classify_text("Discuss trade.");
        let long = classify_text(
            "Discuss how trade between medieval city states shaped the banking practices, \
             legal codes, and social structures that later spread across the continent.",
        );
        assert!(long.score > short.score);
    }

    #[test]
    fn length_has_diminishing_returns() {
        assert!((length_points(30, 30) - 35.0).abs() < f64::EPSILON);
        let at_60 = length_points(60, 30);
        let at_120 = length_points(120, 30);
        assert!(at_60 > 35.0 && at_120 > at_60);
        assert!(at_120 - at_60 < at_60 - 35.0);
        assert!(length_points(10_000, 30) < LENGTH_WEIGHT + OVERFLOW_WEIGHT);
    }

    #[test]
    fn score_is_clamped() {
        assert_eq!(normalize(-40.0), 0);
        assert_eq!(normalize(140.0), 100);
        assert_eq!(normalize(33.4), 33);
        assert_eq!(normalize(33.5), 34);
    }

    #[test]
    fn boundary_scores_use_lower_bucket() {
        let options = AnalysisOptions::default();
        assert_eq!(
            options.difficulty_thresholds.level_for(33),
            DifficultyLevel::Easy
        );
        assert_eq!(
            options.difficulty_thresholds.level_for(34),
            DifficultyLevel::Medium
        );
    }

    #[test]
    fn custom_thresholds_change_the_bucket() {
        let q = question("Explain how the heart pumps blood through the body.");
        let default_label = classify(&q, &AnalysisOptions::default());
        let mut options = AnalysisOptions::default();
        options.difficulty_thresholds.easy_max = default_label.score;
        options.difficulty_thresholds.medium_max = default_label.score + 1;
        let label = classify(&q, &options);
        assert_eq!(label.score, default_label.score);
        assert_eq!(label.level, DifficultyLevel::Easy);
    }

    #[test]
    fn cues_match_whole_words_only() {
        let label = classify_text("Who enlisted in the army statewide?");
        assert!(label.cues.is_empty(), "unexpected cues: {:?}", label.cues);
    }

    #[test]
    fn deterministic() {
        let text = "Design and justify an experiment to compare two fertilizers.";
        assert_eq!(classify_text(text), classify_text(text));
    }
}
