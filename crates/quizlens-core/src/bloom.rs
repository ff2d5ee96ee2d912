//! Bloom's-taxonomy classification.
//!
//! Cue phrases are matched case-insensitively as whole words over the full
//! question text. When cues from several levels match, the highest level
//! wins: the label reflects the hardest skill the question demands. When
//! nothing matches, the configured default level is used and the label is
//! marked low-confidence.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::lexicon::{cue_regex, distinct_matches};
use crate::model::{AnalysisOptions, BloomLevel, Question};

/// Cue table in taxonomy order. Entries are regex fragments; multi-word cues
/// use `\s+` between words. Verb inflections follow the difficulty cue table.
pub const BLOOM_CUES: &[(BloomLevel, &[&str])] = &[
    (
        BloomLevel::Remember,
        &[
            r"defin(?:e|es|ed|ition)",
            r"list",
            r"recall",
            r"name",
            r"state",
            r"identify",
            r"label",
            r"memori[sz]e",
            r"recogni[sz]e",
            r"match",
            r"what\s+is",
            r"who\s+(?:was|is|were)",
            r"when\s+did",
        ],
    ),
    (
        BloomLevel::Understand,
        &[
            r"explain(?:s|ed|ing)?",
            r"summari[sz](?:e|es|ed|ing)",
            r"describ(?:e|es|ed|ing)",
            r"interpret(?:s|ed|ing)?",
            r"classif(?:y|ies|ied|ying)",
            r"paraphras(?:e|es|ed|ing)",
            r"discuss(?:es|ed|ing)?",
            r"outlin(?:e|es|ed|ing)",
            r"illustrat(?:e|es|ed|ing)",
            r"in\s+your\s+own\s+words",
            r"what\s+is\s+meant\s+by",
            r"why\s+(?:does|do|is|are)",
        ],
    ),
    (
        BloomLevel::Apply,
        &[
            r"appl(?:y|ies|ied|ying)",
            // "used" is left out: "what is X used for" asks for recall.
            r"use|using",
            r"solv(?:e|es|ed|ing)",
            r"calculat(?:e|es|ed|ing)",
            r"comput(?:e|es|ed|ing)",
            r"demonstrat(?:e|es|ed|ing)",
            r"implement(?:s|ed|ing)?",
            r"execute",
            r"determine",
            r"show\s+how",
            r"how\s+would\s+you\s+use",
        ],
    ),
    (
        BloomLevel::Analyze,
        &[
            r"analy[sz](?:e|es|ed|ing|is)",
            r"compar(?:e|es|ed|ing|ison)",
            r"contrast(?:s|ed|ing)?",
            r"differentiat(?:e|es|ed|ing)",
            r"distinguish(?:es|ed|ing)?",
            r"examin(?:e|es|ed|ing)",
            r"categori[sz](?:e|es|ed|ing)",
            r"investigat(?:e|es|ed|ing)",
            r"break\s+down",
            r"relationship\s+between",
        ],
    ),
    (
        BloomLevel::Evaluate,
        &[
            r"evaluat(?:e|es|ed|ing|ion)",
            r"justif(?:y|ies|ied|ying|ication)",
            r"critiqu(?:e|es|ed|ing)",
            r"assess(?:es|ed|ing|ment)?",
            r"judg(?:e|es|ed|ing)",
            r"defend(?:s|ed|ing)?",
            r"argu(?:e|es|ed|ing)",
            r"apprais(?:e|es|ed|ing)",
            r"recommend(?:s|ed|ing)?",
            r"to\s+what\s+extent",
        ],
    ),
    (
        BloomLevel::Create,
        &[
            r"design(?:s|ed|ing)?",
            r"creat(?:e|es|ed|ing)",
            r"formulat(?:e|es|ed|ing)",
            r"construct",
            r"develop",
            r"compose",
            r"invent(?:s|ed|ing)?",
            r"propos(?:e|es|ed|ing)",
            r"devis(?:e|es|ed|ing)",
            r"plan(?:s|ned|ning)?",
            r"generat(?:e|es|ed|ing)",
            r"hypothesi[sz](?:e|es|ed|ing)",
        ],
    ),
];

static COMPILED_CUES: LazyLock<Vec<(BloomLevel, Regex)>> = LazyLock::new(|| {
    BLOOM_CUES
        .iter()
        .filter_map(|(level, patterns)| match cue_regex(patterns) {
            Ok(re) => Some((*level, re)),
            Err(e) => {
                tracing::error!(level = %level, error = %e, "skipping invalid Bloom cue pattern");
                None
            }
        })
        .collect()
});

/// Cognitive-level label for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloomLabel {
    pub level: BloomLevel,
    /// Cue phrases that selected `level`, lowercased, in order of appearance.
    #[serde(default)]
    pub matched_cues: Vec<String>,
    /// Every level that had at least one cue, lowest first.
    #[serde(default)]
    pub candidate_levels: Vec<BloomLevel>,
    /// No cue matched and `level` is the configured default.
    #[serde(default)]
    pub low_confidence: bool,
}

/// Classify a question's cognitive level.
pub fn classify(question: &Question, options: &AnalysisOptions) -> BloomLabel {
    let mut best: Option<(BloomLevel, Vec<String>)> = None;
    let mut candidate_levels = Vec::new();

    // Ascending table order, so later matches are always higher levels.
    for (level, re) in COMPILED_CUES.iter() {
        let matches = distinct_matches(re, &question.text);
        if !matches.is_empty() {
            candidate_levels.push(*level);
            best = Some((*level, matches));
        }
    }

    match best {
        Some((level, matched_cues)) => BloomLabel {
            level,
            matched_cues,
            candidate_levels,
            low_confidence: false,
        },
        None => BloomLabel {
            level: options.bloom_default_level,
            matched_cues: Vec::new(),
            candidate_levels,
            low_confidence: true,
        },
    }
}
