//! Clarity scoring.
//!
//! Every question starts at 100 and loses points for each problem found.
//! Each penalty records one [`ClarityIssue`] with a stable [`IssueKind`] tag,
//! so findings can be tested and explained independently of the number.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::lexicon::{
    chained_clause_count, ends_with_terminal_punctuation, is_content_word, is_negation,
    is_referring_pronoun, is_vague_noun, is_vague_quantifier, words,
};
use crate::model::{AnalysisOptions, Ordinal, Question};

/// Stable tags for clarity problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    TooShort,
    ExcessiveLength,
    AmbiguousReference,
    CompoundQuestion,
    NegativePhrasing,
    MissingTerminalPunctuation,
}

impl IssueKind {
    /// The serialized tag, e.g. `"compound-question"`.
    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::TooShort => "too-short",
            IssueKind::ExcessiveLength => "excessive-length",
            IssueKind::AmbiguousReference => "ambiguous-reference",
            IssueKind::CompoundQuestion => "compound-question",
            IssueKind::NegativePhrasing => "negative-phrasing",
            IssueKind::MissingTerminalPunctuation => "missing-terminal-punctuation",
        }
    }

    /// Advice shown next to a corpus-level finding.
    pub fn guidance(self) -> &'static str {
        match self {
            IssueKind::TooShort => "Expand one-word prompts into a complete question.",
            IssueKind::ExcessiveLength => "Trim long questions or move context into a preamble.",
            IssueKind::AmbiguousReference => {
                "Replace vague words (it, some, things) with the specific thing being asked about."
            }
            IssueKind::CompoundQuestion => {
                "Split questions that ask for several things into separate parts (a), (b)."
            }
            IssueKind::NegativePhrasing => {
                "Prefer positive wording; if a negative is needed, make it stand out."
            }
            IssueKind::MissingTerminalPunctuation => {
                "End each question with a question mark or full stop."
            }
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One clarity problem in one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarityIssue {
    pub kind: IssueKind,
    pub message: String,
}

/// Clarity score and the issues that reduced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarityAssessment {
    /// `0..=100`, higher is clearer.
    pub score: u8,
    /// In detection order; at most one issue per kind.
    #[serde(default)]
    pub issues: Vec<ClarityIssue>,
}

impl ClarityAssessment {
    pub fn has_issue(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }
}

const MIN_WORDS: usize = 2;
const SHORT_PENALTY: u32 = 10;
const LENGTH_PENALTY: u32 = 10;
/// One extra point per this many words over the ceiling.
const LENGTH_STEP: usize = 5;
const MAX_LENGTH_PENALTY: u32 = 25;
const AMBIGUITY_PENALTY: u32 = 10;
const COMPOUND_PENALTY: u32 = 15;
const NEGATIVE_PENALTY: u32 = 5;
const PUNCTUATION_PENALTY: u32 = 10;

/// Score one question.
pub fn assess(question: &Question, options: &AnalysisOptions) -> ClarityAssessment {
    let text = question.text.as_str();
    let w = words(text);
    let mut penalty = 0u32;
    let mut issues = Vec::new();
    let mut flag = |kind: IssueKind, points: u32, message: String| {
        penalty += points;
        issues.push(ClarityIssue { kind, message });
    };

    if w.len() < MIN_WORDS {
        flag(
            IssueKind::TooShort,
            SHORT_PENALTY,
            format!("only {} word(s); the task is unclear", w.len()),
        );
    }

    if w.len() > options.clarity_word_ceiling {
        let over = w.len() - options.clarity_word_ceiling;
        let points = (LENGTH_PENALTY + (over / LENGTH_STEP) as u32).min(MAX_LENGTH_PENALTY);
        flag(
            IssueKind::ExcessiveLength,
            points,
            format!(
                "{} words exceeds the {}-word ceiling",
                w.len(),
                options.clarity_word_ceiling
            ),
        );
    }

    let vague = vague_terms(&w);
    if !vague.is_empty() {
        flag(
            IssueKind::AmbiguousReference,
            AMBIGUITY_PENALTY,
            format!(
                "vague or unanchored wording without a clear referent: {}",
                vague.join(", ")
            ),
        );
    }

    let clauses = chained_clause_count(text);
    let question_marks = text.matches('?').count();
    if clauses > 0 || question_marks > 1 {
        let message = if clauses > 0 {
            format!(
                "{} clause(s) joined with and/or ask for more than one thing",
                clauses + 1
            )
        } else {
            format!("{question_marks} questions in one item")
        };
        flag(IssueKind::CompoundQuestion, COMPOUND_PENALTY, message);
    }

    if let Some(message) = negative_phrasing(&w) {
        flag(IssueKind::NegativePhrasing, NEGATIVE_PENALTY, message);
    }

    if !ends_with_terminal_punctuation(text) {
        flag(
            IssueKind::MissingTerminalPunctuation,
            PUNCTUATION_PENALTY,
            "does not end with '?', '.' or '!'".to_string(),
        );
    }

    ClarityAssessment {
        score: 100u32.saturating_sub(penalty) as u8,
        issues,
    }
}

/// Vague words that lack a referent, deduplicated in order of appearance.
///
/// - a vague noun (`things`, `stuff`, `etc`) is always vague;
/// - a quantifier (`some`, `many`) is vague unless a content word follows,
///   directly or after `of` and a determiner ("some of the enzymes");
/// - a pronoun (`it`, `they`) is vague when no content word precedes it.
fn vague_terms(w: &[String]) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let mut seen_content = false;

    for (i, word) in w.iter().enumerate() {
        let vague = if is_vague_noun(word) {
            true
        } else if is_vague_quantifier(word) {
            !quantifier_has_referent(w, i)
        } else if is_referring_pronoun(word) {
            !seen_content
        } else {
            false
        };

        if vague && !found.contains(word) {
            found.push(word.clone());
        }
        if is_content_word(word) {
            seen_content = true;
        }
    }
    found
}

fn quantifier_has_referent(w: &[String], i: usize) -> bool {
    let mut j = i + 1;
    if w.get(j).is_some_and(|x| x == "of") {
        j += 1;
        if w
            .get(j)
            .is_some_and(|x| matches!(x.as_str(), "the" | "a" | "an" | "your" | "their" | "our"))
        {
            j += 1;
        }
    }
    w.get(j).is_some_and(|x| is_content_word(x))
}

/// A double negative, or a negative in a selection stem ("Which of the
/// following is NOT ...").
fn negative_phrasing(w: &[String]) -> Option<String> {
    let negations: Vec<&String> = w.iter().filter(|x| is_negation(x)).collect();
    if negations.len() >= 2 {
        return Some(format!(
            "double negative ({})",
            negations
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    let selection_stem = w.iter().any(|x| x == "which" || x == "following");
    match negations.first() {
        Some(neg) if selection_stem || neg.as_str() == "except" => Some(format!(
            "negatively phrased stem ('{neg}') is easy to misread"
        )),
        _ => None,
    }
}

/// Corpus-level summary of one issue kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusFinding {
    pub kind: IssueKind,
    /// Number of questions with this issue.
    pub occurrences: usize,
    /// Ordinals of those questions, ascending.
    pub ordinals: Vec<Ordinal>,
    pub guidance: String,
}

/// Overall judgement on the corpus clarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClarityVerdict {
    Strong,
    Fair,
    NeedsWork,
}

impl ClarityVerdict {
    pub const STRONG_MIN: u8 = 85;
    pub const FAIR_MIN: u8 = 70;

    pub fn from_score(score: u8) -> Self {
        if score >= Self::STRONG_MIN {
            ClarityVerdict::Strong
        } else if score >= Self::FAIR_MIN {
            ClarityVerdict::Fair
        } else {
            ClarityVerdict::NeedsWork
        }
    }
}

impl fmt::Display for ClarityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClarityVerdict::Strong => write!(f, "strong"),
            ClarityVerdict::Fair => write!(f, "fair"),
            ClarityVerdict::NeedsWork => write!(f, "needs work"),
        }
    }
}

/// Corpus clarity: mean score plus findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusClarity {
    pub score: u8,
    pub verdict: ClarityVerdict,
    pub findings: Vec<CorpusFinding>,
}

/// Aggregate per-question assessments.
///
/// The score is the arithmetic mean rounded half-up. Findings are one entry
/// per issue kind, sorted by descending frequency and then by tag.
pub fn summarize<'a, I>(assessments: I) -> Result<CorpusClarity, AnalysisError>
where
    I: IntoIterator<Item = (Ordinal, &'a ClarityAssessment)>,
{
    let mut total: u64 = 0;
    let mut count: u64 = 0;
    let mut by_kind: BTreeMap<IssueKind, Vec<Ordinal>> = BTreeMap::new();

    for (ordinal, assessment) in assessments {
        total += u64::from(assessment.score);
        count += 1;
        for issue in &assessment.issues {
            let ordinals = by_kind.entry(issue.kind).or_default();
            if ordinals.last() != Some(&ordinal) {
                ordinals.push(ordinal);
            }
        }
    }

    if count == 0 {
        return Err(AnalysisError::EmptyAnnotationSet);
    }

    let score = ((2 * total + count) / (2 * count)) as u8;

    let mut findings: Vec<CorpusFinding> = by_kind
        .into_iter()
        .map(|(kind, mut ordinals)| {
            ordinals.sort_unstable();
            ordinals.dedup();
            CorpusFinding {
                kind,
                occurrences: ordinals.len(),
                ordinals,
                guidance: kind.guidance().to_string(),
            }
        })
        .collect();
    findings.sort_by(|a, b| {
        b.occurrences
            .cmp(&a.occurrences)
            .then_with(|| a.kind.as_str().cmp(b.kind.as_str()))
    });

    Ok(CorpusClarity {
        score,
        verdict: ClarityVerdict::from_score(score),
        findings,
    })
}
