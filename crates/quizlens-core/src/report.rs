//! Report aggregation.
//!
//! The three classifier outputs are joined by ordinal into one
//! [`QuestionAnnotation`] per question. Every other report field is derived
//! from those annotations and nothing else.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bloom::BloomLabel;
use crate::clarity::{self, ClarityAssessment, ClarityVerdict, CorpusFinding};
use crate::difficulty::DifficultyLabel;
use crate::error::AnalysisError;
use crate::model::{BloomLevel, DifficultyLevel, Ordinal, Question};

/// Count and whole-number percentage for one difficulty level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelShare {
    pub count: usize,
    pub percent: u8,
}

/// Difficulty breakdown. Percentages always sum to exactly 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyDistribution {
    pub easy: LevelShare,
    pub medium: LevelShare,
    pub hard: LevelShare,
}

impl DifficultyDistribution {
    /// Build from per-level counts using largest-remainder rounding.
    ///
    /// Each level first gets `floor(count * 100 / total)`; the points still
    /// missing from 100 go one each to the largest remainders, ties to the
    /// lower difficulty.
    pub fn from_counts(counts: [usize; 3]) -> Self {
        let total: usize = counts.iter().sum();
        let mut percents = [0usize; 3];

        if total > 0 {
            let mut remainders = [(0usize, 0usize); 3];
            for (i, &count) in counts.iter().enumerate() {
                percents[i] = count * 100 / total;
                remainders[i] = (count * 100 % total, i);
            }
            let allocated: usize = percents.iter().sum();
            // Stable sort keeps the lower level first among equal remainders.
            remainders.sort_by(|a, b| b.0.cmp(&a.0));
            for &(_, i) in remainders.iter().take(100 - allocated) {
                percents[i] += 1;
            }
        }

        let share = |i: usize| LevelShare {
            count: counts[i],
            percent: percents[i] as u8,
        };
        Self {
            easy: share(0),
            medium: share(1),
            hard: share(2),
        }
    }

    pub fn get(&self, level: DifficultyLevel) -> LevelShare {
        match level {
            DifficultyLevel::Easy => self.easy,
            DifficultyLevel::Medium => self.medium,
            DifficultyLevel::Hard => self.hard,
        }
    }

    pub fn total(&self) -> usize {
        self.easy.count + self.medium.count + self.hard.count
    }

    pub fn percent_sum(&self) -> u32 {
        u32::from(self.easy.percent) + u32::from(self.medium.percent) + u32::from(self.hard.percent)
    }
}

/// Question counts per Bloom level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloomDistribution {
    pub remember: usize,
    pub understand: usize,
    pub apply: usize,
    pub analyze: usize,
    pub evaluate: usize,
    pub create: usize,
}

impl BloomDistribution {
    pub fn get(&self, level: BloomLevel) -> usize {
        match level {
            BloomLevel::Remember => self.remember,
            BloomLevel::Understand => self.understand,
            BloomLevel::Apply => self.apply,
            BloomLevel::Analyze => self.analyze,
            BloomLevel::Evaluate => self.evaluate,
            BloomLevel::Create => self.create,
        }
    }

    fn increment(&mut self, level: BloomLevel) {
        let slot = match level {
            BloomLevel::Remember => &mut self.remember,
            BloomLevel::Understand => &mut self.understand,
            BloomLevel::Apply => &mut self.apply,
            BloomLevel::Analyze => &mut self.analyze,
            BloomLevel::Evaluate => &mut self.evaluate,
            BloomLevel::Create => &mut self.create,
        };
        *slot += 1;
    }

    pub fn total(&self) -> usize {
        BloomLevel::ALL.iter().map(|l| self.get(*l)).sum()
    }

    /// Levels with at least one question.
    pub fn levels_present(&self) -> usize {
        BloomLevel::ALL.iter().filter(|l| self.get(**l) > 0).count()
    }

    pub fn higher_order(&self) -> usize {
        self.analyze + self.evaluate + self.create
    }

    /// The most common level; ties go to the lower level.
    pub fn dominant(&self) -> Option<BloomLevel> {
        let mut best: Option<(BloomLevel, usize)> = None;
        for level in BloomLevel::ALL {
            let count = self.get(level);
            if count > 0 && best.map_or(true, |(_, c)| count > c) {
                best = Some((level, count));
            }
        }
        best.map(|(level, _)| level)
    }
}

/// The three classifier outputs for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnnotation {
    pub question: Question,
    pub difficulty: DifficultyLabel,
    pub bloom: BloomLabel,
    pub clarity: ClarityAssessment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsightKind {
    ClearStructure,
    CognitiveDiversity,
    BalancedDifficulty,
    MissingCreateLevel,
    LowHigherOrder,
    DifficultySkew,
    WeakCueVerbs,
    ClarityIssues,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightTone {
    Strength,
    Improvement,
}

impl fmt::Display for InsightTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightTone::Strength => write!(f, "strength"),
            InsightTone::Improvement => write!(f, "improvement"),
        }
    }
}

/// A strength or improvement area for the question set as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub tone: InsightTone,
    pub message: String,
}

/// Aggregate analysis of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub question_count: usize,
    pub difficulty: DifficultyDistribution,
    pub bloom: BloomDistribution,
    /// Mean of the per-question clarity scores, rounded half-up.
    pub clarity_score: u8,
    pub clarity_verdict: ClarityVerdict,
    /// One entry per clarity issue kind, most frequent first.
    #[serde(default)]
    pub findings: Vec<CorpusFinding>,
    /// Strengths first, then improvement areas.
    #[serde(default)]
    pub insights: Vec<Insight>,
    /// One per question, in ordinal order.
    pub annotations: Vec<QuestionAnnotation>,
}

impl AnalysisReport {
    pub fn strengths(&self) -> impl Iterator<Item = &Insight> {
        self.insights
            .iter()
            .filter(|i| i.tone == InsightTone::Strength)
    }

    pub fn improvements(&self) -> impl Iterator<Item = &Insight> {
        self.insights
            .iter()
            .filter(|i| i.tone == InsightTone::Improvement)
    }

    /// One-paragraph overall assessment.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Analyzed {} question{}. Clarity is {} ({}/100). Difficulty: {}% easy, {}% medium, {}% hard.",
            self.question_count,
            if self.question_count == 1 { "" } else { "s" },
            self.clarity_verdict,
            self.clarity_score,
            self.difficulty.easy.percent,
            self.difficulty.medium.percent,
            self.difficulty.hard.percent,
        );
        if let Some(level) = self.bloom.dominant() {
            out.push_str(&format!(" Most questions target the {level} level."));
        }
        let focus: Vec<&str> = self
            .improvements()
            .take(2)
            .map(|i| i.message.as_str())
            .collect();
        if focus.is_empty() {
            out.push_str(" No major improvement areas were found.");
        } else {
            out.push_str(" Focus: ");
            out.push_str(&focus.join(" "));
        }
        out
    }
}

/// Join classifier outputs by ordinal and build the report.
pub fn aggregate(
    questions: &[Question],
    difficulty: &BTreeMap<Ordinal, DifficultyLabel>,
    bloom: &BTreeMap<Ordinal, BloomLabel>,
    clarity: &BTreeMap<Ordinal, ClarityAssessment>,
) -> Result<AnalysisReport, AnalysisError> {
    if questions.is_empty() {
        tracing::error!("aggregator invoked with zero questions");
        return Err(AnalysisError::EmptyAnnotationSet);
    }

    let mut annotations = Vec::with_capacity(questions.len());
    for question in questions {
        let ordinal = question.ordinal;
        annotations.push(QuestionAnnotation {
            question: question.clone(),
            difficulty: lookup(difficulty, ordinal, "difficulty")?.clone(),
            bloom: lookup(bloom, ordinal, "bloom")?.clone(),
            clarity: lookup(clarity, ordinal, "clarity")?.clone(),
        });
    }
    annotations.sort_by_key(|a| a.question.ordinal);

    from_annotations(annotations)
}

fn lookup<'a, T>(
    labels: &'a BTreeMap<Ordinal, T>,
    ordinal: Ordinal,
    classifier: &'static str,
) -> Result<&'a T, AnalysisError> {
    labels.get(&ordinal).ok_or_else(|| {
        tracing::error!(ordinal, classifier, "missing classifier output at join");
        AnalysisError::IncompleteAnnotation {
            ordinal,
            classifier,
        }
    })
}

/// Derive every report field from a complete annotation list.
pub fn from_annotations(
    annotations: Vec<QuestionAnnotation>,
) -> Result<AnalysisReport, AnalysisError> {
    if annotations.is_empty() {
        tracing::error!("report requested for zero annotations");
        return Err(AnalysisError::EmptyAnnotationSet);
    }

    let corpus = clarity::summarize(
        annotations
            .iter()
            .map(|a| (a.question.ordinal, &a.clarity)),
    )?;

    let mut difficulty_counts = [0usize; 3];
    let mut bloom = BloomDistribution::default();
    for a in &annotations {
        difficulty_counts[a.difficulty.level as usize] += 1;
        bloom.increment(a.bloom.level);
    }
    let difficulty = DifficultyDistribution::from_counts(difficulty_counts);

    let insights = derive_insights(&annotations, &difficulty, &bloom, corpus.verdict);

    let report = AnalysisReport {
        question_count: annotations.len(),
        difficulty,
        bloom,
        clarity_score: corpus.score,
        clarity_verdict: corpus.verdict,
        findings: corpus.findings,
        insights,
        annotations,
    };
    tracing::info!(
        questions = report.question_count,
        clarity = report.clarity_score,
        "report complete"
    );
    Ok(report)
}

/// Distinct Bloom levels needed to call a set cognitively diverse.
const DIVERSITY_MIN_LEVELS: usize = 4;
/// Higher-order share below which the set leans on lower-order skills.
const HIGHER_ORDER_MIN_PERCENT: usize = 30;
/// A difficulty level holding more than this share skews the set.
const SKEW_MAX_PERCENT: u8 = 60;
/// Share of questions without cue verbs that warrants a note.
const WEAK_CUE_MIN_PERCENT: usize = 25;
/// Distribution-based insights need at least this many questions.
const MIN_QUESTIONS_FOR_BALANCE: usize = 3;

fn derive_insights(
    annotations: &[QuestionAnnotation],
    difficulty: &DifficultyDistribution,
    bloom: &BloomDistribution,
    verdict: ClarityVerdict,
) -> Vec<Insight> {
    let n = annotations.len();
    let mut strengths = Vec::new();
    let mut improvements = Vec::new();
    let strength = |kind, message: String| Insight {
        kind,
        tone: InsightTone::Strength,
        message,
    };
    let improvement = |kind, message: String| Insight {
        kind,
        tone: InsightTone::Improvement,
        message,
    };

    let unclear = annotations
        .iter()
        .filter(|a| !a.clarity.issues.is_empty())
        .count();
    if verdict == ClarityVerdict::Strong {
        strengths.push(strength(
            InsightKind::ClearStructure,
            "Clear question structure: most questions are specific and well formed.".into(),
        ));
    } else {
        improvements.push(improvement(
            InsightKind::ClarityIssues,
            format!("{unclear} of {n} questions have clarity issues; make them more specific."),
        ));
    }

    let levels = bloom.levels_present();
    if levels >= DIVERSITY_MIN_LEVELS {
        strengths.push(strength(
            InsightKind::CognitiveDiversity,
            format!("Good cognitive diversity: {levels} of 6 Bloom levels are covered."),
        ));
    }

    if n >= MIN_QUESTIONS_FOR_BALANCE {
        let skewed = DifficultyLevel::ALL
            .into_iter()
            .map(|l| (l, difficulty.get(l).percent))
            .find(|(_, p)| *p > SKEW_MAX_PERCENT);
        match skewed {
            Some((level, percent)) => improvements.push(improvement(
                InsightKind::DifficultySkew,
                format!(
                    "Balance the difficulty distribution: {percent}% of questions are {}.",
                    level.to_string().to_lowercase()
                ),
            )),
            None => strengths.push(strength(
                InsightKind::BalancedDifficulty,
                "Balanced difficulty: no single level dominates the set.".into(),
            )),
        }
    }

    if bloom.create == 0 {
        improvements.push(improvement(
            InsightKind::MissingCreateLevel,
            "Consider adding Create-level questions (design, formulate, propose).".into(),
        ));
    }

    let higher = bloom.higher_order();
    if higher * 100 < HIGHER_ORDER_MIN_PERCENT * n {
        improvements.push(improvement(
            InsightKind::LowHigherOrder,
            format!(
                "Only {higher} of {n} questions target Analyze, Evaluate or Create; add more higher-order prompts."
            ),
        ));
    }

    let weak = annotations.iter().filter(|a| a.bloom.low_confidence).count();
    if weak > 0 && weak * 100 >= WEAK_CUE_MIN_PERCENT * n {
        improvements.push(improvement(
            InsightKind::WeakCueVerbs,
            format!(
                "{weak} of {n} questions lack a clear instruction verb; state the task explicitly."
            ),
        ));
    }

    strengths.extend(improvements);
    strengths
}
