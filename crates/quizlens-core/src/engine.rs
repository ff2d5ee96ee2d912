//! Pipeline entry points.
//!
//! [`analyze`] runs load, segment, classify and aggregate in one synchronous
//! pass. [`AnalysisEngine`] produces the same report but classifies ordinal
//! ranges on blocking tasks under a concurrency limit, and can bound the
//! load/segment stage with a wall-clock budget.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use crate::bloom::{self, BloomLabel};
use crate::clarity::{self, ClarityAssessment};
use crate::difficulty::{self, DifficultyLabel};
use crate::error::AnalysisError;
use crate::loader::{self, RawDocument};
use crate::model::{AnalysisOptions, Ordinal, Question};
use crate::report::{self, AnalysisReport};
use crate::segmenter;

/// Analyze a document in a single synchronous pass.
pub fn analyze(
    input: &RawDocument,
    options: &AnalysisOptions,
) -> Result<AnalysisReport, AnalysisError> {
    options.validate()?;
    let text = loader::load(input)?;
    let questions = segmenter::segment(&text)?;

    let difficulty: BTreeMap<Ordinal, DifficultyLabel> = questions
        .iter()
        .map(|q| (q.ordinal, difficulty::classify(q, options)))
        .collect();
    let bloom: BTreeMap<Ordinal, BloomLabel> = questions
        .iter()
        .map(|q| (q.ordinal, bloom::classify(q, options)))
        .collect();
    let clarity: BTreeMap<Ordinal, ClarityAssessment> = questions
        .iter()
        .map(|q| (q.ordinal, clarity::assess(q, options)))
        .collect();

    report::aggregate(&questions, &difficulty, &bloom, &clarity)
}

/// Configuration for the async engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum classification tasks running at once.
    pub parallelism: usize,
    /// Questions per classification task.
    pub chunk_size: usize,
    /// Wall-clock budget for loading and segmentation.
    pub time_budget: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallelism: 4,
            chunk_size: 64,
            time_budget: None,
        }
    }
}

/// The three classifiers, as scheduled by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classifier {
    Difficulty,
    Bloom,
    Clarity,
}

impl Classifier {
    pub const ALL: [Classifier; 3] = [
        Classifier::Difficulty,
        Classifier::Bloom,
        Classifier::Clarity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Classifier::Difficulty => "difficulty",
            Classifier::Bloom => "bloom",
            Classifier::Clarity => "clarity",
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_segmented(&self, questions: usize);
    fn on_chunk_classified(&self, classifier: Classifier, ordinals: Range<Ordinal>);
    fn on_complete(&self, report: &AnalysisReport, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_segmented(&self, _: usize) {}
    fn on_chunk_classified(&self, _: Classifier, _: Range<Ordinal>) {}
    fn on_complete(&self, _: &AnalysisReport, _: Duration) {}
}

enum ChunkLabels {
    Difficulty(Vec<(Ordinal, DifficultyLabel)>),
    Bloom(Vec<(Ordinal, BloomLabel)>),
    Clarity(Vec<(Ordinal, ClarityAssessment)>),
}

struct ChunkResult {
    classifier: Classifier,
    /// Half-open ordinal range covered by this chunk.
    ordinals: Range<Ordinal>,
    labels: ChunkLabels,
}

/// The async analysis engine.
pub struct AnalysisEngine {
    config: EngineConfig,
}

impl AnalysisEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze a document. The report is identical to [`analyze`] for the
    /// same input and options.
    pub async fn run(
        &self,
        input: RawDocument,
        options: &AnalysisOptions,
        progress: &dyn ProgressReporter,
    ) -> Result<AnalysisReport, AnalysisError> {
        let start = Instant::now();
        options.validate()?;

        let questions: Arc<[Question]> = self.load_and_segment(input).await?.into();
        progress.on_segmented(questions.len());

        let options = Arc::new(options.clone());
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism.max(1)));
        let chunk_size = self.config.chunk_size.max(1);

        let mut futures = FuturesUnordered::new();
        for chunk_start in (0..questions.len()).step_by(chunk_size) {
            let range = chunk_start..(chunk_start + chunk_size).min(questions.len());
            for classifier in Classifier::ALL {
                futures.push(classify_chunk(
                    classifier,
                    Arc::clone(&questions),
                    range.clone(),
                    Arc::clone(&options),
                    Arc::clone(&semaphore),
                ));
            }
        }
        tracing::debug!(
            questions = questions.len(),
            tasks = futures.len(),
            "classifying"
        );

        let mut difficulty = BTreeMap::new();
        let mut bloom = BTreeMap::new();
        let mut clarity = BTreeMap::new();
        while let Some(result) = futures.next().await {
            let chunk = result?;
            progress.on_chunk_classified(chunk.classifier, chunk.ordinals);
            match chunk.labels {
                ChunkLabels::Difficulty(labels) => difficulty.extend(labels),
                ChunkLabels::Bloom(labels) => bloom.extend(labels),
                ChunkLabels::Clarity(labels) => clarity.extend(labels),
            }
        }

        let report = report::aggregate(&questions, &difficulty, &bloom, &clarity)?;
        progress.on_complete(&report, start.elapsed());
        Ok(report)
    }

    async fn load_and_segment(&self, input: RawDocument) -> Result<Vec<Question>, AnalysisError> {
        let task = tokio::task::spawn_blocking(move || {
            let text = loader::load(&input)?;
            segmenter::segment(&text)
        });

        let joined = match self.config.time_budget {
            Some(budget) => tokio::time::timeout(budget, task).await.map_err(|_| {
                tracing::warn!(budget_ms = budget.as_millis() as u64, "load/segment budget exceeded");
                AnalysisError::AnalysisTimedOut {
                    budget_ms: budget.as_millis() as u64,
                }
            })?,
            None => task.await,
        };
        joined.map_err(|e| worker_failed("segmenter", e))?
    }
}

async fn classify_chunk(
    classifier: Classifier,
    questions: Arc<[Question]>,
    range: Range<usize>,
    options: Arc<AnalysisOptions>,
    semaphore: Arc<Semaphore>,
) -> Result<ChunkResult, AnalysisError> {
    let _permit = semaphore
        .acquire_owned()
        .await
        .map_err(|_| AnalysisError::WorkerFailed("semaphore closed".into()))?;

    tokio::task::spawn_blocking(move || {
        let chunk = &questions[range];
        let ordinals = match (chunk.first(), chunk.last()) {
            (Some(first), Some(last)) => first.ordinal..last.ordinal + 1,
            _ => 0..0,
        };
        let labels = match classifier {
            Classifier::Difficulty => ChunkLabels::Difficulty(
                chunk
                    .iter()
                    .map(|q| (q.ordinal, difficulty::classify(q, &options)))
                    .collect(),
            ),
            Classifier::Bloom => ChunkLabels::Bloom(
                chunk
                    .iter()
                    .map(|q| (q.ordinal, bloom::classify(q, &options)))
                    .collect(),
            ),
            Classifier::Clarity => ChunkLabels::Clarity(
                chunk
                    .iter()
                    .map(|q| (q.ordinal, clarity::assess(q, &options)))
                    .collect(),
            ),
        };
        ChunkResult {
            classifier,
            ordinals,
            labels,
        }
    })
    .await
    .map_err(|e| worker_failed(classifier.name(), e))
}

fn worker_failed(stage: &str, e: tokio::task::JoinError) -> AnalysisError {
    tracing::error!(stage, error = %e, "worker task failed");
    AnalysisError::WorkerFailed(format!("{stage}: {e}"))
}
