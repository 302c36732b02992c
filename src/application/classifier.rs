//! Headline scoring with primary/fallback model selection.
//!
//! ```text
//! texts --trim/truncate--> HeadlineScorer
//!                               |
//!                               +-- primary: TextClassifier, batched,
//!                               |   per-item retry on batch failure
//!                               +-- fallback: PolarityScorer
//!                               v
//!                          ScoredBatch { scores, model }
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::sentiment::{HeadlineRecord, HeadlineReport, ScoredHeadline};
use crate::port::outbound::classifier::{PolarityScorer, TextClassifier};

/// Which model family produced a batch of scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Primary,
    Fallback,
}

/// Caller's choice of model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelPreference {
    /// Primary when it works, otherwise fallback.
    #[default]
    Auto,
    /// Primary only.
    Primary,
    /// Fallback only.
    Fallback,
}

/// The sentiment models available to this process.
///
/// Built once at startup and handed to whoever scores headlines. Either slot
/// may be empty.
#[derive(Clone, Default)]
pub struct SentimentModels {
    primary: Option<Arc<dyn TextClassifier>>,
    fallback: Option<Arc<dyn PolarityScorer>>,
}

impl SentimentModels {
    #[must_use]
    pub fn new(
        primary: Option<Arc<dyn TextClassifier>>,
        fallback: Option<Arc<dyn PolarityScorer>>,
    ) -> Self {
        Self { primary, fallback }
    }

    #[must_use]
    pub fn with_primary(mut self, primary: Arc<dyn TextClassifier>) -> Self {
        self.primary = Some(primary);
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: Arc<dyn PolarityScorer>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn primary(&self) -> Option<&Arc<dyn TextClassifier>> {
        self.primary.as_ref()
    }

    pub fn fallback(&self) -> Option<&Arc<dyn PolarityScorer>> {
        self.fallback.as_ref()
    }
}

impl fmt::Debug for SentimentModels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentModels")
            .field("primary", &self.primary.as_ref().map(|p| p.name()))
            .field("fallback", &self.fallback.as_ref().map(|p| p.name()))
            .finish()
    }
}

/// Scores in input order, and the model that produced them.
///
/// `model` is `None` when no model could score the batch; the scores are
/// then all zero and must not be read as neutral sentiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredBatch {
    pub scores: Vec<f64>,
    pub model: Option<ModelKind>,
}

impl ScoredBatch {
    fn unavailable(len: usize) -> Self {
        Self {
            scores: vec![0.0; len],
            model: None,
        }
    }
}

/// Batching and truncation limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScorerLimits {
    pub batch_size: usize,
    pub max_chars: usize,
}

impl Default for ScorerLimits {
    fn default() -> Self {
        Self {
            batch_size: 32,
            max_chars: 512,
        }
    }
}

/// Scores headline text with the configured models.
#[derive(Debug, Clone)]
pub struct HeadlineScorer {
    models: SentimentModels,
    limits: ScorerLimits,
}

impl HeadlineScorer {
    #[must_use]
    pub fn new(models: SentimentModels, limits: ScorerLimits) -> Self {
        Self {
            models,
            limits: ScorerLimits {
                batch_size: limits.batch_size.max(1),
                max_chars: limits.max_chars,
            },
        }
    }

    #[must_use]
    pub const fn models(&self) -> &SentimentModels {
        &self.models
    }

    fn prepare(&self, text: &str) -> String {
        text.trim().chars().take(self.limits.max_chars).collect()
    }

    /// Score texts, one score in [-1, 1] per input.
    pub async fn score(&self, texts: &[String], preference: ModelPreference) -> ScoredBatch {
        if texts.is_empty() {
            return ScoredBatch::unavailable(0);
        }
        let prepared: Vec<String> = texts.iter().map(|t| self.prepare(t)).collect();

        if preference != ModelPreference::Fallback {
            if let Some(primary) = &self.models.primary {
                if let Some(scores) = self.score_primary(primary.as_ref(), &prepared).await {
                    return ScoredBatch {
                        scores,
                        model: Some(ModelKind::Primary),
                    };
                }
                warn!(
                    model = primary.name(),
                    count = prepared.len(),
                    "primary classifier scored nothing"
                );
            }
        }

        if preference != ModelPreference::Primary {
            if let Some(fallback) = &self.models.fallback {
                debug!(model = fallback.name(), count = prepared.len(), "scoring with fallback");
                let scores = prepared
                    .iter()
                    .map(|text| {
                        if text.is_empty() {
                            return 0.0;
                        }
                        let score = fallback.polarity(text);
                        if score.is_finite() {
                            score.clamp(-1.0, 1.0)
                        } else {
                            0.0
                        }
                    })
                    .collect();
                return ScoredBatch {
                    scores,
                    model: Some(ModelKind::Fallback),
                };
            }
        }

        warn!(?preference, count = prepared.len(), "no sentiment model available");
        ScoredBatch::unavailable(prepared.len())
    }

    /// Run the primary classifier over non-empty texts in batches.
    ///
    /// Returns `None` when there was something to classify and every call
    /// failed.
    async fn score_primary(
        &self,
        primary: &dyn TextClassifier,
        prepared: &[String],
    ) -> Option<Vec<f64>> {
        let mut scores = vec![0.0; prepared.len()];
        let pending: Vec<usize> = (0..prepared.len())
            .filter(|&i| !prepared[i].is_empty())
            .collect();
        if pending.is_empty() {
            return Some(scores);
        }

        let mut classified = 0_usize;
        for chunk in pending.chunks(self.limits.batch_size) {
            let batch: Vec<String> = chunk.iter().map(|&i| prepared[i].clone()).collect();
            match primary.classify(&batch).await {
                Ok(results) if results.len() == batch.len() => {
                    for (&i, result) in chunk.iter().zip(&results) {
                        scores[i] = result.signed_score();
                    }
                    classified += chunk.len();
                    continue;
                }
                Ok(results) => warn!(
                    model = primary.name(),
                    expected = batch.len(),
                    got = results.len(),
                    "classifier returned wrong result count, retrying items"
                ),
                Err(e) => warn!(
                    model = primary.name(),
                    error = %e,
                    size = batch.len(),
                    "batch classification failed, retrying items"
                ),
            }

            for (&i, text) in chunk.iter().zip(batch) {
                match primary.classify(std::slice::from_ref(&text)).await {
                    Ok(results) => match results.as_slice() {
                        [only] => {
                            scores[i] = only.signed_score();
                            classified += 1;
                        }
                        _ => warn!(index = i, got = results.len(), "item classification malformed"),
                    },
                    Err(e) => warn!(index = i, error = %e, "item classification failed"),
                }
            }
        }

        debug!(model = primary.name(), classified, total = pending.len(), "primary scoring done");
        (classified > 0).then_some(scores)
    }

    /// Score headline titles and aggregate them into a report.
    pub async fn report(
        &self,
        headlines: Vec<HeadlineRecord>,
        preference: ModelPreference,
        top_n: usize,
    ) -> HeadlineReport {
        if headlines.is_empty() {
            return HeadlineReport::build(Vec::new(), top_n);
        }

        let titles: Vec<String> = headlines.iter().map(|h| h.title.clone()).collect();
        let batch = self.score(&titles, preference).await;
        if batch.model.is_none() {
            return HeadlineReport::unavailable(headlines.len());
        }

        let scored = headlines
            .into_iter()
            .zip(batch.scores)
            .map(|(headline, score)| ScoredHeadline { headline, score })
            .collect();
        HeadlineReport::build(scored, top_n)
    }
}
