//! Stub sentiment models with call recording.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::port::outbound::classifier::{
    Classification, PolarityScorer, SentimentLabel, TextClassifier,
};

/// Classifier that labels every text the same way and records its calls.
///
/// Can be told to reject multi-item batches or any text containing a marker,
/// to exercise per-item retries.
#[derive(Debug)]
pub struct ScriptedClassifier {
    verdict: Classification,
    reject_batches: bool,
    poison: Option<String>,
    seen: Mutex<Vec<String>>,
    batch_sizes: Mutex<Vec<usize>>,
}

impl ScriptedClassifier {
    pub fn new(verdict: Classification) -> Self {
        Self {
            verdict,
            reject_batches: false,
            poison: None,
            seen: Mutex::new(Vec::new()),
            batch_sizes: Mutex::new(Vec::new()),
        }
    }

    pub fn positive(confidence: f64) -> Self {
        Self::new(Classification::new(SentimentLabel::Positive, confidence))
    }

    pub fn negative(confidence: f64) -> Self {
        Self::new(Classification::new(SentimentLabel::Negative, confidence))
    }

    /// Fail every call with more than one text.
    #[must_use]
    pub fn rejecting_batches(mut self) -> Self {
        self.reject_batches = true;
        self
    }

    /// Fail every call containing a text with `marker`.
    #[must_use]
    pub fn poisoned_by(mut self, marker: impl Into<String>) -> Self {
        self.poison = Some(marker.into());
        self
    }

    /// Every text received, in call order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().clone()
    }

    /// Size of each call, in call order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().clone()
    }
}

#[async_trait]
impl TextClassifier for ScriptedClassifier {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn classify(&self, texts: &[String]) -> Result<Vec<Classification>> {
        self.seen.lock().extend(texts.iter().cloned());
        self.batch_sizes.lock().push(texts.len());

        if self.reject_batches && texts.len() > 1 {
            return Err(Error::Classifier("batch rejected".to_string()));
        }
        if let Some(marker) = &self.poison {
            if texts.iter().any(|t| t.contains(marker.as_str())) {
                return Err(Error::Classifier(format!("poisoned input: {marker}")));
            }
        }
        Ok(vec![self.verdict; texts.len()])
    }
}

/// Classifier whose every call fails.
#[derive(Debug, Default)]
pub struct FailingClassifier;

#[async_trait]
impl TextClassifier for FailingClassifier {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn classify(&self, _texts: &[String]) -> Result<Vec<Classification>> {
        Err(Error::Classifier("model unavailable".to_string()))
    }
}

/// Polarity scorer returning the same score for every text.
#[derive(Debug, Clone, Copy)]
pub struct FixedPolarity(pub f64);

impl PolarityScorer for FixedPolarity {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn polarity(&self, _text: &str) -> f64 {
        self.0
    }
}
