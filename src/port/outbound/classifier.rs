//! Sentiment model ports.
//!
//! Two kinds of models score headlines: a batch text classifier (the primary,
//! usually a hosted transformer) and a cheap synchronous polarity scorer
//! used when the primary is unavailable.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Label assigned by a text classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Parse a model label, case-insensitively. Unknown labels are neutral.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            _ => Self::Neutral,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// One classifier verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: SentimentLabel,
    pub confidence: f64,
}

impl Classification {
    #[must_use]
    pub const fn new(label: SentimentLabel, confidence: f64) -> Self {
        Self { label, confidence }
    }

    /// Signed score in [-1, 1]: `+confidence`, `-confidence` or zero.
    #[must_use]
    pub fn signed_score(&self) -> f64 {
        if !self.confidence.is_finite() {
            return 0.0;
        }
        let signed = match self.label {
            SentimentLabel::Positive => self.confidence,
            SentimentLabel::Negative => -self.confidence,
            SentimentLabel::Neutral => 0.0,
        };
        signed.clamp(-1.0, 1.0)
    }
}

/// Batch text classifier.
///
/// # Errors
///
/// [`classify`](Self::classify) fails on transport or decoding errors. A
/// successful call returns one classification per input, in input order;
/// callers must still check the length.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    /// Return the provider name for logging.
    fn name(&self) -> &'static str;

    /// Classify a batch of texts.
    async fn classify(&self, texts: &[String]) -> Result<Vec<Classification>>;
}

/// Synchronous polarity scorer returning a compound score in [-1, 1].
pub trait PolarityScorer: Send + Sync {
    /// Return the scorer name for logging.
    fn name(&self) -> &'static str;

    /// Score one text.
    fn polarity(&self, text: &str) -> f64;
}
