//! VADER rule-based polarity scorer.

use vader_sentiment::SentimentIntensityAnalyzer;

use crate::port::outbound::classifier::PolarityScorer;

/// Local VADER scorer. Needs no network and never fails.
pub struct Vader {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl Vader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for Vader {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Vader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vader").finish_non_exhaustive()
    }
}

impl PolarityScorer for Vader {
    fn name(&self) -> &'static str {
        "vader"
    }

    fn polarity(&self, text: &str) -> f64 {
        let text = text.trim();
        if text.is_empty() {
            return 0.0;
        }
        let compound = self
            .analyzer
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0);
        if compound.is_finite() {
            compound.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }
}
