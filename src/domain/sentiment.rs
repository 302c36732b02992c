//! Headline sentiment aggregation and per-ticker attribution.
//!
//! Scores arrive here already classified (each in [-1, 1]). This module only
//! summarizes them: batch statistics, the most positive and negative
//! headlines, and which headlines belong to which ticker.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::Ticker;

/// Mean, population standard deviation and count of a batch of scores.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SentimentSummary {
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
}

impl SentimentSummary {
    /// Summarize a batch of scores. Non-finite scores are ignored.
    ///
    /// An empty batch yields all zeros; check [`has_data`](Self::has_data)
    /// to tell it apart from a genuinely neutral batch.
    #[must_use]
    pub fn from_scores(scores: &[f64]) -> Self {
        let finite: Vec<f64> = scores.iter().copied().filter(|s| s.is_finite()).collect();
        if finite.is_empty() {
            return Self::default();
        }

        let n = finite.len() as f64;
        let mean = finite.iter().sum::<f64>() / n;
        let variance = finite.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

        Self {
            mean,
            std_dev: variance.max(0.0).sqrt(),
            count: finite.len(),
        }
    }

    /// True when at least one score contributed.
    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.count > 0
    }
}

/// A headline as handed in by the news collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeadlineRecord {
    pub title: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: String,
    /// Search query or ticker tag the headline was retrieved under.
    #[serde(default)]
    pub query: Option<String>,
}

impl HeadlineRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

/// A headline with its classifier score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredHeadline {
    pub headline: HeadlineRecord,
    pub score: f64,
}

/// Why a report carries no usable sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentWarning {
    /// The collaborator supplied no headlines.
    NoHeadlines,
    /// Headlines exist but no model could score them.
    ClassifierUnavailable,
}

impl SentimentWarning {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoHeadlines => "no headlines provided",
            Self::ClassifierUnavailable => "no sentiment model could score the headlines",
        }
    }
}

/// Aggregated view over one batch of scored headlines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineReport {
    pub summary: SentimentSummary,
    /// Headlines submitted, scored or not.
    pub headline_count: usize,
    pub headlines: Vec<ScoredHeadline>,
    pub top_positive: Vec<ScoredHeadline>,
    pub top_negative: Vec<ScoredHeadline>,
    pub warning: Option<SentimentWarning>,
}

impl HeadlineReport {
    /// Build a report from scored headlines, keeping `top_n` of each extreme.
    ///
    /// Ties keep input order in both lists.
    #[must_use]
    pub fn build(scored: Vec<ScoredHeadline>, top_n: usize) -> Self {
        let scores: Vec<f64> = scored.iter().map(|h| h.score).collect();
        let summary = SentimentSummary::from_scores(&scores);

        let mut descending = scored.clone();
        descending.sort_by(|a, b| b.score.total_cmp(&a.score));
        let top_positive = descending.into_iter().take(top_n).collect();

        let mut ascending = scored.clone();
        ascending.sort_by(|a, b| a.score.total_cmp(&b.score));
        let top_negative = ascending.into_iter().take(top_n).collect();

        Self {
            summary,
            headline_count: scored.len(),
            warning: scored.is_empty().then_some(SentimentWarning::NoHeadlines),
            headlines: scored,
            top_positive,
            top_negative,
        }
    }

    /// Report for headlines that exist but could not be scored.
    #[must_use]
    pub fn unavailable(headline_count: usize) -> Self {
        Self {
            summary: SentimentSummary::default(),
            headline_count,
            headlines: Vec::new(),
            top_positive: Vec::new(),
            top_negative: Vec::new(),
            warning: Some(SentimentWarning::ClassifierUnavailable),
        }
    }

    /// True when the report carries scores that can be trusted.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.warning.is_none() && self.summary.has_data()
    }
}

/// Tokens of a query tag: uppercased runs of `[A-Z0-9.]`.
fn tag_tokens(tag: &str) -> impl Iterator<Item = &str> + '_ {
    tag.split(|c: char| !(c.is_ascii_alphanumeric() || c == '.'))
        .filter(|token| !token.is_empty())
}

/// Whole-token, case-insensitive match of `ticker` inside a query tag.
///
/// ```
/// use optedge::domain::id::Ticker;
/// use optedge::domain::sentiment::mentions_ticker;
///
/// assert!(mentions_ticker("Apple AAPL", &Ticker::new("AAPL")));
/// assert!(!mentions_ticker("Apple AAPL", &Ticker::new("AA")));
/// ```
#[must_use]
pub fn mentions_ticker(tag: &str, ticker: &Ticker) -> bool {
    tag_tokens(&tag.to_ascii_uppercase()).any(|token| token == ticker.as_str())
}

/// Known tickers (2 to 5 letters) mentioned in a query tag, sorted.
#[must_use]
pub fn tickers_in_tag(tag: &str, known: &BTreeSet<Ticker>) -> Vec<Ticker> {
    let upper = tag.to_ascii_uppercase();
    let found: BTreeSet<Ticker> = upper
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|token| (2..=5).contains(&token.len()))
        .map(Ticker::new)
        .filter(|ticker| known.contains(ticker))
        .collect();
    found.into_iter().collect()
}

/// Headline sentiment resolved for one ticker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TickerSentiment {
    /// Headlines tagged with the ticker exist.
    Own { mean: f64, count: usize },
    /// No headline mentions the ticker; the batch-wide mean stands in.
    Global { mean: f64 },
    /// Nothing was scored at all.
    NoData,
}

impl TickerSentiment {
    /// Scalar sentiment, `None` for [`TickerSentiment::NoData`].
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Own { mean, .. } | Self::Global { mean } => Some(*mean),
            Self::NoData => None,
        }
    }

    /// Scalar sentiment with "no data" read as neutral.
    #[must_use]
    pub fn value_or_neutral(&self) -> f64 {
        self.value().unwrap_or(0.0)
    }
}

/// Resolve headline sentiment for `ticker` from a scored batch.
#[must_use]
pub fn ticker_sentiment(scored: &[ScoredHeadline], ticker: &Ticker) -> TickerSentiment {
    let own: Vec<f64> = scored
        .iter()
        .filter(|h| {
            h.headline
                .query
                .as_deref()
                .is_some_and(|tag| mentions_ticker(tag, ticker))
        })
        .map(|h| h.score)
        .collect();

    let own_summary = SentimentSummary::from_scores(&own);
    if own_summary.has_data() {
        return TickerSentiment::Own {
            mean: own_summary.mean,
            count: own_summary.count,
        };
    }

    let all: Vec<f64> = scored.iter().map(|h| h.score).collect();
    let global = SentimentSummary::from_scores(&all);
    if global.has_data() {
        TickerSentiment::Global { mean: global.mean }
    } else {
        TickerSentiment::NoData
    }
}
