//! Social-feed items: text cleanup, lexicon sentiment and cashtag extraction.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::id::Ticker;

/// Stored body text is cut to this many characters.
pub const MAX_BODY_CHARS: usize = 500;

/// Each net lexicon hit per word moves the score by this factor before clamping.
const LEXICON_GAIN: f64 = 5.0;

const POSITIVE_WORDS: &[&str] = &[
    "beat", "beating", "beats", "breakout", "breakouts", "breakthrough", "bull", "bullish",
    "bulls", "buy", "call", "calls", "gain", "gains", "green", "growth", "long", "moon",
    "mooning", "optimistic", "outperform", "profit", "profits", "rallies", "rally", "rallying",
    "recovery", "soar", "soaring", "strong", "surge", "surges", "undervalued", "upgrade",
    "upgraded", "win", "winning",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bear", "bearish", "bears", "collapse", "crash", "crashes", "crashing", "downgrade",
    "downgraded", "drop", "drops", "dump", "dumping", "dumps", "fall", "falls", "fear", "loss",
    "losses", "miss", "misses", "missing", "overvalued", "panic", "plunge", "plunges", "put",
    "puts", "recession", "red", "sell", "short", "shorts", "weak", "weakness",
];

static HTML_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]+>").ok());
static WHITESPACE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\s+").ok());
static WORD: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\b[a-z]+\b").ok());
static CASHTAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z]{1,5})\b").ok());

/// Lexicon sentiment of free text in [-1, 1].
///
/// Words are whole runs of lowercase ASCII letters. The score is the net
/// count of positive over negative words, divided by the word count, scaled
/// and clamped.
#[must_use]
pub fn lexicon_score(text: &str) -> f64 {
    let Some(word) = WORD.as_ref() else {
        return 0.0;
    };
    let lower = text.to_lowercase();
    let words: Vec<&str> = word.find_iter(&lower).map(|m| m.as_str()).collect();
    if words.is_empty() {
        return 0.0;
    }

    let net: i64 = words
        .iter()
        .map(|word| {
            if POSITIVE_WORDS.contains(word) {
                1
            } else if NEGATIVE_WORDS.contains(word) {
                -1
            } else {
                0
            }
        })
        .sum();

    let raw = net as f64 / words.len() as f64;
    (raw * LEXICON_GAIN).clamp(-1.0, 1.0)
}

/// Cashtags (`$AAPL`) in order of first appearance, upper-cased and
/// de-duplicated. A tag is one to five letters ending at a word boundary.
#[must_use]
pub fn extract_cashtags(text: &str) -> Vec<Ticker> {
    let Some(cashtag) = CASHTAG.as_ref() else {
        return Vec::new();
    };
    let mut tickers: Vec<Ticker> = Vec::new();
    for captures in cashtag.captures_iter(text) {
        let Some(symbol) = captures.get(1) else {
            continue;
        };
        let ticker = Ticker::new(symbol.as_str());
        if !tickers.contains(&ticker) {
            tickers.push(ticker);
        }
    }
    tickers
}

/// Replace HTML tags with spaces and collapse whitespace runs.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    let stripped = match HTML_TAG.as_ref() {
        Some(tag) => tag.replace_all(raw, " "),
        None => Cow::Borrowed(raw),
    };
    match WHITESPACE.as_ref() {
        Some(space) => space.replace_all(&stripped, " ").trim().to_string(),
        None => stripped.trim().to_string(),
    }
}

/// One entry from a social or news feed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeedItem {
    /// Feed label, e.g. the channel title or URL.
    pub source: String,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// When the item was observed. Defaults to ingestion time.
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
}

impl FeedItem {
    /// Title, summary and description joined and cleaned for scoring.
    #[must_use]
    pub fn text(&self) -> String {
        let parts = [
            Some(self.title.as_str()),
            self.summary.as_deref(),
            self.description.as_deref(),
        ];
        let joined = parts
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        clean_text(&joined)
    }
}

/// A scored social-feed observation, the unit of the rolling store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialSentimentEvent {
    pub observed_at: DateTime<Utc>,
    pub source: String,
    pub body: String,
    /// Lexicon sentiment in [-1, 1].
    pub sentiment: f64,
    /// Cashtag tickers, ordered and de-duplicated.
    pub tickers: Vec<Ticker>,
}

impl SocialSentimentEvent {
    /// Score a feed item observed at `observed_at`.
    #[must_use]
    pub fn from_feed_item(item: &FeedItem, observed_at: DateTime<Utc>) -> Self {
        let text = item.text();
        Self {
            observed_at,
            source: item.source.clone(),
            body: item.title.chars().take(MAX_BODY_CHARS).collect(),
            sentiment: lexicon_score(&text),
            tickers: extract_cashtags(&text),
        }
    }

    /// Build an event from already-known parts. Sentiment is clamped to
    /// [-1, 1] and non-finite values become neutral.
    #[must_use]
    pub fn new(
        observed_at: DateTime<Utc>,
        source: impl Into<String>,
        body: impl Into<String>,
        sentiment: f64,
        tickers: Vec<Ticker>,
    ) -> Self {
        let sentiment = if sentiment.is_finite() {
            sentiment.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let mut unique: Vec<Ticker> = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            if !unique.contains(&ticker) {
                unique.push(ticker);
            }
        }
        Self {
            observed_at,
            source: source.into(),
            body: body.into(),
            sentiment,
            tickers: unique,
        }
    }

    /// True when the event is tagged with `ticker`.
    #[must_use]
    pub fn mentions(&self, ticker: &Ticker) -> bool {
        self.tickers.contains(ticker)
    }
}
