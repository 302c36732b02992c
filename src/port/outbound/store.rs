//! Persistence port for the rolling social sentiment log.
//!
//! The log is append-only. Readers ask for averages over a trailing window;
//! `None` means no event fell inside it, which is distinct from a mean of 0.

use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domain::id::Ticker;
use crate::domain::social::SocialSentimentEvent;
use crate::error::Result;

/// Lower bound of an aggregation window. Events at or after `since` count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingWindow {
    pub since: DateTime<Utc>,
}

impl RollingWindow {
    /// Window starting at an explicit instant.
    #[must_use]
    pub const fn since(since: DateTime<Utc>) -> Self {
        Self { since }
    }

    /// Window covering the last `span` up to now.
    #[must_use]
    pub fn trailing(span: Duration) -> Self {
        Self::ending_at(Utc::now(), span)
    }

    /// Window covering `span` before `as_of`.
    #[must_use]
    pub fn ending_at(as_of: DateTime<Utc>, span: Duration) -> Self {
        Self {
            since: as_of - span,
        }
    }

    /// True when `at` falls inside the window.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.since
    }
}

/// Mean social sentiment of one ticker over a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerMean {
    pub ticker: Ticker,
    pub mean: f64,
    pub count: usize,
}

/// Sort most bullish first; ties by ticker so output is deterministic.
pub fn sort_most_bullish(means: &mut [TickerMean]) {
    means.sort_by(|a, b| b.mean.total_cmp(&a.mean).then_with(|| a.ticker.cmp(&b.ticker)));
}

/// Append-only store of scored social events.
pub trait SentimentStore: Send + Sync {
    /// Record one event.
    fn append(&self, event: &SocialSentimentEvent) -> impl Future<Output = Result<()>> + Send;

    /// Mean sentiment of every event in the window.
    fn mean_since(&self, window: RollingWindow) -> impl Future<Output = Result<Option<f64>>> + Send;

    /// Mean sentiment of the events tagged with `ticker` in the window.
    fn mean_since_for_ticker(
        &self,
        window: RollingWindow,
        ticker: &Ticker,
    ) -> impl Future<Output = Result<Option<f64>>> + Send;

    /// Per-ticker means in the window, most bullish first.
    fn ticker_means_since(
        &self,
        window: RollingWindow,
    ) -> impl Future<Output = Result<Vec<TickerMean>>> + Send;
}
