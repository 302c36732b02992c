//! Multi-ticker opportunity scan.
//!
//! ```text
//! headlines --HeadlineScorer--> scored batch (once)
//!                                    |
//! tickers --buffer_unordered(workers)--> per ticker:
//!     spot -> chain -> price_chain -> ticker_sentiment
//!          -> SocialBlend::fuse -> OpportunityEngine::score -> rank
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::classifier::{HeadlineScorer, ModelPreference};
use super::sentiment::{FusedSentiment, SocialBlend};
use crate::domain::id::Ticker;
use crate::domain::pricing::price_chain;
use crate::domain::score::{rank_by_magnitude, OpportunityEngine, OpportunityRecord};
use crate::domain::sentiment::{ticker_sentiment, HeadlineRecord, HeadlineReport};
use crate::port::outbound::market::MarketData;
use crate::port::outbound::store::SentimentStore;

/// Scan tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanSettings {
    /// Continuously compounded risk-free rate.
    pub risk_free_rate: f64,
    /// Tickers processed concurrently.
    pub workers: usize,
    /// Records kept per ticker, by |normalized score|.
    pub top_per_ticker: usize,
    /// Model choice for headline scoring.
    pub preference: ModelPreference,
    /// Extremes kept in the headline report.
    pub top_headlines: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.045,
            workers: 4,
            top_per_ticker: 25,
            preference: ModelPreference::Auto,
            top_headlines: 3,
        }
    }
}

/// Why a ticker produced no records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    NoSpot,
    EmptyChain,
    MarketData(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSpot => write!(f, "spot price unavailable"),
            Self::EmptyChain => write!(f, "option chain empty"),
            Self::MarketData(e) => write!(f, "market data error: {e}"),
        }
    }
}

/// Result for one scanned ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerScan {
    pub ticker: Ticker,
    pub spot: f64,
    pub sentiment: FusedSentiment,
    /// Top records, largest |normalized score| first.
    pub records: Vec<OpportunityRecord>,
}

/// A ticker that was skipped and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedTicker {
    pub ticker: Ticker,
    pub reason: SkipReason,
}

/// Outcome of a full scan, in input ticker order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub as_of: DateTime<Utc>,
    pub headlines: HeadlineReport,
    pub tickers: Vec<TickerScan>,
    pub skipped: Vec<SkippedTicker>,
}

impl ScanReport {
    /// All records across tickers, largest |normalized score| first.
    #[must_use]
    pub fn ranked(&self) -> Vec<&OpportunityRecord> {
        let mut records: Vec<&OpportunityRecord> =
            self.tickers.iter().flat_map(|t| t.records.iter()).collect();
        records.sort_by(|a, b| b.normalized_score.abs().total_cmp(&a.normalized_score.abs()));
        records
    }
}

/// Scans tickers for mispriced contracts.
pub struct Scanner<S> {
    market: Arc<dyn MarketData>,
    headlines: HeadlineScorer,
    blend: SocialBlend<S>,
    engine: OpportunityEngine,
    settings: ScanSettings,
}

impl<S: SentimentStore> Scanner<S> {
    pub fn new(
        market: Arc<dyn MarketData>,
        headlines: HeadlineScorer,
        blend: SocialBlend<S>,
        engine: OpportunityEngine,
        settings: ScanSettings,
    ) -> Self {
        Self {
            market,
            headlines,
            blend,
            engine,
            settings: ScanSettings {
                workers: settings.workers.max(1),
                ..settings
            },
        }
    }

    pub fn settings(&self) -> &ScanSettings {
        &self.settings
    }

    /// Scan `tickers` as of now.
    pub async fn scan(&self, tickers: &[Ticker], headlines: Vec<HeadlineRecord>) -> ScanReport {
        self.scan_at(tickers, headlines, Utc::now()).await
    }

    /// Scan `tickers`, reading the social window that ends at `as_of`.
    ///
    /// Headlines are scored once and attributed per ticker. Tickers that fail
    /// are logged and listed in [`ScanReport::skipped`]; the rest proceed.
    pub async fn scan_at(
        &self,
        tickers: &[Ticker],
        headlines: Vec<HeadlineRecord>,
        as_of: DateTime<Utc>,
    ) -> ScanReport {
        let report = self
            .headlines
            .report(headlines, self.settings.preference, self.settings.top_headlines)
            .await;
        if let Some(warning) = report.warning {
            warn!(warning = warning.message(), "headline sentiment unavailable");
        }

        let mut outcomes: Vec<(usize, Result<TickerScan, SkippedTicker>)> =
            stream::iter(tickers.iter().enumerate())
                .map(|(index, ticker)| {
                    let report = &report;
                    async move { (index, self.scan_ticker(ticker, report, as_of).await) }
                })
                .buffer_unordered(self.settings.workers)
                .collect()
                .await;
        outcomes.sort_by_key(|(index, _)| *index);

        let mut scans = Vec::new();
        let mut skipped = Vec::new();
        for (_, outcome) in outcomes {
            match outcome {
                Ok(scan) => scans.push(scan),
                Err(skip) => skipped.push(skip),
            }
        }

        info!(
            scanned = scans.len(),
            skipped = skipped.len(),
            records = scans.iter().map(|s| s.records.len()).sum::<usize>(),
            "scan complete"
        );

        ScanReport {
            as_of,
            headlines: report,
            tickers: scans,
            skipped,
        }
    }

    async fn scan_ticker(
        &self,
        ticker: &Ticker,
        report: &HeadlineReport,
        as_of: DateTime<Utc>,
    ) -> Result<TickerScan, SkippedTicker> {
        let skip = |reason: SkipReason| {
            warn!(ticker = %ticker, reason = %reason, "skipping ticker");
            SkippedTicker {
                ticker: ticker.clone(),
                reason,
            }
        };

        let spot = match self.market.spot(ticker).await {
            Ok(Some(spot)) if spot.is_finite() && spot > 0.0 => spot,
            Ok(_) => return Err(skip(SkipReason::NoSpot)),
            Err(e) => return Err(skip(SkipReason::MarketData(e.to_string()))),
        };
        let chain = match self.market.chain(ticker).await {
            Ok(chain) if !chain.is_empty() => chain,
            Ok(_) => return Err(skip(SkipReason::EmptyChain)),
            Err(e) => return Err(skip(SkipReason::MarketData(e.to_string()))),
        };

        let params = self.engine.params();
        let priced = price_chain(
            &chain,
            spot,
            self.settings.risk_free_rate,
            params.iv_ceiling,
            params.gap_floor,
        );
        let headline = ticker_sentiment(&report.headlines, ticker);
        let sentiment = self.blend.fuse(ticker, headline, as_of).await;
        let records = rank_by_magnitude(
            self.engine.score(&priced, sentiment.value),
            self.settings.top_per_ticker,
        );

        debug!(
            ticker = %ticker,
            spot,
            contracts = chain.len(),
            kept = records.len(),
            sentiment = sentiment.value,
            "scored ticker"
        );

        Ok(TickerScan {
            ticker: ticker.clone(),
            spot,
            sentiment,
            records,
        })
    }
}
