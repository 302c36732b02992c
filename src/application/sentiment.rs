//! Per-ticker sentiment resolution: headline sentiment blended with the
//! rolling social log.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::fusion::fuse;
use crate::domain::id::Ticker;
use crate::domain::sentiment::TickerSentiment;
use crate::port::outbound::store::{RollingWindow, SentimentStore};

/// Where the social value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialScope {
    /// Events tagged with the ticker.
    Ticker,
    /// All events in the window, used when the ticker has none.
    Market,
}

/// Sentiment inputs and result for one ticker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FusedSentiment {
    pub headline: TickerSentiment,
    pub social: Option<f64>,
    pub social_scope: Option<SocialScope>,
    /// Blended scalar fed to the scoring engine.
    pub value: f64,
}

/// Social blending settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendSettings {
    /// Share of the social signal in [0, 1].
    pub weight: f64,
    /// Trailing window of the social log.
    pub window: Duration,
    /// When false the social log is never consulted.
    pub enabled: bool,
}

impl Default for BlendSettings {
    fn default() -> Self {
        Self {
            weight: 0.25,
            window: Duration::hours(24),
            enabled: true,
        }
    }
}

/// Blends headline sentiment with the rolling social store.
pub struct SocialBlend<S> {
    store: Arc<S>,
    settings: BlendSettings,
}

impl<S: SentimentStore> SocialBlend<S> {
    pub fn new(store: Arc<S>, settings: BlendSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &BlendSettings {
        &self.settings
    }

    /// Social sentiment for `ticker` in the window ending at `as_of`.
    ///
    /// Uses the ticker's own events, otherwise the whole log. Store errors
    /// are logged and read as "no data".
    pub async fn social_for(
        &self,
        ticker: &Ticker,
        as_of: DateTime<Utc>,
    ) -> Option<(f64, SocialScope)> {
        if !self.settings.enabled {
            return None;
        }
        let window = RollingWindow::ending_at(as_of, self.settings.window);

        match self.store.mean_since_for_ticker(window, ticker).await {
            Ok(Some(mean)) => return Some((mean, SocialScope::Ticker)),
            Ok(None) => {}
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "ticker social sentiment lookup failed");
            }
        }

        match self.store.mean_since(window).await {
            Ok(mean) => mean.map(|mean| (mean, SocialScope::Market)),
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "market social sentiment lookup failed");
                None
            }
        }
    }

    /// Fuse headline sentiment with social sentiment for one ticker.
    ///
    /// Missing headline sentiment counts as neutral.
    pub async fn fuse(
        &self,
        ticker: &Ticker,
        headline: TickerSentiment,
        as_of: DateTime<Utc>,
    ) -> FusedSentiment {
        let social = self.social_for(ticker, as_of).await;
        let value = fuse(
            headline.value_or_neutral(),
            social.map(|(mean, _)| mean),
            self.settings.weight,
        );
        debug!(
            ticker = %ticker,
            headline = ?headline.value(),
            social = ?social.map(|(mean, _)| mean),
            fused = value,
            "fused sentiment"
        );

        FusedSentiment {
            headline,
            social: social.map(|(mean, _)| mean),
            social_scope: social.map(|(_, scope)| scope),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::MemorySentimentStore;
    use crate::testkit::domain::{reference_time, social_event};

    async fn store_with(events: &[(f64, Vec<&str>)]) -> Arc<MemorySentimentStore> {
        let store = Arc::new(MemorySentimentStore::new());
        for (sentiment, tickers) in events {
            store
                .append(&social_event(reference_time() - Duration::hours(1), *sentiment, tickers))
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn prefers_ticker_events() {
        let store = store_with(&[(0.8, vec!["AAPL"]), (-0.4, vec![])]).await;
        let blend = SocialBlend::new(store, BlendSettings::default());

        let social = blend.social_for(&Ticker::new("AAPL"), reference_time()).await;
        assert_eq!(social, Some((0.8, SocialScope::Ticker)));
    }

    #[tokio::test]
    async fn falls_back_to_market_mean() {
        let store = store_with(&[(0.8, vec!["AAPL"]), (-0.4, vec![])]).await;
        let blend = SocialBlend::new(store, BlendSettings::default());

        let (mean, scope) = blend
            .social_for(&Ticker::new("TSLA"), reference_time())
            .await
            .unwrap();
        assert!((mean - 0.2).abs() < 1e-12);
        assert_eq!(scope, SocialScope::Market);
    }

    #[tokio::test]
    async fn zero_ticker_mean_is_not_missing() {
        let store = store_with(&[(0.0, vec!["AAPL"]), (0.9, vec![])]).await;
        let blend = SocialBlend::new(store, BlendSettings::default());

        let social = blend.social_for(&Ticker::new("AAPL"), reference_time()).await;
        assert_eq!(social, Some((0.0, SocialScope::Ticker)));
    }

    #[tokio::test]
    async fn fuses_with_weight() {
        let store = store_with(&[(1.0, vec!["SPY"])]).await;
        let blend = SocialBlend::new(store, BlendSettings::default());

        let fused = blend
            .fuse(
                &Ticker::new("SPY"),
                TickerSentiment::Own {
                    mean: 0.2,
                    count: 3,
                },
                reference_time(),
            )
            .await;
        assert!((fused.value - 0.4).abs() < 1e-12);
        assert_eq!(fused.social_scope, Some(SocialScope::Ticker));
    }

    #[tokio::test]
    async fn empty_store_leaves_headline_unchanged() {
        let blend = SocialBlend::new(Arc::new(MemorySentimentStore::new()), BlendSettings::default());
        let fused = blend
            .fuse(&Ticker::new("SPY"), TickerSentiment::Global { mean: -0.3 }, reference_time())
            .await;
        assert_eq!(fused.value, -0.3);
        assert_eq!(fused.social, None);
    }

    #[tokio::test]
    async fn disabled_blend_ignores_store() {
        let store = store_with(&[(1.0, vec!["SPY"])]).await;
        let blend = SocialBlend::new(
            store,
            BlendSettings {
                enabled: false,
                ..BlendSettings::default()
            },
        );
        let fused = blend
            .fuse(&Ticker::new("SPY"), TickerSentiment::NoData, reference_time())
            .await;
        assert_eq!(fused.value, 0.0);
        assert_eq!(fused.social, None);
    }
}
