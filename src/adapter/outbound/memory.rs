//! In-memory rolling sentiment store.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::domain::id::Ticker;
use crate::domain::social::SocialSentimentEvent;
use crate::error::Result;
use crate::port::outbound::store::{
    sort_most_bullish, RollingWindow, SentimentStore, TickerMean,
};

#[derive(Debug, Default)]
struct Log {
    next_seq: u64,
    events: BTreeMap<(DateTime<Utc>, u64), SocialSentimentEvent>,
}

impl Log {
    fn window(&self, window: RollingWindow) -> impl Iterator<Item = &SocialSentimentEvent> {
        self.events.range((window.since, 0)..).map(|(_, event)| event)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Process-local store, ordered by observation time.
///
/// Useful for tests and for short-lived scans that do not need persistence.
#[derive(Debug, Default)]
pub struct MemorySentimentStore {
    log: RwLock<Log>,
}

impl MemorySentimentStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored events.
    pub fn len(&self) -> usize {
        self.log.read().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SentimentStore for MemorySentimentStore {
    async fn append(&self, event: &SocialSentimentEvent) -> Result<()> {
        let mut log = self.log.write();
        let seq = log.next_seq;
        log.next_seq += 1;
        log.events.insert((event.observed_at, seq), event.clone());
        Ok(())
    }

    async fn mean_since(&self, window: RollingWindow) -> Result<Option<f64>> {
        let log = self.log.read();
        Ok(mean(log.window(window).map(|e| e.sentiment)))
    }

    async fn mean_since_for_ticker(
        &self,
        window: RollingWindow,
        ticker: &Ticker,
    ) -> Result<Option<f64>> {
        let log = self.log.read();
        Ok(mean(
            log.window(window)
                .filter(|e| e.mentions(ticker))
                .map(|e| e.sentiment),
        ))
    }

    async fn ticker_means_since(&self, window: RollingWindow) -> Result<Vec<TickerMean>> {
        let log = self.log.read();
        let mut by_ticker: HashMap<&Ticker, (f64, usize)> = HashMap::new();
        for event in log.window(window) {
            for ticker in &event.tickers {
                let entry = by_ticker.entry(ticker).or_insert((0.0, 0));
                entry.0 += event.sentiment;
                entry.1 += 1;
            }
        }

        let mut means: Vec<TickerMean> = by_ticker
            .into_iter()
            .map(|(ticker, (sum, count))| TickerMean {
                ticker: ticker.clone(),
                mean: sum / count as f64,
                count,
            })
            .collect();
        sort_most_bullish(&mut means);
        Ok(means)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(at: DateTime<Utc>, sentiment: f64, tickers: &[&str]) -> SocialSentimentEvent {
        SocialSentimentEvent::new(
            at,
            "feed",
            "text",
            sentiment,
            tickers.iter().copied().map(Ticker::new).collect(),
        )
    }

    #[tokio::test]
    async fn empty_store_has_no_data() {
        let store = MemorySentimentStore::new();
        let window = RollingWindow::trailing(Duration::hours(24));
        assert_eq!(store.mean_since(window).await.unwrap(), None);
        assert!(store.ticker_means_since(window).await.unwrap().is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn same_timestamp_events_are_all_kept() {
        let store = MemorySentimentStore::new();
        let now = Utc::now();
        store.append(&event(now, 0.2, &["SPY"])).await.unwrap();
        store.append(&event(now, 0.4, &["SPY"])).await.unwrap();
        assert_eq!(store.len(), 2);

        let mean = store
            .mean_since_for_ticker(RollingWindow::since(now), &Ticker::new("SPY"))
            .await
            .unwrap()
            .unwrap();
        assert!((mean - 0.3).abs() < 1e-12);
    }

    #[tokio::test]
    async fn old_events_fall_out_of_window() {
        let store = MemorySentimentStore::new();
        let now = Utc::now();
        store.append(&event(now - Duration::hours(30), -1.0, &[])).await.unwrap();
        store.append(&event(now - Duration::hours(1), 0.5, &[])).await.unwrap();

        let window = RollingWindow::ending_at(now, Duration::hours(24));
        assert_eq!(store.mean_since(window).await.unwrap(), Some(0.5));
    }
}
