//! Social-feed ingestion into the rolling sentiment store.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::social::{FeedItem, SocialSentimentEvent};
use crate::port::outbound::store::SentimentStore;

/// Outcome of one ingestion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    /// Events written to the store.
    pub stored: usize,
    /// Stored events carrying at least one cashtag.
    pub tagged: usize,
    /// Items the store rejected.
    pub failed: usize,
}

/// Scores feed items and appends them to a [`SentimentStore`].
pub struct SocialIngestor<S> {
    store: Arc<S>,
}

impl<S: SentimentStore> SocialIngestor<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Score and store every item. Items without a timestamp are stamped
    /// with the ingestion time. A failed append is logged and counted; the
    /// remaining items are still stored.
    pub async fn ingest(&self, items: &[FeedItem]) -> IngestSummary {
        let now = Utc::now();
        let mut summary = IngestSummary::default();

        for item in items {
            let event = SocialSentimentEvent::from_feed_item(item, item.observed_at.unwrap_or(now));
            match self.store.append(&event).await {
                Ok(()) => {
                    summary.stored += 1;
                    if !event.tickers.is_empty() {
                        summary.tagged += 1;
                    }
                    debug!(
                        source = %event.source,
                        sentiment = event.sentiment,
                        tickers = event.tickers.len(),
                        "stored social event"
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!(source = %item.source, error = %e, "failed to store social event");
                }
            }
        }

        info!(
            stored = summary.stored,
            tagged = summary.tagged,
            failed = summary.failed,
            "social ingestion complete"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::MemorySentimentStore;
    use crate::domain::id::Ticker;
    use crate::port::outbound::store::RollingWindow;
    use crate::testkit::domain::reference_time;
    use chrono::Duration;

    fn item(title: &str) -> FeedItem {
        FeedItem {
            source: "r/wallstreetbets".to_string(),
            title: title.to_string(),
            observed_at: Some(reference_time()),
            ..FeedItem::default()
        }
    }

    #[tokio::test]
    async fn ingests_scores_and_tags() {
        let store = Arc::new(MemorySentimentStore::new());
        let ingestor = SocialIngestor::new(store.clone());

        let summary = ingestor
            .ingest(&[item("$GME to the moon"), item("market crash incoming")])
            .await;
        assert_eq!(
            summary,
            IngestSummary {
                stored: 2,
                tagged: 1,
                failed: 0
            }
        );

        let window = RollingWindow::ending_at(reference_time(), Duration::hours(1));
        let gme = store
            .mean_since_for_ticker(window, &Ticker::new("GME"))
            .await
            .unwrap()
            .unwrap();
        assert!(gme > 0.0);
        assert_eq!(store.len(), 2);
    }
}
