//! SQLite social sentiment store implementation.
//!
//! Events land in `social_events`; each ticker tag is also written to
//! `social_event_tickers` so per-ticker windows use an index instead of
//! scanning tag strings. Timestamps are fixed-width RFC 3339 in UTC with
//! nanosecond digits, so text comparison matches time order exactly.

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::dsl::{avg, count_star};
use diesel::prelude::*;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{
    NewSocialEventRow, SocialEventRow, SocialEventTickerRow,
};
use crate::adapter::outbound::sqlite::database::schema::{social_event_tickers, social_events};
use crate::domain::id::Ticker;
use crate::domain::social::SocialSentimentEvent;
use crate::error::{Error, Result};
use crate::port::outbound::store::{
    sort_most_bullish, RollingWindow, SentimentStore, TickerMean,
};

/// Separator of the denormalized ticker list on `social_events`.
const TICKER_SEPARATOR: &str = ",";

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// SQLite-backed rolling sentiment store.
///
/// Implements the [`SentimentStore`] trait for persistent storage of scored
/// social events.
pub struct SqliteSentimentStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteSentimentStore {
    /// Create a new store over a migrated connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(event: &SocialSentimentEvent) -> NewSocialEventRow {
        NewSocialEventRow {
            observed_at: timestamp(event.observed_at),
            source: event.source.clone(),
            body: event.body.clone(),
            sentiment: event.sentiment,
            tickers: event
                .tickers
                .iter()
                .map(Ticker::as_str)
                .collect::<Vec<_>>()
                .join(TICKER_SEPARATOR),
        }
    }

    fn from_row(row: SocialEventRow) -> Result<SocialSentimentEvent> {
        let observed_at = DateTime::parse_from_rfc3339(&row.observed_at)
            .map_err(|e| Error::Parse(e.to_string()))?
            .with_timezone(&Utc);
        let tickers = row
            .tickers
            .split(TICKER_SEPARATOR)
            .filter(|t| !t.is_empty())
            .map(Ticker::new)
            .collect();

        Ok(SocialSentimentEvent {
            observed_at,
            source: row.source,
            body: row.body,
            sentiment: row.sentiment,
            tickers,
        })
    }

    /// Events in the window, oldest first.
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored timestamp is corrupt.
    pub fn events_since(&self, window: RollingWindow) -> Result<Vec<SocialSentimentEvent>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let rows: Vec<SocialEventRow> = social_events::table
            .filter(social_events::observed_at.ge(timestamp(window.since)))
            .order((social_events::observed_at.asc(), social_events::id.asc()))
            .select(SocialEventRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::from_row).collect()
    }
}

impl SentimentStore for SqliteSentimentStore {
    async fn append(&self, event: &SocialSentimentEvent) -> Result<()> {
        let row = Self::to_row(event);
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let event_id: i64 = diesel::insert_into(social_events::table)
                .values(&row)
                .returning(social_events::id)
                .get_result(conn)?;

            let tags: Vec<SocialEventTickerRow> = event
                .tickers
                .iter()
                .map(|ticker| SocialEventTickerRow {
                    event_id,
                    ticker: ticker.as_str().to_string(),
                    observed_at: row.observed_at.clone(),
                })
                .collect();
            if !tags.is_empty() {
                diesel::insert_into(social_event_tickers::table)
                    .values(&tags)
                    .execute(conn)?;
            }
            Ok(())
        })
        .map_err(|e| Error::Database(e.to_string()))
    }

    async fn mean_since(&self, window: RollingWindow) -> Result<Option<f64>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        social_events::table
            .filter(social_events::observed_at.ge(timestamp(window.since)))
            .select(avg(social_events::sentiment))
            .first::<Option<f64>>(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))
    }

    async fn mean_since_for_ticker(
        &self,
        window: RollingWindow,
        ticker: &Ticker,
    ) -> Result<Option<f64>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        social_event_tickers::table
            .inner_join(social_events::table)
            .filter(social_event_tickers::ticker.eq(ticker.as_str()))
            .filter(social_event_tickers::observed_at.ge(timestamp(window.since)))
            .select(avg(social_events::sentiment))
            .first::<Option<f64>>(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))
    }

    async fn ticker_means_since(&self, window: RollingWindow) -> Result<Vec<TickerMean>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let rows: Vec<(String, Option<f64>, i64)> = social_event_tickers::table
            .inner_join(social_events::table)
            .filter(social_event_tickers::observed_at.ge(timestamp(window.since)))
            .group_by(social_event_tickers::ticker)
            .select((
                social_event_tickers::ticker,
                avg(social_events::sentiment),
                count_star(),
            ))
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut means: Vec<TickerMean> = rows
            .into_iter()
            .filter_map(|(ticker, mean, count)| {
                mean.map(|mean| TickerMean {
                    ticker: Ticker::new(ticker),
                    mean,
                    count: usize::try_from(count).unwrap_or(0),
                })
            })
            .collect();
        sort_most_bullish(&mut means);
        Ok(means)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::open;
    use chrono::{Duration, TimeZone};

    fn store() -> (tempfile::TempDir, SqliteSentimentStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("social.db");
        let pool = open(&path.to_string_lossy()).unwrap();
        (dir, SqliteSentimentStore::new(pool))
    }

    fn event(at: DateTime<Utc>, sentiment: f64, tickers: &[&str]) -> SocialSentimentEvent {
        SocialSentimentEvent::new(
            at,
            "r/stocks",
            "body",
            sentiment,
            tickers.iter().copied().map(Ticker::new).collect(),
        )
    }

    #[test]
    fn timestamps_are_fixed_width() {
        let a = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let b = a + Duration::nanoseconds(1_500);
        assert_eq!(timestamp(a), "2024-03-01T09:00:00.000000000Z");
        assert_eq!(timestamp(a).len(), timestamp(b).len());
        assert!(timestamp(a) < timestamp(b));
    }

    #[tokio::test]
    async fn append_and_read_back() {
        let (_dir, store) = store();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        store.append(&event(at, 0.4, &["AAPL", "MSFT"])).await.unwrap();

        let events = store
            .events_since(RollingWindow::since(at - Duration::hours(1)))
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].observed_at, at);
        assert_eq!(events[0].tickers, vec![Ticker::new("AAPL"), Ticker::new("MSFT")]);
    }

    #[tokio::test]
    async fn window_boundary_is_inclusive() {
        let (_dir, store) = store();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        store.append(&event(at, -0.5, &["TSLA"])).await.unwrap();

        assert_eq!(store.mean_since(RollingWindow::since(at)).await.unwrap(), Some(-0.5));
        assert_eq!(
            store
                .mean_since(RollingWindow::since(at + Duration::microseconds(1)))
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn per_ticker_means_use_join_table() {
        let (_dir, store) = store();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        store.append(&event(at, 1.0, &["AAPL", "MSFT"])).await.unwrap();
        store.append(&event(at, 0.0, &["AAPL"])).await.unwrap();
        store.append(&event(at, -1.0, &[])).await.unwrap();

        let window = RollingWindow::since(at);
        assert_eq!(
            store.mean_since_for_ticker(window, &Ticker::new("aapl")).await.unwrap(),
            Some(0.5)
        );
        assert_eq!(
            store.mean_since_for_ticker(window, &Ticker::new("NVDA")).await.unwrap(),
            None
        );

        let means = store.ticker_means_since(window).await.unwrap();
        let tickers: Vec<&str> = means.iter().map(|m| m.ticker.as_str()).collect();
        assert_eq!(tickers, ["MSFT", "AAPL"]);
        assert_eq!(means[1].count, 2);
    }
}
