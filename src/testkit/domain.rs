//! Builders for domain primitives used across tests.
//!
//! Provides concise factory functions for quotes, chains, headlines and
//! social events so tests focus on assertions rather than construction
//! boilerplate.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::id::Ticker;
use crate::domain::option::{OptionQuote, OptionQuoteBuilder, OptionSide};
use crate::domain::pricing::theoretical_price;
use crate::domain::sentiment::{HeadlineRecord, ScoredHeadline};
use crate::domain::social::SocialSentimentEvent;

/// Fixed reference instant for deterministic tests.
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 14, 30, 0)
        .single()
        .unwrap_or_default()
}

/// Builder pre-filled with a liquid quarter-year contract.
///
/// Set bid/ask (or last price) on the returned builder before building.
pub fn quote_builder(ticker: &str, side: OptionSide, strike: f64) -> OptionQuoteBuilder {
    let now = reference_time();
    OptionQuote::builder()
        .ticker(ticker)
        .side(side)
        .strike(strike)
        .expiration(now + Duration::days(91))
        .time_to_expiry(0.25)
        .volume(250)
        .open_interest(1_000)
        .implied_volatility(0.3)
}

/// Two-sided quote with the given bid and ask.
///
/// # Panics
/// Panics if the inputs fail quote validation.
pub fn quote(ticker: &str, side: OptionSide, strike: f64, bid: f64, ask: f64) -> OptionQuote {
    quote_builder(ticker, side, strike)
        .bid(bid)
        .ask(ask)
        .last_price((bid + ask) / 2.0)
        .build()
        .unwrap_or_else(|e| panic!("invalid test quote: {e}"))
}

/// Chain of calls and puts at 90/100/110% of spot.
///
/// Each contract is quoted around its model value at `rate` and 30% vol,
/// with mids shifted by `mispricing` (a fraction of the model value) and a
/// 2% wide spread.
pub fn chain(ticker: &str, spot: f64, rate: f64, mispricing: f64) -> Vec<OptionQuote> {
    let mut quotes = Vec::new();
    for moneyness in [0.9, 1.0, 1.1] {
        let strike = (spot * moneyness * 100.0).round() / 100.0;
        for side in [OptionSide::Call, OptionSide::Put] {
            let theo = theoretical_price(spot, strike, 0.25, rate, 0.3, side).unwrap_or(0.01);
            let mid = (theo * (1.0 + mispricing)).max(0.02);
            quotes.push(quote(ticker, side, strike, mid * 0.99, mid * 1.01));
        }
    }
    quotes
}

/// Headline tagged with a query.
pub fn headline(title: &str, query: &str) -> HeadlineRecord {
    HeadlineRecord::new(title).with_query(query).with_source("test")
}

/// Scored headline tagged with a query.
pub fn scored(title: &str, query: &str, score: f64) -> ScoredHeadline {
    ScoredHeadline {
        headline: headline(title, query),
        score,
    }
}

/// Social event at `at` tagged with `tickers`.
pub fn social_event(at: DateTime<Utc>, sentiment: f64, tickers: &[&str]) -> SocialSentimentEvent {
    SocialSentimentEvent::new(
        at,
        "test-feed",
        format!("event at {at}"),
        sentiment,
        tickers.iter().copied().map(Ticker::new).collect(),
    )
}
