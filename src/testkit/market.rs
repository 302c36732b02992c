//! In-memory market data.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::domain::id::Ticker;
use crate::domain::option::OptionQuote;
use crate::error::{Error, Result};
use crate::port::outbound::market::MarketData;

/// Market data served from fixed maps.
///
/// Unknown tickers have no spot and an empty chain. Tickers registered with
/// [`with_failure`](Self::with_failure) fail every call.
#[derive(Debug, Default, Clone)]
pub struct StaticMarketData {
    spots: HashMap<Ticker, f64>,
    chains: HashMap<Ticker, Vec<OptionQuote>>,
    failing: HashSet<Ticker>,
}

impl StaticMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_spot(mut self, ticker: impl Into<Ticker>, spot: f64) -> Self {
        self.spots.insert(ticker.into(), spot);
        self
    }

    #[must_use]
    pub fn with_chain(mut self, ticker: impl Into<Ticker>, chain: Vec<OptionQuote>) -> Self {
        self.chains.insert(ticker.into(), chain);
        self
    }

    #[must_use]
    pub fn with_failure(mut self, ticker: impl Into<Ticker>) -> Self {
        self.failing.insert(ticker.into());
        self
    }

    fn check(&self, ticker: &Ticker) -> Result<()> {
        if self.failing.contains(ticker) {
            return Err(Error::Connection(format!("market data unavailable for {ticker}")));
        }
        Ok(())
    }
}

#[async_trait]
impl MarketData for StaticMarketData {
    async fn spot(&self, ticker: &Ticker) -> Result<Option<f64>> {
        self.check(ticker)?;
        Ok(self.spots.get(ticker).copied())
    }

    async fn chain(&self, ticker: &Ticker) -> Result<Vec<OptionQuote>> {
        self.check(ticker)?;
        Ok(self.chains.get(ticker).cloned().unwrap_or_default())
    }
}
