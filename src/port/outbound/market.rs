//! Market-data port: spot prices and option chains.

use async_trait::async_trait;

use crate::domain::id::Ticker;
use crate::domain::option::OptionQuote;
use crate::error::Result;

/// Source of spot prices and option chains.
///
/// Quotes must already be validated through the
/// [`OptionQuoteBuilder`](crate::domain::option::OptionQuoteBuilder), with
/// time to expiry resolved.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Latest spot price, `None` when the source has no usable price.
    async fn spot(&self, ticker: &Ticker) -> Result<Option<f64>>;

    /// All listed contracts for the ticker.
    async fn chain(&self, ticker: &Ticker) -> Result<Vec<OptionQuote>>;
}
