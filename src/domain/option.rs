//! Option contract quotes with builder-based validation.
//!
//! Market-data collaborators hand the core loosely typed rows; this module is
//! where they become a strongly typed, validated [`OptionQuote`]. Once built a
//! quote is immutable and the scoring pipeline trusts its fields.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::Ticker;

/// Seconds in a 365-day year, used for year-fraction conversion.
const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 3600.0;

/// Side of an option contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSide {
    /// Right to buy the underlying at the strike.
    Call,
    /// Right to sell the underlying at the strike.
    Put,
}

impl OptionSide {
    /// Directional sign of the contract: `+1` for calls, `-1` for puts.
    #[must_use]
    pub const fn direction(self) -> f64 {
        match self {
            Self::Call => 1.0,
            Self::Put => -1.0,
        }
    }
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// Year fraction between `as_of` and `expiration`, floored at zero.
#[must_use]
pub fn years_to_expiry(expiration: DateTime<Utc>, as_of: DateTime<Utc>) -> f64 {
    let seconds = (expiration - as_of).num_milliseconds() as f64 / 1000.0;
    seconds.max(0.0) / SECONDS_PER_YEAR
}

/// A single quoted option contract.
///
/// Use [`OptionQuote::builder`] to construct instances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionQuote {
    ticker: Ticker,
    contract_symbol: String,
    expiration: DateTime<Utc>,
    side: OptionSide,
    strike: f64,
    last_price: f64,
    bid: f64,
    ask: f64,
    volume: u64,
    open_interest: u64,
    implied_volatility: Option<f64>,
    time_to_expiry: f64,
}

impl OptionQuote {
    /// Create a new builder for constructing an `OptionQuote`.
    pub fn builder() -> OptionQuoteBuilder {
        OptionQuoteBuilder::new()
    }

    /// Underlying symbol.
    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Exchange contract symbol (may be empty when the source omits it).
    pub fn contract_symbol(&self) -> &str {
        &self.contract_symbol
    }

    /// Expiration timestamp.
    pub fn expiration(&self) -> DateTime<Utc> {
        self.expiration
    }

    /// Call or put.
    pub fn side(&self) -> OptionSide {
        self.side
    }

    /// Strike price.
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Last traded price.
    pub fn last_price(&self) -> f64 {
        self.last_price
    }

    /// Best bid; zero when there is no bid.
    pub fn bid(&self) -> f64 {
        self.bid
    }

    /// Best ask; zero when there is no ask.
    pub fn ask(&self) -> f64 {
        self.ask
    }

    /// Contracts traded in the session.
    pub fn volume(&self) -> u64 {
        self.volume
    }

    /// Open contracts.
    pub fn open_interest(&self) -> u64 {
        self.open_interest
    }

    /// Implied volatility as reported by the source, if any.
    pub fn implied_volatility(&self) -> Option<f64> {
        self.implied_volatility
    }

    /// Time to expiry in years.
    pub fn time_to_expiry(&self) -> f64 {
        self.time_to_expiry
    }

    /// True when both sides of the book are quoted.
    pub fn has_two_sided_quote(&self) -> bool {
        self.bid > 0.0 && self.ask > 0.0
    }

    /// Mid price: bid/ask midpoint when both sides are quoted, otherwise the
    /// last traded price.
    pub fn mid_price(&self) -> f64 {
        if self.has_two_sided_quote() {
            (self.bid + self.ask) / 2.0
        } else {
            self.last_price
        }
    }

    /// Volume plus open interest, the trading-interest measure used for
    /// liquidity and risk.
    pub fn interest(&self) -> u64 {
        self.volume.saturating_add(self.open_interest)
    }
}

/// Builder for constructing [`OptionQuote`] instances.
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use optedge::domain::option::{OptionQuote, OptionSide};
///
/// let now = Utc::now();
/// let quote = OptionQuote::builder()
///     .ticker("SPY")
///     .side(OptionSide::Call)
///     .strike(500.0)
///     .expiration(now + Duration::days(30))
///     .as_of(now)
///     .bid(4.9)
///     .ask(5.1)
///     .build()
///     .unwrap();
///
/// assert!((quote.mid_price() - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Default)]
pub struct OptionQuoteBuilder {
    ticker: Option<String>,
    contract_symbol: Option<String>,
    expiration: Option<DateTime<Utc>>,
    side: Option<OptionSide>,
    strike: Option<f64>,
    last_price: f64,
    bid: f64,
    ask: f64,
    volume: u64,
    open_interest: u64,
    implied_volatility: Option<f64>,
    time_to_expiry: Option<f64>,
    as_of: Option<DateTime<Utc>>,
}

impl OptionQuoteBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the underlying symbol.
    pub fn ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = Some(ticker.into());
        self
    }

    /// Set the exchange contract symbol.
    pub fn contract_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.contract_symbol = Some(symbol.into());
        self
    }

    /// Set the expiration timestamp.
    pub fn expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Set call or put.
    pub fn side(mut self, side: OptionSide) -> Self {
        self.side = Some(side);
        self
    }

    /// Set the strike price.
    pub fn strike(mut self, strike: f64) -> Self {
        self.strike = Some(strike);
        self
    }

    /// Set the last traded price.
    pub fn last_price(mut self, price: f64) -> Self {
        self.last_price = price;
        self
    }

    /// Set the best bid.
    pub fn bid(mut self, bid: f64) -> Self {
        self.bid = bid;
        self
    }

    /// Set the best ask.
    pub fn ask(mut self, ask: f64) -> Self {
        self.ask = ask;
        self
    }

    /// Set the session volume.
    pub fn volume(mut self, volume: u64) -> Self {
        self.volume = volume;
        self
    }

    /// Set the open interest.
    pub fn open_interest(mut self, open_interest: u64) -> Self {
        self.open_interest = open_interest;
        self
    }

    /// Set the implied volatility. Pass `None` when the source omits it.
    pub fn implied_volatility(mut self, iv: impl Into<Option<f64>>) -> Self {
        self.implied_volatility = iv.into();
        self
    }

    /// Set the time to expiry directly, in years.
    ///
    /// Takes precedence over derivation from the expiration timestamp.
    pub fn time_to_expiry(mut self, years: f64) -> Self {
        self.time_to_expiry = Some(years);
        self
    }

    /// Reference time for deriving time to expiry. Defaults to now.
    pub fn as_of(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = Some(as_of);
        self
    }

    /// Build the quote, validating fields and deriving time to expiry.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] when a required field is missing, the strike is
    /// not positive, a price is negative or non-finite, or the time to expiry
    /// is negative or non-finite.
    pub fn build(self) -> Result<OptionQuote, DomainError> {
        let ticker = Ticker::parse(self.ticker.ok_or(DomainError::MissingField { field: "ticker" })?)?;
        let side = self.side.ok_or(DomainError::MissingField { field: "side" })?;
        let strike = self.strike.ok_or(DomainError::MissingField { field: "strike" })?;
        if !(strike.is_finite() && strike > 0.0) {
            return Err(DomainError::NonPositiveStrike { strike });
        }
        for (field, value) in [
            ("last_price", self.last_price),
            ("bid", self.bid),
            ("ask", self.ask),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(DomainError::InvalidPrice { field, value });
            }
        }
        let expiration = self
            .expiration
            .ok_or(DomainError::MissingField { field: "expiration" })?;

        let time_to_expiry = self
            .time_to_expiry
            .unwrap_or_else(|| years_to_expiry(expiration, self.as_of.unwrap_or_else(Utc::now)));
        if !(time_to_expiry.is_finite() && time_to_expiry >= 0.0) {
            return Err(DomainError::InvalidTimeToExpiry {
                years: time_to_expiry,
            });
        }

        Ok(OptionQuote {
            ticker,
            contract_symbol: self.contract_symbol.unwrap_or_default(),
            expiration,
            side,
            strike,
            last_price: self.last_price,
            bid: self.bid,
            ask: self.ask,
            volume: self.volume,
            open_interest: self.open_interest,
            implied_volatility: self.implied_volatility,
            time_to_expiry,
        })
    }
}
