//! Closed-form Black-Scholes pricing for European options.
//!
//! Out-of-domain inputs never panic and never price at zero: they produce
//! `None`, which callers must carry through as "undefined".

use std::f64::consts::SQRT_2;

use serde::Serialize;
use statrs::function::erf::erfc;

use super::option::{OptionQuote, OptionSide};

/// Standard normal cumulative distribution function.
#[must_use]
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Theoretical option value under Black-Scholes.
///
/// `spot` and `strike` are prices, `years` the time to expiry, `rate` the
/// continuously compounded risk-free rate and `sigma` the annualized
/// volatility. Returns `None` when `years`, `sigma`, `spot` or `strike` is not
/// strictly positive (NaN included), or when the result is not finite.
///
/// # Example
///
/// ```
/// use optedge::domain::option::OptionSide;
/// use optedge::domain::pricing::theoretical_price;
///
/// let call = theoretical_price(100.0, 100.0, 1.0, 0.05, 0.2, OptionSide::Call).unwrap();
/// assert!((10.0..=11.0).contains(&call));
/// assert!(theoretical_price(100.0, 100.0, 0.0, 0.05, 0.2, OptionSide::Call).is_none());
/// ```
#[must_use]
pub fn theoretical_price(
    spot: f64,
    strike: f64,
    years: f64,
    rate: f64,
    sigma: f64,
    side: OptionSide,
) -> Option<f64> {
    if !(years > 0.0 && sigma > 0.0 && spot > 0.0 && strike > 0.0) {
        return None;
    }

    let vol_sqrt_t = sigma * years.sqrt();
    let d1 = ((spot / strike).ln() + (rate + 0.5 * sigma * sigma) * years) / vol_sqrt_t;
    let d2 = d1 - vol_sqrt_t;
    let discounted_strike = strike * (-rate * years).exp();

    let price = match side {
        OptionSide::Call => spot * norm_cdf(d1) - discounted_strike * norm_cdf(d2),
        OptionSide::Put => discounted_strike * norm_cdf(-d2) - spot * norm_cdf(-d1),
    };

    price.is_finite().then_some(price)
}

/// Implied volatility accepted for pricing: strictly positive and below
/// `ceiling`. Anything else is treated as missing.
#[must_use]
pub fn usable_volatility(iv: Option<f64>, ceiling: f64) -> Option<f64> {
    iv.filter(|sigma| *sigma > 0.0 && *sigma < ceiling)
}

/// A quote paired with its model valuation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedQuote {
    /// The market quote.
    pub quote: OptionQuote,
    /// Spot price of the underlying used for valuation.
    pub spot: f64,
    /// Model fair value, `None` when inputs were out of domain.
    pub theo_price: Option<f64>,
    /// Mid price minus theoretical price.
    pub pricing_gap: Option<f64>,
    /// Gap as a fraction of theoretical price (floored denominator).
    pub pricing_gap_pct: Option<f64>,
}

/// Value a single quote and compute its pricing gap.
///
/// `gap_floor` bounds the gap-fraction denominator away from zero for
/// near-worthless contracts.
#[must_use]
pub fn price_quote(
    quote: &OptionQuote,
    spot: f64,
    rate: f64,
    iv_ceiling: f64,
    gap_floor: f64,
) -> PricedQuote {
    let theo_price = usable_volatility(quote.implied_volatility(), iv_ceiling).and_then(|sigma| {
        theoretical_price(
            spot,
            quote.strike(),
            quote.time_to_expiry(),
            rate,
            sigma,
            quote.side(),
        )
    });

    let pricing_gap = theo_price
        .map(|theo| quote.mid_price() - theo)
        .filter(|gap| gap.is_finite());
    let pricing_gap_pct = match (pricing_gap, theo_price) {
        (Some(gap), Some(theo)) => Some(gap / theo.max(gap_floor)).filter(|pct| pct.is_finite()),
        _ => None,
    };

    PricedQuote {
        quote: quote.clone(),
        spot,
        theo_price,
        pricing_gap,
        pricing_gap_pct,
    }
}

/// Value every quote in a chain against one spot price.
#[must_use]
pub fn price_chain(
    quotes: &[OptionQuote],
    spot: f64,
    rate: f64,
    iv_ceiling: f64,
    gap_floor: f64,
) -> Vec<PricedQuote> {
    quotes
        .iter()
        .map(|quote| price_quote(quote, spot, rate, iv_ceiling, gap_floor))
        .collect()
}
