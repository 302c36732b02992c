//! Opportunity scoring for one ticker's option chain.
//!
//! Each contract is scored on four factors:
//! - **Pricing gap**: how far the market mid sits from model fair value
//! - **Liquidity**: `ln(1 + volume + open interest)`
//! - **Spread**: bid-ask width relative to mid, as an exponential penalty
//! - **Alignment**: whether the contract side agrees with ticker sentiment
//!
//! Raw scores are then normalized across the chain into [-100, 100] with a
//! `tanh` squash, so scores stay comparable between tickers.
//!
//! # Examples
//!
//! ```
//! use chrono::Utc;
//! use optedge::domain::option::{OptionQuote, OptionSide};
//! use optedge::domain::pricing::price_chain;
//! use optedge::domain::score::{OpportunityEngine, ScoringParams};
//!
//! let quote = OptionQuote::builder()
//!     .ticker("SPY")
//!     .side(OptionSide::Call)
//!     .strike(100.0)
//!     .expiration(Utc::now())
//!     .time_to_expiry(0.5)
//!     .bid(7.0)
//!     .ask(7.2)
//!     .volume(500)
//!     .open_interest(1_000)
//!     .implied_volatility(0.25)
//!     .build()
//!     .unwrap();
//!
//! let params = ScoringParams::default();
//! let priced = price_chain(&[quote], 100.0, 0.045, params.iv_ceiling, params.gap_floor);
//! let records = OpportunityEngine::new(params).score(&priced, 0.3);
//!
//! assert_eq!(records.len(), 1);
//! assert!(records[0].normalized_score.abs() <= 100.0);
//! ```

use serde::{Deserialize, Serialize};

use super::option::OptionQuote;
use super::pricing::{usable_volatility, PricedQuote};

/// Tunable constants of the scoring model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    /// Floor for the gap-fraction denominator.
    pub gap_floor: f64,
    /// Penalty for unknown or extreme spreads.
    pub max_spread_penalty: f64,
    /// Weight of the liquidity score in the raw-score multiplier.
    pub liquidity_weight: f64,
    /// Normalization scale as a multiple of the largest |raw score|.
    pub scale_headroom: f64,
    /// Lower bound of the normalization scale.
    pub min_scale: f64,
    /// Spread penalty above which a contract is flagged risky.
    pub risk_spread_threshold: f64,
    /// Volume plus open interest below which a contract is flagged risky.
    pub min_interest: u64,
    /// Implied volatilities at or above this are treated as missing.
    pub iv_ceiling: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            gap_floor: 0.01,
            max_spread_penalty: 5.0,
            liquidity_weight: 0.25,
            scale_headroom: 1.5,
            min_scale: 1e-6,
            risk_spread_threshold: 1.0,
            min_interest: 10,
            iv_ceiling: 5.0,
        }
    }
}

/// A scored contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunityRecord {
    #[serde(flatten)]
    pub quote: OptionQuote,
    pub spot: f64,
    pub mid_price: f64,
    pub theo_price: Option<f64>,
    pub pricing_gap: Option<f64>,
    pub pricing_gap_pct: Option<f64>,
    pub liquidity_score: f64,
    pub spread_penalty: f64,
    pub sentiment: f64,
    pub sentiment_alignment: f64,
    pub raw_score: f64,
    /// Chain-relative score in [-100, 100].
    pub normalized_score: f64,
    pub risk_flag: bool,
}

/// Scores option chains with a fixed set of [`ScoringParams`].
#[derive(Debug, Clone, Default)]
pub struct OpportunityEngine {
    params: ScoringParams,
}

impl OpportunityEngine {
    #[must_use]
    pub const fn new(params: ScoringParams) -> Self {
        Self { params }
    }

    #[must_use]
    pub const fn params(&self) -> &ScoringParams {
        &self.params
    }

    /// `ln(1 + volume + open interest)`.
    #[must_use]
    pub fn liquidity_score(quote: &OptionQuote) -> f64 {
        (quote.interest() as f64).ln_1p()
    }

    /// Relative bid-ask spread, or the maximum penalty when either side is
    /// missing.
    #[must_use]
    pub fn spread_penalty(&self, quote: &OptionQuote) -> f64 {
        let max = self.params.max_spread_penalty;
        if !quote.has_two_sided_quote() {
            return max;
        }
        let width = (quote.ask() - quote.bid()) / quote.mid_price().max(self.params.gap_floor);
        if width.is_finite() {
            width.clamp(0.0, max)
        } else {
            max
        }
    }

    /// `sign(sentiment)` times the contract direction; zero when sentiment is
    /// zero or not finite.
    #[must_use]
    pub fn sentiment_alignment(quote: &OptionQuote, sentiment: f64) -> f64 {
        if !sentiment.is_finite() || sentiment == 0.0 {
            return 0.0;
        }
        sentiment.signum() * quote.side().direction()
    }

    /// True when the spread is wide or unknown, or trading interest is thin.
    #[must_use]
    pub fn is_risky(&self, quote: &OptionQuote, spread_penalty: f64) -> bool {
        spread_penalty > self.params.risk_spread_threshold
            || quote.interest() < self.params.min_interest
    }

    /// Score every priced quote of one ticker against its fused sentiment.
    ///
    /// Output order matches input order. Normalization is relative to this
    /// slice, so pass one ticker's whole chain at once.
    #[must_use]
    pub fn score(&self, priced: &[PricedQuote], sentiment: f64) -> Vec<OpportunityRecord> {
        let mut records: Vec<OpportunityRecord> = priced
            .iter()
            .map(|p| self.score_one(p, sentiment))
            .collect();

        let max_abs = records
            .iter()
            .map(|r| r.raw_score.abs())
            .fold(0.0_f64, f64::max);
        if max_abs > 0.0 {
            let scale = (self.params.scale_headroom * max_abs).max(self.params.min_scale);
            for record in &mut records {
                let normalized = (record.raw_score / scale).tanh() * 100.0;
                record.normalized_score = if normalized.is_finite() {
                    normalized.clamp(-100.0, 100.0)
                } else {
                    0.0
                };
            }
        }

        records
    }

    fn score_one(&self, priced: &PricedQuote, sentiment: f64) -> OpportunityRecord {
        let quote = &priced.quote;
        let mid_price = quote.mid_price();

        let theo_price = priced
            .theo_price
            .filter(|_| usable_volatility(quote.implied_volatility(), self.params.iv_ceiling).is_some())
            .filter(|theo| theo.is_finite());
        let pricing_gap = theo_price
            .map(|theo| mid_price - theo)
            .filter(|gap| gap.is_finite());
        let pricing_gap_pct = match (pricing_gap, theo_price) {
            (Some(gap), Some(theo)) => {
                Some(gap / theo.max(self.params.gap_floor)).filter(|pct| pct.is_finite())
            }
            _ => None,
        };

        let liquidity_score = Self::liquidity_score(quote);
        let spread_penalty = self.spread_penalty(quote);
        let sentiment_alignment = Self::sentiment_alignment(quote, sentiment);

        let raw = sentiment_alignment
            * pricing_gap_pct.map_or(0.0, f64::abs)
            * (1.0 + self.params.liquidity_weight * liquidity_score)
            * (-spread_penalty).exp();
        let raw_score = if raw.is_finite() { raw } else { 0.0 };

        OpportunityRecord {
            quote: quote.clone(),
            spot: priced.spot,
            mid_price,
            theo_price,
            pricing_gap,
            pricing_gap_pct,
            liquidity_score,
            spread_penalty,
            sentiment: if sentiment.is_finite() { sentiment } else { 0.0 },
            sentiment_alignment,
            raw_score,
            normalized_score: 0.0,
            risk_flag: self.is_risky(quote, spread_penalty),
        }
    }
}

/// Keep the `top_n` records with the largest |normalized score|.
///
/// Ties keep their input order.
#[must_use]
pub fn rank_by_magnitude(mut records: Vec<OpportunityRecord>, top_n: usize) -> Vec<OpportunityRecord> {
    records.sort_by(|a, b| {
        b.normalized_score
            .abs()
            .total_cmp(&a.normalized_score.abs())
    });
    records.truncate(top_n);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::option::OptionSide;
    use chrono::Utc;

    fn quote(side: OptionSide, bid: f64, ask: f64, volume: u64, open_interest: u64) -> OptionQuote {
        OptionQuote::builder()
            .ticker("SPY")
            .side(side)
            .strike(100.0)
            .expiration(Utc::now())
            .time_to_expiry(0.25)
            .bid(bid)
            .ask(ask)
            .volume(volume)
            .open_interest(open_interest)
            .implied_volatility(0.3)
            .build()
            .unwrap()
    }

    fn priced(quote: OptionQuote, theo: Option<f64>) -> PricedQuote {
        PricedQuote {
            quote,
            spot: 100.0,
            theo_price: theo,
            pricing_gap: None,
            pricing_gap_pct: None,
        }
    }

    #[test]
    fn larger_gap_scores_higher() {
        let engine = OpportunityEngine::default();
        let chain = [
            priced(quote(OptionSide::Call, 5.9, 6.1, 100, 100), Some(5.0)),
            priced(quote(OptionSide::Call, 4.9, 5.1, 100, 100), Some(5.0)),
        ];
        let records = engine.score(&chain, 0.5);
        assert!(records[0].normalized_score > records[1].normalized_score);
        assert_eq!(records[1].normalized_score, 0.0);
    }

    #[test]
    fn all_zero_raw_scores_normalize_to_zero() {
        let engine = OpportunityEngine::default();
        let chain = [
            priced(quote(OptionSide::Call, 5.9, 6.1, 100, 100), Some(5.0)),
            priced(quote(OptionSide::Put, 1.0, 1.2, 100, 100), None),
        ];
        for record in engine.score(&chain, 0.0) {
            assert_eq!(record.raw_score, 0.0);
            assert_eq!(record.normalized_score, 0.0);
        }
    }

    #[test]
    fn undefined_theo_contributes_zero() {
        let engine = OpportunityEngine::default();
        let records = engine.score(&[priced(quote(OptionSide::Call, 1.0, 1.1, 50, 50), None)], 0.9);
        assert_eq!(records[0].pricing_gap, None);
        assert_eq!(records[0].pricing_gap_pct, None);
        assert_eq!(records[0].raw_score, 0.0);
    }

    #[test]
    fn missing_side_gets_max_penalty() {
        let engine = OpportunityEngine::default();
        assert_eq!(engine.spread_penalty(&quote(OptionSide::Call, 0.0, 1.0, 5, 5)), 5.0);
        let tight = engine.spread_penalty(&quote(OptionSide::Call, 1.0, 1.1, 5, 5));
        assert!((tight - 0.1 / 1.05).abs() < 1e-12);
    }

    #[test]
    fn risk_flag_rules() {
        let engine = OpportunityEngine::default();
        // thin interest, tight spread
        let thin = quote(OptionSide::Call, 1.0, 1.01, 4, 5);
        assert!(engine.is_risky(&thin, engine.spread_penalty(&thin)));
        // deep interest, wide spread
        let wide = quote(OptionSide::Call, 1.0, 4.0, 10_000, 10_000);
        assert!(engine.is_risky(&wide, engine.spread_penalty(&wide)));
        let fine = quote(OptionSide::Call, 1.0, 1.05, 10, 0);
        assert!(!engine.is_risky(&fine, engine.spread_penalty(&fine)));
    }

    #[test]
    fn alignment_follows_side_and_sign() {
        let call = quote(OptionSide::Call, 1.0, 1.1, 10, 10);
        let put = quote(OptionSide::Put, 1.0, 1.1, 10, 10);
        assert_eq!(OpportunityEngine::sentiment_alignment(&call, 0.2), 1.0);
        assert_eq!(OpportunityEngine::sentiment_alignment(&put, 0.2), -1.0);
        assert_eq!(OpportunityEngine::sentiment_alignment(&put, -0.2), 1.0);
        assert_eq!(OpportunityEngine::sentiment_alignment(&call, 0.0), 0.0);
        assert_eq!(OpportunityEngine::sentiment_alignment(&call, f64::NAN), 0.0);
    }

    #[test]
    fn rank_keeps_largest_magnitudes() {
        let engine = OpportunityEngine::default();
        let chain = [
            priced(quote(OptionSide::Call, 5.4, 5.6, 100, 100), Some(5.0)),
            priced(quote(OptionSide::Call, 2.9, 3.1, 100, 100), Some(5.0)),
            priced(quote(OptionSide::Call, 5.0, 5.0, 100, 100), Some(5.0)),
        ];
        let records = engine.score(&chain, 1.0);
        let ranked = rank_by_magnitude(records, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].quote.bid(), 2.9);
        assert_eq!(ranked[1].quote.bid(), 5.4);
    }
}
