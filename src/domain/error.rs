//! Domain validation errors for core domain types.
//!
//! Quotes are validated once, at the market-data boundary, through
//! [`OptionQuoteBuilder::build`](super::option::OptionQuoteBuilder::build).
//! The scoring engine itself never fails: it works on already-validated
//! quotes and signals "cannot compute" with `None` sentinels instead.
//!
//! # Examples
//!
//! ```
//! use optedge::domain::error::DomainError;
//! use optedge::domain::option::{OptionQuote, OptionSide};
//!
//! let result = OptionQuote::builder()
//!     .ticker("SPY")
//!     .side(OptionSide::Call)
//!     .strike(-5.0)
//!     .build();
//!
//! assert!(matches!(result, Err(DomainError::NonPositiveStrike { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Ticker symbols cannot be blank.
    #[error("ticker cannot be empty")]
    EmptyTicker,

    /// A required quote field was never set on the builder.
    #[error("missing required quote field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// Strike must be a finite, positive price.
    #[error("strike must be positive, got {strike}")]
    NonPositiveStrike {
        /// The invalid strike that was provided.
        strike: f64,
    },

    /// Prices (last, bid, ask) must be finite and non-negative.
    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidPrice {
        /// Which price field was invalid.
        field: &'static str,
        /// The invalid value.
        value: f64,
    },

    /// Time to expiry must be finite and non-negative.
    #[error("time to expiry must be finite and non-negative, got {years}")]
    InvalidTimeToExpiry {
        /// The invalid year fraction.
        years: f64,
    },
}
