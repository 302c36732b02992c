//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Underlying symbol - newtype for type safety.
///
/// Symbols are normalized on construction (trimmed, uppercased) so that
/// `"aapl "` and `"AAPL"` compare equal everywhere: store lookups, headline
/// attribution, and scan results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Ticker(String);

impl Ticker {
    /// Create a new `Ticker`, normalizing case and surrounding whitespace.
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self(symbol.as_ref().trim().to_uppercase())
    }

    /// Create a `Ticker`, rejecting symbols that are blank after trimming.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyTicker`] for blank input.
    pub fn parse(symbol: impl AsRef<str>) -> Result<Self, DomainError> {
        let ticker = Self::new(symbol);
        if ticker.0.is_empty() {
            return Err(DomainError::EmptyTicker);
        }
        Ok(ticker)
    }

    /// Get the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Ticker {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Ticker {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_is_normalized() {
        assert_eq!(Ticker::new(" aapl "), Ticker::new("AAPL"));
        assert_eq!(Ticker::from("brk.b").as_str(), "BRK.B");
    }

    #[test]
    fn parse_rejects_blank_symbol() {
        assert_eq!(Ticker::parse("   "), Err(DomainError::EmptyTicker));
        assert!(Ticker::parse("spy").is_ok());
    }
}
