//! Optedge - options opportunity scanning with sentiment fusion.
//!
//! Ranks option contracts by how far their market price strays from a
//! Black-Scholes fair value, weighted by liquidity, spread and agreement with
//! headline and social sentiment.
//!
//! # Architecture
//!
//! - [`domain`] - Pure pricing, sentiment aggregation, fusion and scoring
//! - [`port`] - Traits for classifiers, the rolling sentiment store and market data
//! - [`adapter`] - FinBERT over HTTP, VADER, SQLite and in-memory stores
//! - [`application`] - Headline scoring, social ingestion, ticker scans
//! - [`infrastructure`] - Configuration, logging and wiring
//!
//! # Example
//!
//! ```
//! use optedge::domain::fusion::fuse;
//!
//! let sentiment = fuse(0.3, Some(-0.1), 0.25);
//! assert!((sentiment - 0.2).abs() < 1e-12);
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
