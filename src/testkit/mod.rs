//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`classifier`] - Scripted and failing sentiment models.
//! - [`market`] - `StaticMarketData`, an in-memory market-data source.
//! - [`domain`] - Builders for quotes, chains, headlines and social events.
//! - [`config`] - Canonical test configurations.

pub mod classifier;
pub mod config;
pub mod domain;
pub mod market;
