//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the collaborators the core depends on: sentiment
//! models, the rolling social store and market data.

pub mod classifier;
pub mod market;
pub mod store;
