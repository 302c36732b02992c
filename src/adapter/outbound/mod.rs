//! Outbound adapters (driven side).

pub mod classifier;
pub mod memory;
pub mod sqlite;
