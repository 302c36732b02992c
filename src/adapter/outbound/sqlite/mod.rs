//! SQLite persistence adapters.
//!
//! Provides the SQLite-backed rolling social sentiment store using Diesel ORM.

pub mod database;
pub mod store;
