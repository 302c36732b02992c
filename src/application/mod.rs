//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.

pub mod classifier;
pub mod scan;
pub mod sentiment;
pub mod social;
