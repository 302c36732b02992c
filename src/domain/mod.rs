//! Pure domain types and algorithms. No I/O, no async runtime.

pub mod error;
pub mod fusion;
pub mod id;
pub mod option;
pub mod pricing;
pub mod score;
pub mod sentiment;
pub mod social;
