//! Process wiring: configuration, logging and bootstrap.

pub mod bootstrap;
pub mod config;
