//! Sentiment model adapters.

pub mod huggingface;
pub mod vader;
