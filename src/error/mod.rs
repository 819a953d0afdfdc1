//! Error handling
//!
//! Defines error types and their mapping to transport outcomes.

pub mod handlers;
pub mod types;

pub use types::*;
