//! Utility functions
//!
//! Provides logging setup and display formatting.

pub mod format;
pub mod logging;
