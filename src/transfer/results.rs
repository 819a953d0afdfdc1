//! Transfer result types
//!
//! Defines result structures returned by transfer operations.

use std::time::SystemTime;

/// Result of a completed upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub name: String,
    pub bytes: u64,
}

/// Result of a completed download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub name: String,
    pub bytes: u64,
    pub mod_time: SystemTime,
}
