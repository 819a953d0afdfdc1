//! Transfer module
//!
//! Handles size-capped uploads into the store and downloads out of it.

pub mod file_ops;
pub mod results;

// Re-export key types and functions
pub use file_ops::{handle_file_download, handle_file_upload};
pub use results::{DownloadResult, UploadResult};
