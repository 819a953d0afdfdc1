//! Error handlers
//!
//! Maps engine failures onto transport-level outcomes.

use crate::error::types::{AppError, StorageError, StorageErrorKind, UploadError};
use log::{error, warn};

/// Log an application error once, at the point where it is turned into a response.
pub fn handle_error(err: &AppError) {
    match err {
        AppError::Storage(e) => handle_storage_error(e),
        AppError::Upload(e) => handle_upload_error(e),
        _ => error!("Send-to-Kindle error: {}", err),
    }
}

/// Log a storage error; caller mistakes are warnings, I/O failures errors.
pub fn handle_storage_error(err: &StorageError) {
    if err.kind() == StorageErrorKind::IoError {
        error!("Storage error: {}", err);
    } else {
        warn!("Rejected request: {}", err);
    }
}

/// Log an upload error
pub fn handle_upload_error(err: &UploadError) {
    match err {
        UploadError::TooLarge { .. } => warn!("Rejected upload: {}", err),
        UploadError::Storage(e) => handle_storage_error(e),
    }
}

/// Convert a storage error to an HTTP-style status code
pub fn storage_error_to_status(err: &StorageError) -> u16 {
    match err.kind() {
        StorageErrorKind::InvalidName => 400,
        StorageErrorKind::PathEscape => 400,
        StorageErrorKind::NotFound => 404,
        // end users see a plain "not found" for anything that is not a book
        StorageErrorKind::NotRegularFile => 404,
        StorageErrorKind::IoError => 500,
    }
}

/// Convert an upload error to an HTTP-style status code
pub fn upload_error_to_status(err: &UploadError) -> u16 {
    match err {
        UploadError::TooLarge { .. } => 413,
        UploadError::Storage(e) => storage_error_to_status(e),
    }
}
