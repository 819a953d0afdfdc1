//! Error types
//!
//! Defines the typed failures of the storage engine and of the layers
//! built on top of it.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Kind of a storage failure, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageErrorKind {
    InvalidName,
    PathEscape,
    NotFound,
    NotRegularFile,
    IoError,
}

impl fmt::Display for StorageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StorageErrorKind::InvalidName => "invalid name",
            StorageErrorKind::PathEscape => "path escape",
            StorageErrorKind::NotFound => "not found",
            StorageErrorKind::NotRegularFile => "not a regular file",
            StorageErrorKind::IoError => "io error",
        };
        f.write_str(s)
    }
}

/// Storage engine errors
#[derive(Debug)]
pub enum StorageError {
    /// The raw name sanitized to nothing.
    InvalidName(String),
    /// The resolved path is not a strict descendant of the root.
    PathEscape(String),
    NotFound(String),
    NotRegularFile(String),
    IoError {
        op: &'static str,
        path: PathBuf,
        source: io::Error,
    },
}

impl StorageError {
    pub fn kind(&self) -> StorageErrorKind {
        match self {
            StorageError::InvalidName(_) => StorageErrorKind::InvalidName,
            StorageError::PathEscape(_) => StorageErrorKind::PathEscape,
            StorageError::NotFound(_) => StorageErrorKind::NotFound,
            StorageError::NotRegularFile(_) => StorageErrorKind::NotRegularFile,
            StorageError::IoError { .. } => StorageErrorKind::IoError,
        }
    }

    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::IoError {
            op,
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::InvalidName(n) => write!(f, "Invalid file name: {:?}", n),
            StorageError::PathEscape(n) => write!(f, "Path escapes storage root: {:?}", n),
            StorageError::NotFound(n) => write!(f, "File not found: {}", n),
            StorageError::NotRegularFile(n) => write!(f, "Not a regular file: {}", n),
            StorageError::IoError { op, path, source } => {
                write!(f, "{} {}: {}", op, path.display(), source)
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::IoError { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Upload errors raised by the transfer layer
#[derive(Debug)]
pub enum UploadError {
    TooLarge { limit_bytes: u64 },
    Storage(StorageError),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::TooLarge { limit_bytes } => {
                write!(f, "Upload exceeds limit of {} bytes", limit_bytes)
            }
            UploadError::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for UploadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UploadError::Storage(e) => Some(e),
            UploadError::TooLarge { .. } => None,
        }
    }
}

impl From<StorageError> for UploadError {
    fn from(error: StorageError) -> Self {
        UploadError::Storage(error)
    }
}

/// Top-level application error that encompasses all error types
#[derive(Debug)]
pub enum AppError {
    Storage(StorageError),
    Upload(UploadError),
    Config(config::ConfigError),
    IoError(io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Storage(e) => write!(f, "Storage error: {}", e),
            AppError::Upload(e) => write!(f, "Upload error: {}", e),
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for AppError {}

impl From<StorageError> for AppError {
    fn from(error: StorageError) -> Self {
        AppError::Storage(error)
    }
}

impl From<UploadError> for AppError {
    fn from(error: UploadError) -> Self {
        AppError::Upload(error)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(error: config::ConfigError) -> Self {
        AppError::Config(error)
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        AppError::IoError(error)
    }
}
