pub mod config;
pub mod error;
pub mod storage;
pub mod transfer;
pub mod utils;

pub use config::AppConfig;
pub use error::{StorageError, StorageErrorKind};
pub use storage::{SharedStore, Store, StoredFile};
