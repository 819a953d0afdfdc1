//! Book store
//!
//! Binds the storage operations to one root directory fixed at construction.

use log::warn;
use std::env;
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::StorageError;
use crate::storage::filesystem::create_root_directory;
use crate::storage::operations::{
    delete_book, list_books, open_book, reclaim_stale_uploads, save_book,
};
use crate::storage::results::{OpenedFile, StoredFile};
use crate::storage::validation::{lexical_clean, resolve_in_root};

/// Name of the storage directory inside the user's home
pub const DEFAULT_DIR_NAME: &str = ".sendtokindle";

/// Used when the home directory cannot host the store
pub const FALLBACK_DIR: &str = "./.sendtokindle";

/// Staging files untouched for this long belong to interrupted saves
pub const STALE_UPLOAD_AGE: Duration = Duration::from_secs(60 * 60);

/// A directory of stored books.
///
/// Holds no state besides its root, so independent stores can coexist and
/// one store can be shared between threads freely.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Open (creating if needed) a store rooted at `root`.
    ///
    /// Staging files older than [`STALE_UPLOAD_AGE`] are removed on open.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref();
        if root.to_string_lossy().trim().is_empty() {
            return Err(StorageError::io(
                "open storage root",
                root,
                io::Error::new(ErrorKind::InvalidInput, "storage root is empty"),
            ));
        }

        let absolute = if root.is_absolute() {
            root.to_path_buf()
        } else {
            env::current_dir()
                .map_err(|e| StorageError::io("resolve storage root", root, e))?
                .join(root)
        };
        let root = lexical_clean(&absolute);

        create_root_directory(&root).map_err(|e| StorageError::io("create storage root", &root, e))?;
        reclaim_stale_uploads(&root, STALE_UPLOAD_AGE)?;

        Ok(Self { root })
    }

    /// Open the store in `~/.sendtokindle`.
    pub fn open_default() -> Result<Self, StorageError> {
        let home = dirs::home_dir().ok_or_else(|| {
            StorageError::io(
                "locate home directory",
                DEFAULT_DIR_NAME,
                io::Error::new(ErrorKind::NotFound, "home directory unavailable"),
            )
        })?;
        Self::new(home.join(DEFAULT_DIR_NAME))
    }

    /// Open the store described by the configuration.
    ///
    /// An explicit `storage_dir` is used as is. Otherwise the default store
    /// is tried first, then [`FALLBACK_DIR`] relative to the working directory.
    pub fn open_configured(config: &AppConfig) -> Result<Self, StorageError> {
        if let Some(dir) = config.storage_dir() {
            return Self::new(dir);
        }

        match Self::open_default() {
            Ok(store) => Ok(store),
            Err(e) => {
                warn!("Default storage unavailable ({}), using {}", e, FALLBACK_DIR);
                Self::new(FALLBACK_DIR)
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path a name would be stored under, after sanitization.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, StorageError> {
        resolve_in_root(&self.root, name).map(|(path, _)| path)
    }

    pub fn list(&self) -> Result<Vec<StoredFile>, StorageError> {
        list_books(&self.root)
    }

    pub fn open(&self, name: &str) -> Result<OpenedFile, StorageError> {
        open_book(&self.root, name)
    }

    pub fn save<R: Read>(&self, name: &str, reader: R) -> Result<String, StorageError> {
        save_book(&self.root, name, reader)
    }

    pub fn delete(&self, name: &str) -> Result<(), StorageError> {
        delete_book(&self.root, name)
    }

    /// Remove staging files older than `max_age`; see [`reclaim_stale_uploads`].
    pub fn reclaim_stale_uploads(&self, max_age: Duration) -> Result<usize, StorageError> {
        reclaim_stale_uploads(&self.root, max_age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageErrorKind;

    #[test]
    fn new_rejects_blank_root() {
        for root in ["", "   "] {
            let err = Store::new(root).unwrap_err();
            assert_eq!(err.kind(), StorageErrorKind::IoError);
        }
    }

    #[test]
    fn new_creates_missing_root_and_cleans_it() {
        let tmp = tempfile::tempdir().unwrap();
        let requested = tmp.path().join("a").join("..").join("library");
        let store = Store::new(&requested).unwrap();
        assert_eq!(store.root(), tmp.path().join("library"));
        assert!(store.root().is_dir());
    }

    #[test]
    fn new_fails_when_root_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("occupied");
        std::fs::write(&file, b"x").unwrap();
        let err = Store::new(&file).unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::IoError);
    }

    #[test]
    fn configured_dir_takes_precedence() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("books");
        let config = AppConfig {
            storage_dir: dir.to_string_lossy().into_owned(),
            max_upload_mb: 1,
        };
        let store = Store::open_configured(&config).unwrap();
        assert_eq!(store.root(), dir);
    }

    #[test]
    fn resolve_stays_under_root() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path()).unwrap();
        let path = store.resolve("../../outside.epub").unwrap();
        assert_eq!(path, store.root().join("outside.epub"));
    }
}
