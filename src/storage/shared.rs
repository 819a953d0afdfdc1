//! Async access to a store
//!
//! Storage operations block on the filesystem. `SharedStore` runs them on
//! tokio's blocking pool so request handlers can await them without stalling
//! the runtime.

use std::io::{self, Read};
use std::sync::Arc;
use tokio::task;

use crate::error::{StorageError, UploadError};
use crate::storage::results::{OpenedFile, StoredFile};
use crate::storage::store::Store;
use crate::transfer::{UploadResult, handle_file_upload};

/// Cheaply cloneable handle to a [`Store`]
#[derive(Debug, Clone)]
pub struct SharedStore {
    inner: Arc<Store>,
}

impl SharedStore {
    pub fn new(store: Store) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    pub fn store(&self) -> &Store {
        &self.inner
    }

    async fn run<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce(&Store) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<StorageError> + Send + 'static,
    {
        let store = Arc::clone(&self.inner);
        match task::spawn_blocking(move || op(&store)).await {
            Ok(result) => result,
            Err(e) => Err(StorageError::io("join storage task", self.inner.root(), io::Error::other(e)).into()),
        }
    }

    pub async fn list(&self) -> Result<Vec<StoredFile>, StorageError> {
        self.run(|store| store.list()).await
    }

    pub async fn open(&self, name: &str) -> Result<OpenedFile, StorageError> {
        let name = name.to_owned();
        self.run(move |store| store.open(&name)).await
    }

    pub async fn save<R>(&self, name: &str, reader: R) -> Result<String, StorageError>
    where
        R: Read + Send + 'static,
    {
        let name = name.to_owned();
        self.run(move |store| store.save(&name, reader)).await
    }

    pub async fn delete(&self, name: &str) -> Result<(), StorageError> {
        let name = name.to_owned();
        self.run(move |store| store.delete(&name)).await
    }

    /// Save with a size cap; see [`handle_file_upload`].
    pub async fn upload<R>(
        &self,
        name: &str,
        reader: R,
        limit_bytes: u64,
    ) -> Result<UploadResult, UploadError>
    where
        R: Read + Send + 'static,
    {
        let name = name.to_owned();
        self.run(move |store| handle_file_upload(store, &name, reader, limit_bytes))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageErrorKind;
    use std::io::Cursor;

    #[tokio::test]
    async fn async_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let shared = SharedStore::new(Store::new(tmp.path()).unwrap());

        let name = shared.save("book.epub", Cursor::new(b"pages".to_vec())).await.unwrap();
        assert_eq!(name, "book.epub");

        let books = shared.list().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].size, 5);

        let mut opened = shared.open(&name).await.unwrap();
        let mut content = String::new();
        opened.read_to_string(&mut content).unwrap();
        assert_eq!(content, "pages");

        shared.delete(&name).await.unwrap();
        let err = shared.open(&name).await.unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::NotFound);
    }

    #[tokio::test]
    async fn async_upload_enforces_limit() {
        let tmp = tempfile::tempdir().unwrap();
        let shared = SharedStore::new(Store::new(tmp.path()).unwrap());

        let err = shared
            .upload("big.pdf", Cursor::new(vec![0u8; 64]), 16)
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { limit_bytes: 16 }));
        assert!(shared.list().await.unwrap().is_empty());
    }
}
