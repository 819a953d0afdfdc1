//! Module `file_ops`
//!
//! Moves book content between client streams and the store. Uploads are
//! capped here, in the transfer layer; the store itself never limits size.

use log::info;
use std::io::{self, Read, Write};

use crate::error::handlers::{handle_storage_error, handle_upload_error};
use crate::error::{StorageError, UploadError};
use crate::storage::Store;
use crate::transfer::results::{DownloadResult, UploadResult};

/// Saves an upload of at most `limit_bytes` bytes.
///
/// At most one byte past the limit is read. If that byte exists the upload
/// is too large: the just-saved book is deleted again and the upload fails
/// with [`UploadError::TooLarge`].
pub fn handle_file_upload<R: Read>(
    store: &Store,
    raw_name: &str,
    reader: R,
    limit_bytes: u64,
) -> Result<UploadResult, UploadError> {
    let cap = limit_bytes.saturating_add(1);
    let mut limited = reader.take(cap);

    let name = store.save(raw_name, &mut limited)?;
    let received = cap - limited.limit();

    if received > limit_bytes {
        // the size failure is what the caller sees, so a failed discard is only logged
        if let Err(e) = store.delete(&name) {
            handle_storage_error(&e);
        }
        let err = UploadError::TooLarge { limit_bytes };
        handle_upload_error(&err);
        return Err(err);
    }

    info!("Upload completed: {} ({} bytes)", name, received);
    Ok(UploadResult {
        name,
        bytes: received,
    })
}

/// Streams a stored book into `writer`.
pub fn handle_file_download<W: Write>(
    store: &Store,
    raw_name: &str,
    mut writer: W,
) -> Result<DownloadResult, StorageError> {
    let mut opened = store.open(raw_name)?;

    let bytes = io::copy(&mut opened.file, &mut writer)
        .and_then(|n| writer.flush().map(|_| n))
        .map_err(|e| StorageError::io("send file", store.root().join(&opened.name), e))?;

    info!("Download completed: {} ({} bytes)", opened.name, bytes);
    Ok(DownloadResult {
        name: opened.name,
        bytes,
        mod_time: opened.mod_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageErrorKind;
    use std::io::Cursor;

    fn store() -> (tempfile::TempDir, Store) {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path()).unwrap();
        (tmp, store)
    }

    #[test]
    fn upload_within_limit_is_kept() {
        let (_tmp, store) = store();
        let result = handle_file_upload(&store, "a.epub", Cursor::new(b"12345678".to_vec()), 8).unwrap();
        assert_eq!(result.name, "a.epub");
        assert_eq!(result.bytes, 8);
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn upload_over_limit_is_discarded() {
        let (_tmp, store) = store();
        let err = handle_file_upload(&store, "a.epub", Cursor::new(b"123456789".to_vec()), 8).unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { limit_bytes: 8 }));
        assert!(store.list().unwrap().is_empty());
        assert_eq!(
            store.open("a.epub").unwrap_err().kind(),
            StorageErrorKind::NotFound
        );
    }

    #[test]
    fn upload_with_invalid_name_fails_before_reading() {
        let (_tmp, store) = store();
        let err = handle_file_upload(&store, "..", Cursor::new(b"x".to_vec()), 8).unwrap_err();
        assert!(matches!(err, UploadError::Storage(ref e) if e.kind() == StorageErrorKind::InvalidName));
    }

    #[test]
    fn download_copies_whole_book() {
        let (_tmp, store) = store();
        store.save("b.mobi", Cursor::new(b"mobi bytes".to_vec())).unwrap();

        let mut out = Vec::new();
        let result = handle_file_download(&store, "b.mobi", &mut out).unwrap();
        assert_eq!(out, b"mobi bytes");
        assert_eq!(result.bytes, 10);
        assert_eq!(result.name, "b.mobi");
    }

    #[test]
    fn download_of_missing_book_is_not_found() {
        let (_tmp, store) = store();
        let err = handle_file_download(&store, "missing.pdf", io::sink()).unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::NotFound);
    }
}
