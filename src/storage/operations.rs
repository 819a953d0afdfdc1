//! Storage operations
//!
//! List, open, save and delete books directly under the storage root.
//! Every failure is returned to the caller; nothing here retries or logs
//! an error it also reports.

use log::debug;
use std::fs::{self, File};
use std::io::{self, ErrorKind, Read, Write};
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::error::StorageError;
use crate::storage::filesystem::{create_upload_file, same_file};
use crate::storage::results::{OpenedFile, StoredFile};
use crate::storage::validation::{is_temp_name, resolve_in_root};

/// Lists the books stored directly under `root`.
///
/// Directories, symlinks, special files and in-flight uploads are skipped.
/// Books are ordered newest first; equal modification times fall back to
/// ascending name order.
pub fn list_books(root: &Path) -> Result<Vec<StoredFile>, StorageError> {
    let entries = fs::read_dir(root).map_err(|e| StorageError::io("read storage dir", root, e))?;

    let mut books = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StorageError::io("read storage dir", root, e))?;

        // entries removed while we scan are simply not part of the listing
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(StorageError::io("stat entry", entry.path(), e)),
        };
        if !file_type.is_file() {
            continue;
        }

        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                debug!("Skipping non UTF-8 entry {:?}", raw);
                continue;
            }
        };
        if is_temp_name(&name) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(StorageError::io("stat entry", entry.path(), e)),
        };
        if !metadata.is_file() {
            continue;
        }
        let mod_time = metadata
            .modified()
            .map_err(|e| StorageError::io("stat entry", entry.path(), e))?;

        books.push(StoredFile {
            name,
            size: metadata.len(),
            mod_time,
        });
    }

    books.sort_by(|a, b| {
        b.mod_time
            .cmp(&a.mod_time)
            .then_with(|| a.name.cmp(&b.name))
    });

    debug!("Listed {} ({} books)", root.display(), books.len());
    Ok(books)
}

/// Opens a stored book for reading.
///
/// Anything that is not a plain file under the requested name (directory,
/// symlink, device) fails with `NotRegularFile`, never with content.
pub fn open_book(root: &Path, raw_name: &str) -> Result<OpenedFile, StorageError> {
    let (path, leaf) = resolve_in_root(root, raw_name)?;

    // checked before opening so FIFOs never block and symlinks are not followed
    let entry_meta = match fs::symlink_metadata(&path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(StorageError::NotFound(leaf)),
        Err(e) => return Err(StorageError::io("stat", &path, e)),
    };
    if !entry_meta.file_type().is_file() {
        return Err(StorageError::NotRegularFile(leaf));
    }

    let file = match File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(StorageError::NotFound(leaf)),
        Err(e) => return Err(StorageError::io("open", &path, e)),
    };
    let metadata = file
        .metadata()
        .map_err(|e| StorageError::io("stat", &path, e))?;
    if !metadata.is_file() {
        return Err(StorageError::NotRegularFile(leaf));
    }

    // the entry may have been replaced between the check and the open
    if !same_file(&entry_meta, &metadata) {
        let replaced_by_plain_file = fs::symlink_metadata(&path)
            .map(|now| now.file_type().is_file() && same_file(&now, &metadata))
            .unwrap_or(false);
        if !replaced_by_plain_file {
            return Err(StorageError::NotRegularFile(leaf));
        }
    }

    let mod_time = metadata
        .modified()
        .map_err(|e| StorageError::io("stat", &path, e))?;

    Ok(OpenedFile {
        name: leaf,
        file,
        size: metadata.len(),
        mod_time,
    })
}

/// Saves the contents of `reader` as a book, returning the leaf name used.
///
/// Content is staged in a sibling `.uploading` file and renamed onto the
/// final name only once fully written, replacing any existing book of the
/// same name. On failure the staging file is removed and the final name is
/// left untouched. No size limit is enforced here.
pub fn save_book<R: Read>(root: &Path, raw_name: &str, mut reader: R) -> Result<String, StorageError> {
    let (target, leaf) = resolve_in_root(root, raw_name)?;

    let mut staged =
        create_upload_file(root, &leaf).map_err(|e| StorageError::io("create temp file", &target, e))?;

    let bytes = io::copy(&mut reader, staged.as_file_mut())
        .map_err(|e| StorageError::io("write temp file", staged.path(), e))?;

    staged
        .as_file_mut()
        .flush()
        .and_then(|_| staged.as_file().sync_all())
        .map_err(|e| StorageError::io("close temp file", staged.path(), e))?;

    staged
        .persist(&target)
        .map_err(|e| StorageError::io("rename temp file", &target, e.error))?;

    debug!("Saved {} ({} bytes)", target.display(), bytes);
    Ok(leaf)
}

/// Deletes a stored book. A missing book is reported, not ignored.
pub fn delete_book(root: &Path, raw_name: &str) -> Result<(), StorageError> {
    let (path, leaf) = resolve_in_root(root, raw_name)?;

    match fs::remove_file(&path) {
        Ok(()) => {
            debug!("Deleted {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(leaf)),
        Err(e) => Err(StorageError::io("remove", &path, e)),
    }
}

/// Removes staging files left behind by interrupted saves.
///
/// Only regular `.uploading` files last modified more than `max_age` ago are
/// removed, so uploads still in flight are left alone. Returns the number of
/// files removed.
pub fn reclaim_stale_uploads(root: &Path, max_age: Duration) -> Result<usize, StorageError> {
    let entries = fs::read_dir(root).map_err(|e| StorageError::io("read storage dir", root, e))?;
    let now = SystemTime::now();

    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(|e| StorageError::io("read storage dir", root, e))?;
        if !entry.file_name().to_str().is_some_and(is_temp_name) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(StorageError::io("stat entry", entry.path(), e)),
        };
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata
            .modified()
            .map_err(|e| StorageError::io("stat entry", entry.path(), e))?;
        // timestamps in the future count as fresh
        let stale = now
            .duration_since(modified)
            .is_ok_and(|age| age > max_age);
        if !stale {
            continue;
        }

        match fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(StorageError::io("remove stale upload", entry.path(), e)),
        }
    }

    if removed > 0 {
        debug!("Reclaimed {} stale uploads in {}", removed, root.display());
    }
    Ok(removed)
}
