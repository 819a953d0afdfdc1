//! File system operations
//!
//! Low-level helpers that create the storage root and upload staging files
//! with owner-only permissions.

use std::fs::{self, Metadata};
use std::io::Result;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::storage::validation::TEMP_SUFFIX;

/// Create the storage root (and missing parents) readable by the owner only
pub fn create_root_directory(path: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(path)
}

/// Create a fresh staging file for an upload of `leaf` inside `dir`.
///
/// The file is named `<leaf>.<random>.uploading`, created exclusively with
/// mode 0o600, and removed automatically if it is dropped before being
/// persisted.
pub fn create_upload_file(dir: &Path, leaf: &str) -> Result<NamedTempFile> {
    let prefix = format!("{leaf}.");
    tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(TEMP_SUFFIX)
        .rand_bytes(8)
        .tempfile_in(dir)
}

/// Whether two metadata records describe the same file on disk
#[cfg(unix)]
pub fn same_file(a: &Metadata, b: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
pub fn same_file(a: &Metadata, b: &Metadata) -> bool {
    a.len() == b.len() && a.modified().ok() == b.modified().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn root_and_staging_files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("nested").join("library");
        create_root_directory(&root).unwrap();
        let mode = fs::metadata(&root).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);

        let staged = create_upload_file(&root, "book.epub").unwrap();
        let name = staged.path().file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("book.epub."));
        assert!(name.ends_with(TEMP_SUFFIX));
        let mode = staged.as_file().metadata().unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn dropped_staging_file_is_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let staged = create_upload_file(tmp.path(), "a.pdf").unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());
        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn creating_existing_root_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        create_root_directory(tmp.path()).unwrap();
        create_root_directory(tmp.path()).unwrap();
    }
}
