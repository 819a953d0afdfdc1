//! Path validation
//!
//! Resolves client-supplied names to absolute paths that stay inside the
//! storage root. Containment is checked lexically; symlinks are not followed.

use std::path::{Component, Path, PathBuf};

use crate::error::StorageError;
use crate::storage::sanitize::sanitize_filename;

/// Suffix of in-flight upload files. Names carrying it are reserved.
pub const TEMP_SUFFIX: &str = ".uploading";

/// Lexically normalize a path: drop `.` components and fold `..` into
/// its parent. Never touches the filesystem.
pub fn lexical_clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last_is_normal =
                    matches!(cleaned.components().next_back(), Some(Component::Normal(_)));
                if last_is_normal {
                    cleaned.pop();
                } else if !cleaned.has_root() {
                    cleaned.push("..");
                }
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}

/// Resolve a raw name to an absolute path strictly below `root`.
///
/// `root` must already be absolute and lexically clean. Returns the path
/// together with the sanitized leaf name actually used.
pub fn resolve_in_root(root: &Path, raw_name: &str) -> Result<(PathBuf, String), StorageError> {
    let leaf = sanitize_filename(raw_name);
    if leaf.is_empty() || leaf.ends_with(TEMP_SUFFIX) {
        return Err(StorageError::InvalidName(raw_name.to_string()));
    }

    let full = lexical_clean(&root.join(&leaf));
    let relative = full
        .strip_prefix(root)
        .map_err(|_| StorageError::PathEscape(raw_name.to_string()))?;

    match relative.components().next() {
        None | Some(Component::ParentDir) => {
            Err(StorageError::PathEscape(raw_name.to_string()))
        }
        Some(_) => Ok((full, leaf)),
    }
}

/// Whether `name` is an in-flight upload rather than a stored book.
pub fn is_temp_name(name: &str) -> bool {
    name.ends_with(TEMP_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageErrorKind;
    use proptest::prelude::*;

    fn root() -> PathBuf {
        if cfg!(windows) {
            PathBuf::from(r"C:\library")
        } else {
            PathBuf::from("/srv/library")
        }
    }

    #[test]
    fn clean_folds_parent_and_current_components() {
        assert_eq!(
            lexical_clean(Path::new("/a/./b/../c")),
            PathBuf::from("/a/c")
        );
        assert_eq!(lexical_clean(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(lexical_clean(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn resolves_plain_name_under_root() {
        let (path, leaf) = resolve_in_root(&root(), "book.epub").unwrap();
        assert_eq!(leaf, "book.epub");
        assert_eq!(path, root().join("book.epub"));
    }

    #[test]
    fn traversal_collapses_to_leaf() {
        let root = root();
        let (path, leaf) = resolve_in_root(&root, "../../etc/passwd").unwrap();
        assert_eq!(leaf, "passwd");
        assert_eq!(path.parent(), Some(root.as_path()));
    }

    #[test]
    fn degenerate_names_are_invalid() {
        for raw in ["", "..", ".", "....", "  ", "\0", " . "] {
            let err = resolve_in_root(&root(), raw).unwrap_err();
            assert_eq!(err.kind(), StorageErrorKind::InvalidName, "raw {:?}", raw);
        }
    }

    #[test]
    fn temp_suffix_is_reserved() {
        let err = resolve_in_root(&root(), "book.epub.uploading").unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::InvalidName);
        assert!(is_temp_name("x.uploading"));
        assert!(!is_temp_name("x.epub"));
    }

    proptest! {
        #[test]
        fn resolved_paths_are_strict_children_of_root(input in any::<String>()) {
            let root = root();
            match resolve_in_root(&root, &input) {
                Ok((path, leaf)) => {
                    prop_assert_eq!(path.parent(), Some(root.as_path()));
                    prop_assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(leaf.as_str()));
                }
                Err(err) => prop_assert!(matches!(
                    err.kind(),
                    StorageErrorKind::InvalidName | StorageErrorKind::PathEscape
                )),
            }
        }

        #[test]
        fn hostile_prefixes_never_escape(
            prefix in prop_oneof![
                Just("../"), Just("../../"), Just("/"), Just("/etc/"),
                Just("C:\\"), Just("\\\\host\\share\\"), Just("..\\..\\"), Just("./"),
            ],
            leaf in "[A-Za-z0-9 ._-]{0,20}",
        ) {
            let input = format!("{}{}", prefix, leaf);
            if let Ok((path, _)) = resolve_in_root(&root(), &input) {
                prop_assert!(path.starts_with(root()));
                prop_assert_ne!(path, root());
            }
        }
    }
}
