//! Book storage
//!
//! Handles filename sanitization, root containment, atomic saves, listing,
//! opening and deleting of stored books.

pub mod filesystem;
pub mod operations;
pub mod results;
pub mod sanitize;
pub mod shared;
pub mod store;
pub mod validation;

// Re-export commonly used types and functions
pub use results::{OpenedFile, StoredFile};
pub use sanitize::{MAX_FILENAME_BYTES, sanitize_filename};
pub use shared::SharedStore;
pub use store::Store;
pub use validation::{TEMP_SUFFIX, resolve_in_root};
