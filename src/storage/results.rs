//! Storage result types
//!
//! Defines result structures returned by storage operations.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fs::File;
use std::io::{self, Read};
use std::time::SystemTime;

/// A stored book as seen by a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub name: String,
    pub size: u64,
    #[serde(serialize_with = "serialize_rfc3339")]
    pub mod_time: SystemTime,
}

/// Timestamps go over the wire as RFC 3339 strings in UTC
fn serialize_rfc3339<S: Serializer>(t: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&DateTime::<Utc>::from(*t).to_rfc3339())
}

/// A stored book opened for reading
#[derive(Debug)]
pub struct OpenedFile {
    pub name: String,
    pub file: File,
    pub size: u64,
    pub mod_time: SystemTime,
}

impl Read for OpenedFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}
