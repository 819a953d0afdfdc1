//! Display formatting
//!
//! Human-readable sizes and timestamps for book listings.

use chrono::{DateTime, Local};
use std::time::SystemTime;

const UNIT: u64 = 1024;
const SUFFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// Format a byte count with binary units, e.g. `"512 B"`, `"1.5 KiB"`.
pub fn format_bytes(n: u64) -> String {
    if n < UNIT {
        return format!("{} B", n);
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut v = n / UNIT;
    while v >= UNIT {
        div *= UNIT;
        exp += 1;
        v /= UNIT;
    }
    format!("{:.1} {}iB", n as f64 / div as f64, SUFFIXES[exp])
}

/// Format a timestamp in local time as `YYYY-MM-DD HH:MM`.
pub fn format_time(t: SystemTime) -> String {
    DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M").to_string()
}
