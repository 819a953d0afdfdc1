//! Filename sanitization
//!
//! Turns an arbitrary, possibly hostile, client-supplied filename into a
//! safe leaf name. Pure string manipulation; no filesystem access.

/// Maximum length of a sanitized leaf name, in bytes.
pub const MAX_FILENAME_BYTES: usize = 200;

/// Sanitize a raw filename into a leaf name.
///
/// Returns an empty string when no usable name remains. Callers must treat
/// that as a rejection rather than substitute a generated name.
///
/// The result is at most [`MAX_FILENAME_BYTES`] long, not exactly that long:
/// truncation stops on a UTF-8 boundary and edge dots/whitespace are trimmed
/// again afterwards.
///
/// Only `/` separates directory components, on every platform. A `\` or `:`
/// is never a separator here; both are replaced by `_` instead.
pub fn sanitize_filename(input: &str) -> String {
    let name = base_name(input.trim());

    let name: String = name
        .chars()
        .filter(|&c| c != '\0')
        .filter_map(|c| match c {
            '/' | '\\' | ':' => Some('_'),
            c if is_control(c) => None,
            c => Some(c),
        })
        .collect();

    let name = trim_edges(&name);
    if name.is_empty() || name == "." || name == ".." {
        return String::new();
    }

    trim_edges(truncate_on_char_boundary(name, MAX_FILENAME_BYTES)).to_string()
}

/// Last `/`-separated segment, ignoring trailing slashes.
///
/// An input made only of slashes yields `"/"`; an empty input yields `"."`.
fn base_name(path: &str) -> &str {
    if path.is_empty() {
        return ".";
    }
    let stripped = path.trim_end_matches('/');
    if stripped.is_empty() {
        return "/";
    }
    match stripped.rfind('/') {
        Some(idx) => &stripped[idx + 1..],
        None => stripped,
    }
}

fn is_control(c: char) -> bool {
    (c as u32) < 0x20 || c == '\u{7f}'
}

// Whitespace and dots are trimmed together so that a name like "a ." cannot
// keep a trailing space once its dot is gone.
fn trim_edges(name: &str) -> &str {
    name.trim_matches(|c: char| c.is_whitespace() || c == '.')
}

fn truncate_on_char_boundary(name: &str, max_bytes: usize) -> &str {
    if name.len() <= max_bytes {
        return name;
    }
    let mut end = max_bytes;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
