//! Whitespace normalization utilities.
//!
//! Unicode's definition of whitespace is used throughout, so non-breaking
//! spaces copied out of word processors (U+00A0 is common in scraped legal
//! texts) collapse the same way as ASCII spaces.
//!
//! # Examples
//!
//! ```rust
//! use canonical::collapse_whitespace;
//!
//! assert_eq!(collapse_whitespace("  Điều   1.\n\tPhạm vi  "), "Điều 1. Phạm vi");
//! assert_eq!(collapse_whitespace("a\u{00A0}b"), "a b");
//! ```

/// Collapses repeated whitespace, trims edges, and normalizes newlines to
/// single spaces.
///
/// Returns an empty string for empty or whitespace-only input.
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}

/// Converts `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
