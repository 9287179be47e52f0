//! Normalized edit-distance similarity.
//!
//! [`similarity`] is the single scoring primitive used by both the version
//! matcher and the diff engine, so every caller shares one empty-input rule:
//!
//! | left      | right     | score |
//! |-----------|-----------|-------|
//! | empty     | empty     | 100   |
//! | empty     | non-empty | 0     |
//! | identical | identical | 100   |
//!
//! "Empty" means empty after normalization, so whitespace-only input counts.
//!
//! Both inputs are normalized before comparison: Unicode NFC composition,
//! lower-casing, and whitespace collapsing. Distances are measured in Unicode
//! scalar values.

use unicode_normalization::UnicodeNormalization;

use crate::whitespace::collapse_whitespace;

/// Similarity of `a` and `b` in `[0, 100]`.
///
/// `100 * (1 - distance / max(len(a), len(b)))` over the normalized strings.
/// Symmetric: `similarity(a, b) == similarity(b, a)`.
///
/// ```rust
/// use canonical::similarity;
///
/// assert_eq!(similarity("Điều 1", "điều   1"), 100.0);
/// assert_eq!(similarity("", "abc"), 0.0);
/// assert_eq!(similarity("abcd", "abce"), 75.0);
/// ```
pub fn similarity(a: &str, b: &str) -> f64 {
    normalized_similarity(&normalize_for_similarity(a), &normalize_for_similarity(b))
}

/// [`similarity`] for inputs that already went through
/// [`normalize_for_similarity`]. Callers comparing many pairs normalize once
/// and use this.
pub fn normalized_similarity(left: &str, right: &str) -> f64 {
    if left == right {
        return 100.0;
    }
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();
    let longest = left.len().max(right.len());
    let distance = char_edit_distance(&left, &right);

    100.0 * (1.0 - distance as f64 / longest as f64)
}

/// [`similarity`] scaled to `[0, 1]`.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    similarity(a, b) / 100.0
}

/// Levenshtein distance (unit costs) between the raw strings, by Unicode
/// scalar value. No normalization is applied.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let left: Vec<char> = a.chars().collect();
    let right: Vec<char> = b.chars().collect();
    char_edit_distance(&left, &right)
}

/// The normalization [`similarity`] applies before measuring distance.
pub fn normalize_for_similarity(text: &str) -> String {
    let composed: String = text.nfc().collect();
    collapse_whitespace(&composed.to_lowercase())
}

/// Full dynamic-programming matrix, `(m + 1) x (n + 1)`.
fn char_edit_distance(a: &[char], b: &[char]) -> usize {
    let (m, n) = (a.len(), b.len());
    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let width = n + 1;
    let mut d = vec![0usize; (m + 1) * width];
    for i in 0..=m {
        d[i * width] = i;
    }
    for j in 0..=n {
        d[j] = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let deletion = d[(i - 1) * width + j] + 1;
            let insertion = d[i * width + j - 1] + 1;
            let substitution = d[(i - 1) * width + j - 1] + cost;
            d[i * width + j] = deletion.min(insertion).min(substitution);
        }
    }

    d[m * width + n]
}
