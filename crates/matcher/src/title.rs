//! Title comparison: word overlap and document-code extraction.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::MatchError;

static TITLE_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.,(){}\[\]/\-:;]").expect("title punctuation pattern"));

static TRAILING_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}\s*$").expect("trailing year pattern"));

/// Lower-cases, replaces title punctuation with spaces, and collapses runs of
/// whitespace.
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let spaced = TITLE_PUNCTUATION.replace_all(&lowered, " ");
    canonical::collapse_whitespace(&spaced)
}

/// Word-overlap similarity of two titles in `[0, 100]`.
///
/// Counts the words of `a` that also occur as words of `b` and divides by the
/// longer word count. Either title being empty gives 0.
///
/// ```
/// use matcher::title_similarity;
///
/// let score = title_similarity(
///     "Nghị định 15/2022 về Thuế thu nhập",
///     "Nghị định 15/2022 về Thuế thu nhập doanh nghiệp",
/// );
/// assert_eq!(score, 80.0);
/// ```
pub fn title_similarity(a: &str, b: &str) -> f64 {
    let left = normalize_title(a);
    let right = normalize_title(b);
    let left_words: Vec<&str> = left.split_whitespace().collect();
    let right_words: Vec<&str> = right.split_whitespace().collect();
    if left_words.is_empty() || right_words.is_empty() {
        return 0.0;
    }

    let matching = left_words
        .iter()
        .filter(|word| right_words.contains(word))
        .count();
    let total = left_words.len().max(right_words.len());
    matching as f64 / total as f64 * 100.0
}

/// Search text for free-text lookups: the title without a trailing year.
pub fn search_terms(title: &str) -> String {
    TRAILING_YEAR.replace(title.trim(), "").trim().to_string()
}

/// Extracts document codes (`15/2022`, `2020/QH14`, ...) from titles.
///
/// All patterns are compiled into one alternation, so matches never overlap
/// and the leftmost pattern wins at each position.
#[derive(Debug, Clone)]
pub struct CodeExtractor {
    pattern: Option<Regex>,
}

impl CodeExtractor {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, MatchError> {
        let parts: Vec<String> = patterns
            .iter()
            .map(|p| p.as_ref().trim())
            .filter(|p| !p.is_empty())
            .map(|p| format!("(?:{p})"))
            .collect();
        if parts.is_empty() {
            return Ok(Self { pattern: None });
        }
        let pattern = Regex::new(&parts.join("|"))
            .map_err(|e| MatchError::InvalidConfig(format!("code_patterns: {e}")))?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn extract<'a>(&self, title: &'a str) -> Vec<&'a str> {
        match self.pattern {
            Some(ref pattern) => pattern.find_iter(title).map(|m| m.as_str()).collect(),
            None => Vec::new(),
        }
    }

    /// Whether the two titles share at least one exact code.
    pub fn shares_code(&self, a: &str, b: &str) -> bool {
        let left = self.extract(a);
        if left.is_empty() {
            return false;
        }
        self.extract(b).iter().any(|code| left.contains(code))
    }
}
