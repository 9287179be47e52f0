//! Configuration and error types for the diff engine.

use canonical::TokenizeConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::labels::Labels;

/// Similarity bands and output options for [`diff_tokens`](crate::diff_tokens).
///
/// Thresholds are ratios in `[0, 1]`. For a pair of tokens with similarity
/// `s`:
///
/// | band                                   | meaning      |
/// |----------------------------------------|--------------|
/// | `s < addition_threshold`               | unrelated    |
/// | `addition_threshold <= s <= modification_upper` | modified |
/// | `s > modification_upper`               | unchanged    |
///
/// A token whose best pairing is unrelated is an addition (current side) or a
/// deletion (previous side).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiffConfig {
    #[serde(default = "DiffConfig::default_addition_threshold")]
    pub addition_threshold: f64,
    #[serde(default = "DiffConfig::default_modification_upper")]
    pub modification_upper: f64,
    /// Characters of surrounding markup taken on each side of a snippet match.
    #[serde(default = "DiffConfig::default_snippet_context_chars")]
    pub snippet_context_chars: usize,
    /// Compute similarity rows on the rayon pool.
    #[serde(default)]
    pub use_parallel: bool,
    /// Language of location descriptors.
    #[serde(default)]
    pub labels: Labels,
    /// Tokenizer settings used by [`diff_documents`](crate::diff_documents).
    #[serde(default)]
    pub tokenize: TokenizeConfig,
}

impl DiffConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn default_addition_threshold() -> f64 {
        0.6
    }

    pub(crate) fn default_modification_upper() -> f64 {
        0.85
    }

    pub(crate) fn default_snippet_context_chars() -> usize {
        100
    }

    pub fn with_thresholds(mut self, addition_threshold: f64, modification_upper: f64) -> Self {
        self.addition_threshold = addition_threshold;
        self.modification_upper = modification_upper;
        self
    }

    pub fn with_snippet_context(mut self, chars: usize) -> Self {
        self.snippet_context_chars = chars;
        self
    }

    /// Enable or disable row-parallel similarity computation.
    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Requires `0 < addition_threshold <= modification_upper <= 1` and a
    /// valid tokenizer config.
    pub fn validate(&self) -> Result<(), DiffError> {
        let (low, high) = (self.addition_threshold, self.modification_upper);
        if !(low > 0.0 && low <= high && high <= 1.0) {
            return Err(DiffError::InvalidConfig(format!(
                "thresholds must satisfy 0 < addition_threshold <= modification_upper <= 1 \
                 (got {low} and {high})"
            )));
        }
        self.tokenize
            .validate()
            .map_err(|e| DiffError::InvalidConfig(format!("tokenize: {e}")))
    }
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            addition_threshold: Self::default_addition_threshold(),
            modification_upper: Self::default_modification_upper(),
            snippet_context_chars: Self::default_snippet_context_chars(),
            use_parallel: false,
            labels: Labels::default(),
            tokenize: TokenizeConfig::default(),
        }
    }
}

/// Errors returned by the diff engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiffError {
    #[error("invalid diff config: {0}")]
    InvalidConfig(String),
}
