//! Configuration types for the tokenizer.
//!
//! [`TokenizeConfig`] controls where long paragraphs are cut into
//! sentence-sized comparison units. Both limits are measured in Unicode
//! scalar values, not bytes, so Vietnamese text with diacritics splits at the
//! same places as plain ASCII of the same visible length.
//!
//! # Examples
//!
//! ```rust
//! use canonical::TokenizeConfig;
//!
//! let config = TokenizeConfig::default();
//! assert_eq!(config.long_paragraph_chars, 300);
//! assert_eq!(config.min_sentence_chars, 100);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Configuration for [`tokenize`](crate::tokenize).
///
/// `TokenizeConfig` is cheap to clone and serde-friendly so it can be embedded
/// in higher-level engine configs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenizeConfig {
    /// Paragraphs strictly longer than this are split into sentence chunks.
    #[serde(default = "TokenizeConfig::default_long_paragraph_chars")]
    pub long_paragraph_chars: usize,

    /// A sentence chunk is only closed at a sentence terminator once it is
    /// strictly longer than this. The end of the paragraph always closes it.
    #[serde(default = "TokenizeConfig::default_min_sentence_chars")]
    pub min_sentence_chars: usize,
}

impl TokenizeConfig {
    pub(crate) fn default_long_paragraph_chars() -> usize {
        300
    }

    pub(crate) fn default_min_sentence_chars() -> usize {
        100
    }

    /// Validate the limits.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.long_paragraph_chars == 0 {
            return Err(CanonicalError::InvalidConfig(
                "long_paragraph_chars must be greater than zero".into(),
            ));
        }
        if self.min_sentence_chars >= self.long_paragraph_chars {
            return Err(CanonicalError::InvalidConfig(
                "min_sentence_chars must be smaller than long_paragraph_chars".into(),
            ));
        }
        Ok(())
    }
}

impl Default for TokenizeConfig {
    fn default() -> Self {
        Self {
            long_paragraph_chars: Self::default_long_paragraph_chars(),
            min_sentence_chars: Self::default_min_sentence_chars(),
        }
    }
}
