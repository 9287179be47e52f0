use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::title::CodeExtractor;
use crate::types::MatchError;

/// Code patterns for the Vietnamese legal numbering convention
/// (`15/2022`, `01/2021/TT-BTC`, `2020/QH14`, `09NQ2021`).
pub const DEFAULT_CODE_PATTERNS: [&str; 4] = [
    r"\d+/\d+",
    r"[0-9]+[A-Za-z]+[0-9]+",
    r"\b\d{2,}/\d{4}\b",
    r"\b\d{4}/\d{2,}\b",
];

/// Tuning knobs for candidate lookup and ranking.
///
/// Serde-friendly so it can be embedded in the engine's YAML config; every
/// field has a default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    /// Only consider documents of the target's type.
    #[serde(default = "MatchConfig::default_true")]
    pub same_type_only: bool,
    /// Only consider documents issued on or before the target.
    #[serde(default = "MatchConfig::default_true")]
    pub prior_only: bool,
    /// Title/code candidates scoring below this are dropped.
    #[serde(default = "MatchConfig::default_min_score")]
    pub min_score: f64,
    /// Points added when titles share an exact code.
    #[serde(default = "MatchConfig::default_code_bonus")]
    pub code_bonus: f64,
    /// Multiplier on title word overlap in the title/code score.
    #[serde(default = "MatchConfig::default_title_weight")]
    pub title_weight: f64,
    /// Scores closer than this to their group leader are ordered by date.
    #[serde(default = "MatchConfig::default_tie_window")]
    pub tie_window: f64,
    /// Regexes whose matches count as document codes.
    #[serde(default = "MatchConfig::default_code_patterns")]
    pub code_patterns: Vec<String>,
    /// Pool size cap before any full-content comparison.
    #[serde(default = "MatchConfig::default_max_content_candidates")]
    pub max_content_candidates: usize,
    /// Characters of plain text compared per document by the content ranker.
    #[serde(default = "MatchConfig::default_content_sample_chars")]
    pub content_sample_chars: usize,
    /// Share of the content ranker's score taken from content; the rest is
    /// title similarity.
    #[serde(default = "MatchConfig::default_content_weight")]
    pub content_weight: f64,
    /// Upper bound on the generative ranking call, in milliseconds.
    #[serde(
        default = "MatchConfig::default_ranking_timeout",
        with = "ranking::serde_millis"
    )]
    pub ranking_timeout: Duration,
    /// Result cap for free-text corpus lookups.
    #[serde(default = "MatchConfig::default_search_limit")]
    pub search_limit: usize,
}

impl MatchConfig {
    fn default_true() -> bool {
        true
    }

    pub(crate) fn default_min_score() -> f64 {
        25.0
    }

    pub(crate) fn default_code_bonus() -> f64 {
        20.0
    }

    pub(crate) fn default_title_weight() -> f64 {
        0.8
    }

    pub(crate) fn default_tie_window() -> f64 {
        10.0
    }

    pub(crate) fn default_code_patterns() -> Vec<String> {
        DEFAULT_CODE_PATTERNS.iter().map(|p| p.to_string()).collect()
    }

    pub(crate) fn default_max_content_candidates() -> usize {
        20
    }

    pub(crate) fn default_content_sample_chars() -> usize {
        3000
    }

    pub(crate) fn default_content_weight() -> f64 {
        0.7
    }

    pub(crate) fn default_ranking_timeout() -> Duration {
        Duration::from_secs(15)
    }

    pub(crate) fn default_search_limit() -> usize {
        50
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if !(self.min_score.is_finite() && self.min_score >= 0.0) {
            return Err(MatchError::InvalidConfig(
                "min_score must be a finite value >= 0".into(),
            ));
        }
        if !(self.code_bonus.is_finite() && self.code_bonus >= 0.0) {
            return Err(MatchError::InvalidConfig(
                "code_bonus must be a finite value >= 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.title_weight) {
            return Err(MatchError::InvalidConfig(
                "title_weight must be between 0.0 and 1.0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.content_weight) {
            return Err(MatchError::InvalidConfig(
                "content_weight must be between 0.0 and 1.0".into(),
            ));
        }
        if !(self.tie_window.is_finite() && self.tie_window >= 0.0) {
            return Err(MatchError::InvalidConfig(
                "tie_window must be a finite value >= 0".into(),
            ));
        }
        if self.max_content_candidates == 0 {
            return Err(MatchError::InvalidConfig(
                "max_content_candidates must be greater than zero".into(),
            ));
        }
        if self.content_sample_chars == 0 {
            return Err(MatchError::InvalidConfig(
                "content_sample_chars must be greater than zero".into(),
            ));
        }
        if self.ranking_timeout.is_zero() {
            return Err(MatchError::InvalidConfig(
                "ranking_timeout must be greater than zero".into(),
            ));
        }
        if self.search_limit == 0 {
            return Err(MatchError::InvalidConfig(
                "search_limit must be greater than zero".into(),
            ));
        }
        CodeExtractor::new(&self.code_patterns).map(|_| ())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            same_type_only: true,
            prior_only: true,
            min_score: Self::default_min_score(),
            code_bonus: Self::default_code_bonus(),
            title_weight: Self::default_title_weight(),
            tie_window: Self::default_tie_window(),
            code_patterns: Self::default_code_patterns(),
            max_content_candidates: Self::default_max_content_candidates(),
            content_sample_chars: Self::default_content_sample_chars(),
            content_weight: Self::default_content_weight(),
            ranking_timeout: Self::default_ranking_timeout(),
            search_limit: Self::default_search_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = MatchConfig::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.same_type_only && cfg.prior_only);
        assert_eq!(cfg.min_score, 25.0);
        assert_eq!(cfg.code_patterns.len(), 4);
    }

    #[test]
    fn empty_document_deserializes_to_defaults() {
        let cfg: MatchConfig = serde_json::from_str("{}").expect("defaults");
        assert_eq!(cfg, MatchConfig::default());

        let cfg: MatchConfig =
            serde_json::from_str(r#"{"ranking_timeout": 250, "prior_only": false}"#)
                .expect("partial");
        assert_eq!(cfg.ranking_timeout, Duration::from_millis(250));
        assert!(!cfg.prior_only);
    }

    #[test]
    fn invalid_title_weight_rejected() {
        let cfg = MatchConfig {
            title_weight: 1.5,
            ..MatchConfig::default()
        };
        let err = cfg.validate().expect_err("config should be invalid");
        match err {
            MatchError::InvalidConfig(msg) => assert!(msg.contains("title_weight")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn broken_code_pattern_rejected() {
        let cfg = MatchConfig {
            code_patterns: vec![r"\d+/(".into()],
            ..MatchConfig::default()
        };
        let err = cfg.validate().expect_err("config should be invalid");
        match err {
            MatchError::InvalidConfig(msg) => assert!(msg.contains("code_patterns")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_caps_rejected() {
        for cfg in [
            MatchConfig {
                max_content_candidates: 0,
                ..MatchConfig::default()
            },
            MatchConfig {
                search_limit: 0,
                ..MatchConfig::default()
            },
            MatchConfig {
                ranking_timeout: Duration::ZERO,
                ..MatchConfig::default()
            },
        ] {
            assert!(cfg.validate().is_err());
        }
    }
}
