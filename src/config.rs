//! YAML configuration for the comparison engine.
//!
//! Every stage config lives in its own crate; [`EngineConfig`] gathers them
//! so a deployment can keep all tuning in one file. Every section is
//! optional and falls back to that stage's defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "production"
//!
//! matcher:
//!   same_type_only: true
//!   prior_only: true
//!   min_score: 25
//!   code_bonus: 20
//!   tie_window: 10
//!   ranking_timeout: 15000
//!
//! diff:
//!   addition_threshold: 0.6
//!   modification_upper: 0.85
//!   snippet_context_chars: 100
//!   use_parallel: false
//!   labels: vietnamese
//!   tokenize:
//!     long_paragraph_chars: 300
//!     min_sentence_chars: 100
//!
//! ranking:
//!   endpoint: "http://localhost:11434/api/generate"
//!   model: "qwen2.5:3b"
//!   request_timeout: 12000
//! ```
//!
//! Without a `ranking` section no generative ranking is attempted.

use std::fs;
use std::path::Path;

use diff::DiffConfig;
use matcher::MatchConfig;
use ranking::RankingConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration for matching, diffing and generative ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Configuration format version
    #[serde(default = "EngineConfig::default_version")]
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub matcher: MatchConfig,

    #[serde(default)]
    pub diff: DiffConfig,

    /// Generative ranking service; `None` disables it.
    #[serde(default)]
    pub ranking: Option<RankingConfig>,
}

impl EngineConfig {
    fn default_version() -> String {
        "1.0".to_string()
    }

    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: EngineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.matcher
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        self.diff
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        if let Some(ranking) = &self.ranking {
            ranking
                .validate()
                .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        }
        Ok(())
    }

    pub fn with_ranking(mut self, ranking: RankingConfig) -> Self {
        self.ranking = Some(ranking);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            name: None,
            matcher: MatchConfig::default(),
            diff: DiffConfig::default(),
            ranking: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diff::Labels;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "test config"
matcher:
  min_score: 30
  same_type_only: false
diff:
  labels: english
  use_parallel: true
"#;

        let config = EngineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.name, Some("test config".to_string()));
        assert_eq!(config.matcher.min_score, 30.0);
        assert!(!config.matcher.same_type_only);
        assert!(config.matcher.prior_only);
        assert_eq!(config.diff.labels, Labels::English);
        assert!(config.diff.use_parallel);
        assert!(config.ranking.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
version: "1"
ranking:
  endpoint: "http://localhost:11434/api/generate"
  request_timeout: 5000
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = EngineConfig::from_file(temp_file.path()).unwrap();
        let ranking = config.ranking.expect("ranking section");
        assert_eq!(ranking.request_timeout, Duration::from_millis(5000));
        assert_eq!(ranking.model, "qwen2.5:3b");
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.version, "1.0");
        assert!(config.validate().is_ok());
        assert_eq!(EngineConfig::from_yaml("{}").unwrap(), config);
    }

    #[test]
    fn test_unsupported_version() {
        let err = EngineConfig::from_yaml("version: \"2.0\"").unwrap_err();
        assert!(matches!(err, ConfigLoadError::UnsupportedVersion(v) if v == "2.0"));
    }

    #[test]
    fn test_stage_validation() {
        let yaml = r#"
diff:
  addition_threshold: 0.9
  modification_upper: 0.5
"#;
        let err = EngineConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("addition_threshold"));

        let yaml = r#"
matcher:
  code_patterns: ["(unclosed"]
"#;
        let err = EngineConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("code_patterns"));

        let yaml = r#"
ranking:
  endpoint: "ftp://example.org"
"#;
        assert!(matches!(
            EngineConfig::from_yaml(yaml),
            Err(ConfigLoadError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigLoadError::FileRead(_)));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = EngineConfig::from_yaml("matcher: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigLoadError::YamlParse(_)));
    }
}
