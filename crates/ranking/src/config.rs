use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::retry::RetryConfig;
use crate::RankingError;

/// Environment variable consulted when `api_token` is not set.
pub const API_TOKEN_ENV: &str = "LEXCOMPARE_RANKING_API_TOKEN";

/// Where and how to reach the generative ranking service.
///
/// # Example
/// ```
/// use ranking::RankingConfig;
///
/// let cfg = RankingConfig {
///     endpoint: "http://localhost:11434/api/generate".into(),
///     model: "qwen2.5:3b".into(),
///     ..Default::default()
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RankingConfig {
    /// Completion endpoint that accepts `{model, prompt, stream}` JSON.
    pub endpoint: String,
    /// Model name forwarded in the request body.
    pub model: String,
    /// Bearer token. Falls back to [`API_TOKEN_ENV`] when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Per-request timeout, in milliseconds.
    #[serde(with = "crate::serde_millis")]
    pub request_timeout: Duration,
    /// Connection setup timeout, in milliseconds.
    #[serde(with = "crate::serde_millis")]
    pub connect_timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            model: "qwen2.5:3b".into(),
            api_token: None,
            request_timeout: Duration::from_secs(12),
            connect_timeout: Duration::from_secs(3),
            retry: RetryConfig::default(),
        }
    }
}

impl RankingConfig {
    pub fn validate(&self) -> Result<(), RankingError> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(RankingError::InvalidConfig(
                "endpoint is required for generative ranking".into(),
            ));
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(RankingError::InvalidConfig(format!(
                "endpoint must be an http(s) URL, got {endpoint:?}"
            )));
        }
        if self.model.trim().is_empty() {
            return Err(RankingError::InvalidConfig("model must not be empty".into()));
        }
        if self.request_timeout.is_zero() {
            return Err(RankingError::InvalidConfig(
                "request_timeout must be greater than zero".into(),
            ));
        }
        self.retry.validate()
    }

    /// The configured token, or the one from the environment.
    pub fn resolved_token(&self) -> Option<String> {
        self.api_token
            .clone()
            .or_else(|| std::env::var(API_TOKEN_ENV).ok())
            .filter(|token| !token.trim().is_empty())
    }
}
