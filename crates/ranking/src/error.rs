use thiserror::Error;

/// Errors surfaced by ranking clients.
///
/// None of these are fatal to a version lookup. Callers log them and rank the
/// candidates algorithmically instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RankingError {
    /// Endpoint, model, or timing settings are unusable.
    #[error("invalid ranking config: {0}")]
    InvalidConfig(String),
    /// Transport-level failure: DNS, connect, reset.
    #[error("ranking request failed: {0}")]
    Http(String),
    /// The service answered with a non-success status.
    #[error("ranking service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The request did not finish within the configured timeout.
    #[error("ranking request timed out after {0} ms")]
    Timeout(u64),
    /// The body was not JSON or carried no recognizable answer field.
    #[error("malformed ranking response: {0}")]
    MalformedResponse(String),
}

impl RankingError {
    /// Whether another attempt might succeed.
    ///
    /// Transport errors, timeouts, `429`, and `5xx` statuses are transient.
    /// Everything else is returned to the caller on the first failure.
    pub fn is_retryable(&self) -> bool {
        match self {
            RankingError::Http(_) | RankingError::Timeout(_) => true,
            RankingError::Status { status, .. } => *status == 429 || *status >= 500,
            RankingError::InvalidConfig(_) | RankingError::MalformedResponse(_) => false,
        }
    }
}
