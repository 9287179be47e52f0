use corpus::CorpusError;
use diff::DiffError;
use matcher::MatchError;
use ranking::RankingError;
use thiserror::Error;

/// Failures surfaced by the comparison boundary.
///
/// Missing document content is not an error; it is compared as empty text.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("missing input: {0}")]
    MissingInput(String),

    #[error("no candidate prior versions found for document {0}")]
    NoCandidatesFound(String),

    #[error("ranking service failure: {0}")]
    RankingServiceFailure(String),

    #[error("corpus error: {0}")]
    Corpus(CorpusError),

    #[error("configuration error: {0}")]
    Config(String),

    /// A blocking comparison task panicked or was cancelled.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::MissingInput(_) => "MISSING_INPUT",
            EngineError::NoCandidatesFound(_) => "NO_CANDIDATES_FOUND",
            EngineError::RankingServiceFailure(_) => "RANKING_SERVICE_FAILURE",
            EngineError::Corpus(_) => "CORPUS_ERROR",
            EngineError::Config(_) => "CONFIG_ERROR",
            EngineError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<CorpusError> for EngineError {
    fn from(err: CorpusError) -> Self {
        match err {
            CorpusError::NotFound(id) => {
                EngineError::MissingInput(format!("document {id} not found"))
            }
            other => EngineError::Corpus(other),
        }
    }
}

impl From<MatchError> for EngineError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::NoCandidates(id) => EngineError::NoCandidatesFound(id),
            MatchError::Corpus(err) => err.into(),
            MatchError::Ranking(err) => EngineError::RankingServiceFailure(err.to_string()),
            timeout @ MatchError::RankingTimeout(_) => {
                EngineError::RankingServiceFailure(timeout.to_string())
            }
            MatchError::InvalidConfig(msg) => EngineError::Config(msg),
            MatchError::Worker(msg) => EngineError::Internal(msg),
        }
    }
}

impl From<RankingError> for EngineError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::InvalidConfig(msg) => EngineError::Config(msg),
            other => EngineError::RankingServiceFailure(other.to_string()),
        }
    }
}

impl From<DiffError> for EngineError {
    fn from(err: DiffError) -> Self {
        EngineError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_documents_are_missing_input() {
        let err: EngineError = CorpusError::NotFound("42".into()).into();
        assert!(matches!(err, EngineError::MissingInput(ref msg) if msg.contains("42")));
        assert_eq!(err.code(), "MISSING_INPUT");

        let err: EngineError = CorpusError::Unavailable("down".into()).into();
        assert_eq!(err.code(), "CORPUS_ERROR");
    }

    #[test]
    fn match_errors_map_to_boundary_kinds() {
        let err: EngineError = MatchError::NoCandidates("7".into()).into();
        assert!(matches!(err, EngineError::NoCandidatesFound(ref id) if id == "7"));

        let err: EngineError = MatchError::RankingTimeout(50).into();
        assert_eq!(err.code(), "RANKING_SERVICE_FAILURE");
        assert!(err.to_string().contains("50 ms"));

        let err: EngineError = MatchError::Corpus(CorpusError::NotFound("3".into())).into();
        assert_eq!(err.code(), "MISSING_INPUT");

        let err: EngineError = MatchError::Worker("task panicked".into()).into();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }
}
