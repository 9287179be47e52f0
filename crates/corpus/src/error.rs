//! Error types produced by document repositories.
//!
//! | Error | Meaning |
//! |-------|---------|
//! | [`NotFound`](CorpusError::NotFound) | No document with the requested id |
//! | [`Unavailable`](CorpusError::Unavailable) | The repository does not offer this kind of access |
//! | [`Backend`](CorpusError::Backend) | The underlying store failed |
//!
//! `Unavailable` is not a hard failure for callers that can rank candidates
//! another way; the matcher treats it as "structured access is off" and picks
//! a different strategy.
use thiserror::Error;

/// Errors returned by [`DocumentRepository`](crate::DocumentRepository)
/// implementations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CorpusError {
    /// No document with this id exists.
    #[error("document not found: {0}")]
    NotFound(String),

    /// The requested access mode is not offered by this repository.
    #[error("repository access unavailable: {0}")]
    Unavailable(String),

    /// The store behind the repository failed.
    #[error("repository backend error: {0}")]
    Backend(String),
}

impl CorpusError {
    /// Whether the failure means "try another access path" rather than
    /// "the store is broken".
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CorpusError::Unavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        assert_eq!(
            CorpusError::NotFound("42".into()).to_string(),
            "document not found: 42"
        );
        assert!(CorpusError::Backend("disk full".into())
            .to_string()
            .contains("disk full"));
    }

    #[test]
    fn only_unavailable_is_recoverable() {
        assert!(CorpusError::Unavailable("find".into()).is_unavailable());
        assert!(!CorpusError::NotFound("1".into()).is_unavailable());
    }
}
