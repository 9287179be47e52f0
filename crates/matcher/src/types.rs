use std::fmt;

use corpus::{CorpusError, Document};
use ranking::RankingError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which strategy produced a ranking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RankerKind {
    /// Title word overlap plus shared document codes.
    TitleCode,
    /// Edit-distance similarity over content samples.
    ContentSimilarity,
    /// Order returned by an external generative ranking service.
    Generative,
}

impl fmt::Display for RankerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RankerKind::TitleCode => "title_code",
            RankerKind::ContentSimilarity => "content_similarity",
            RankerKind::Generative => "generative",
        };
        f.write_str(name)
    }
}

/// A corpus document proposed as a prior version of the target.
///
/// Serializes as the document's own fields plus `similarity_score`,
/// `has_code_match`, and `ranker`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub document: Document,
    /// Composite score; `[0, 100]` for every built-in ranker except
    /// title/code, which can reach `100 * title_weight + code_bonus`.
    #[serde(rename = "similarity_score")]
    pub score: f64,
    /// Whether target and candidate titles share an exact document code.
    #[serde(default)]
    pub has_code_match: bool,
    pub ranker: RankerKind,
}

impl RankedCandidate {
    pub fn new(document: Document, score: f64, ranker: RankerKind) -> Self {
        Self {
            document,
            score,
            has_code_match: false,
            ranker,
        }
    }

    pub fn id(&self) -> &str {
        &self.document.id
    }
}

/// Errors produced by the matching layer.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Invalid configuration.
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    /// Document repository failed.
    #[error("corpus error: {0}")]
    Corpus(#[from] CorpusError),
    /// Generative ranking failed or returned nothing usable.
    #[error("ranking error: {0}")]
    Ranking(#[from] RankingError),
    /// Primary ranker did not answer within the configured time.
    #[error("ranking timed out after {0} ms")]
    RankingTimeout(u64),
    /// Nothing in the corpus qualifies as a prior version.
    #[error("no candidate prior versions for document {0}")]
    NoCandidates(String),
    /// A ranking task on the blocking pool panicked or was cancelled.
    #[error("ranking worker failed: {0}")]
    Worker(String),
}
