//! Workspace umbrella crate for lexcompare.
//!
//! lexcompare finds the most plausible prior version of a legal text in a
//! corpus and reports what changed between the two: added, deleted, and
//! modified passages with the markup they came from.
//!
//! The stages live in their own crates and are re-exported here:
//!
//! - [`canonical`]: markup stripping, tokenization, edit-distance similarity
//! - [`corpus`]: the document model and repository trait
//! - [`ranking`]: the optional generative ranking client
//! - [`matcher`]: candidate prior-version lookup and ranking
//! - [`diff`]: token classification and snippet extraction
//!
//! This crate adds the comparison report ([`compare_documents`]), a
//! repository-backed [`ComparisonService`], and YAML configuration
//! ([`EngineConfig`]). Every public operation answers with an [`Envelope`]
//! rather than a Rust error.
//!
//! ```
//! use lexcompare::{Document, EngineConfig, compare_documents};
//!
//! let previous = Document::new("1", "Luật Đất đai 2003").with_content("<p>Điều 1. Abc.</p>");
//! let current = Document::new("2", "Luật Đất đai 2013")
//!     .with_content("<p>Điều 1. Abc.</p><p>Điều 2. Mới.</p>");
//!
//! let envelope = compare_documents(Some(&current), Some(&previous), &EngineConfig::default());
//! let result = envelope.into_result().unwrap();
//! assert_eq!(result.comparison.additions.len(), 1);
//! ```

pub mod config;
mod envelope;
mod error;
pub mod report;
mod service;

pub use canonical::{Token, TokenKind, TokenizeConfig, similarity, tokenize};
pub use corpus::{CorpusError, Document, DocumentFilter, DocumentRepository, InMemoryRepository};
pub use diff::{DiffConfig, DiffEntry, DiffOutcome, Labels, ModificationEntry, diff_documents};
pub use matcher::{MatchConfig, MatchError, RankedCandidate, RankerKind, VersionMatcher};
pub use ranking::{HttpRankingClient, RankingClient, RankingConfig, RankingError};

pub use crate::config::{ConfigLoadError, EngineConfig};
pub use crate::envelope::{Envelope, Status};
pub use crate::error::EngineError;
pub use crate::report::{ComparisonResult, compare_documents};
pub use crate::service::ComparisonService;

pub use canonical;
pub use corpus;
pub use diff;
pub use matcher;
pub use ranking;
