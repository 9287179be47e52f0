//! # Version matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` finds the documents in a corpus that are most likely earlier
//! versions of a target legal document. It filters the corpus (never the
//! target itself, same type, issued no later than the target), scores what
//! remains, and returns candidates best first.
//!
//! ## Core Types
//!
//! - [`VersionMatcher`]: the entry point; wraps a [`MatchConfig`] and an
//!   optional generative [`ranking::RankingClient`].
//! - [`CandidateRanker`]: one ranking strategy.
//!   - [`TitleCodeRanker`]: title word overlap plus a bonus when both titles
//!     carry the same document code (`15/2022`, `2020/QH14`, ...).
//!   - [`ContentSimilarityRanker`]: edit-distance similarity over the opening
//!     plain text of each document.
//!   - [`GenerativeRanker`]: asks an external service to order the pool.
//!   - [`FallbackRanker`]: time-boxes one ranker and falls back to another.
//! - [`RankingPlan`]: picks the strategy from what data is available.
//! - [`RankedCandidate`]: a document plus its score and provenance.
//!
//! ## Example Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use corpus::Document;
//! use matcher::{MatchConfig, VersionMatcher};
//!
//! let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
//! let target = Document::new("t", "Nghị định 15/2022 về Thuế thu nhập")
//!     .with_type("Nghị định")
//!     .issued_on(day(2022, 1, 28));
//! let corpus = vec![
//!     Document::new("a", "Nghị định 15/2022 về Thuế thu nhập doanh nghiệp")
//!         .with_type("Nghị định")
//!         .issued_on(day(2021, 12, 1)),
//!     Document::new("b", "Quy định về an toàn giao thông")
//!         .with_type("Nghị định")
//!         .issued_on(day(2020, 5, 5)),
//! ];
//!
//! let matcher = VersionMatcher::new(MatchConfig::default()).expect("valid config");
//! let ranked = matcher.find_candidates(&target, &corpus, 5);
//! assert_eq!(ranked[0].id(), "a");
//! assert!(ranked[0].has_code_match);
//! ```
//!
//! Repository-backed lookups go through
//! [`VersionMatcher::previous_versions`], which falls back from structured
//! queries to free-text search and from generative ranking to content
//! similarity when either side is unavailable.

mod config;
mod engine;
mod ranker;
mod title;
mod types;

pub use crate::config::{MatchConfig, DEFAULT_CODE_PATTERNS};
pub use crate::engine::VersionMatcher;
pub use crate::ranker::{
    order_with_tie_window, CandidateRanker, ContentSimilarityRanker, FallbackRanker,
    GenerativeRanker, RankingPlan, TitleCodeRanker,
};
pub use crate::title::{normalize_title, search_terms, title_similarity, CodeExtractor};
pub use crate::types::{MatchError, RankedCandidate, RankerKind};
