//! lexcompare generative ranking.
//!
//! Some deployments can ask a text-completion service to order candidate
//! prior versions by content similarity. This crate owns that conversation:
//! building the prompt, calling the service, and reading a ranked id list out
//! of whatever text comes back.
//!
//! Nothing here is load-bearing. Any failure (bad config, network error,
//! timeout, an answer without ids) is reported as a [`RankingError`] and the
//! matcher ranks algorithmically instead.
//!
//! ## Example
//!
//! ```no_run
//! use ranking::{HttpRankingClient, RankingClient, RankingConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = HttpRankingClient::new(RankingConfig {
//!         endpoint: "http://localhost:11434/api/generate".into(),
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//!     let answer = client.complete("Trả về [1, 2]").await.unwrap();
//!     let ids = ranking::parse_ranked_ids(&answer);
//! }
//! ```
//!
//! ## Env vars
//!
//! - `LEXCOMPARE_RANKING_API_TOKEN` - bearer token when the config has none

mod client;
mod config;
mod error;
mod prompt;
mod retry;
pub mod serde_millis;

pub use crate::client::{extract_answer, HttpRankingClient, RankingClient};
pub use crate::config::{RankingConfig, API_TOKEN_ENV};
pub use crate::error::RankingError;
pub use crate::prompt::{
    build_ranking_prompt, parse_ranked_ids, CANDIDATE_PREVIEW_CHARS, TARGET_EXCERPT_CHARS,
};
pub use crate::retry::{execute_with_retry, RetryConfig, RetryResult};
