//! # lexcompare diff (`diff`)
//!
//! Classifies the tokens of two versions of a legal text into additions,
//! deletions, and modifications, and attaches to each entry the piece of the
//! original markup it came from.
//!
//! ## Contract
//!
//! - Input is two token sequences from [`canonical::tokenize`] plus the markup
//!   they were cut from; [`diff_documents`] does the tokenizing for you.
//! - Pure function of `(tokens, markup, config)`. The optional rayon
//!   parallelism does not change the output.
//! - Each output list keeps scan order: additions follow the current
//!   document, deletions the previous one, modifications current-major.
//!
//! Invariant: diffing a document against itself yields an empty
//! [`DiffOutcome`].
//!
//! ## Example Usage
//!
//! ```
//! use diff::{diff_documents, DiffConfig};
//!
//! let previous = "<p>Điều 1. Abc.</p>";
//! let current = "<p>Điều 1. Abc.</p><p>Điều 2. Mới.</p>";
//!
//! let outcome = diff_documents(current, previous, &DiffConfig::default()).unwrap();
//! assert_eq!(outcome.additions.len(), 1);
//! assert_eq!(outcome.additions[0].location, "Đoạn 2");
//! assert!(outcome.deletions.is_empty());
//! ```

mod classify;
pub mod config;
mod entry;
mod labels;
mod snippet;

pub use crate::classify::{diff_documents, diff_tokens, PairBand};
pub use crate::config::{DiffConfig, DiffError};
pub use crate::entry::{DiffEntry, DiffOutcome, ModificationEntry};
pub use crate::labels::Labels;
pub use crate::snippet::extract_snippet;
