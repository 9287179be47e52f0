//! lexcompare corpus layer.
//!
//! Documents live in someone else's store. This crate defines the shape we
//! read them in ([`Document`]) and the narrow interface we read them through
//! ([`DocumentRepository`]).
//!
//! ## Access modes
//!
//! - **Structured** via [`DocumentRepository::find`]: filter by type and
//!   issue date. Some stores cannot do this and answer
//!   [`CorpusError::Unavailable`].
//! - **Free text** via [`DocumentRepository::search`]: title lookup, always
//!   offered.
//!
//! [`InMemoryRepository`] implements both and can switch structured access
//! off, which is how the fallback ranking paths get exercised in tests.
//!
//! ## Example
//!
//! ```
//! use corpus::{Document, DocumentRepository, InMemoryRepository};
//!
//! let repo = InMemoryRepository::new(vec![Document::new("1", "Luật Đất đai 2013")]);
//! assert_eq!(repo.len(), 1);
//! assert!(repo.supports_structured_access());
//! ```

mod error;
mod repository;
mod types;

pub use crate::error::CorpusError;
pub use crate::repository::{DocumentRepository, InMemoryRepository};
pub use crate::types::{Document, DocumentFilter};
