use std::cmp::Ordering;

use async_trait::async_trait;
use tracing::debug;

use crate::{CorpusError, Document, DocumentFilter};

/// Read access to a document store.
///
/// Implementations may offer only part of this surface. A store that cannot
/// answer structured queries returns [`CorpusError::Unavailable`] from
/// [`find`](DocumentRepository::find); callers then fall back to
/// [`search`](DocumentRepository::search).
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Load one document by id.
    async fn get(&self, id: &str) -> Result<Document, CorpusError>;

    /// Structured query by type and date.
    async fn find(&self, filter: &DocumentFilter) -> Result<Vec<Document>, CorpusError>;

    /// Free-text lookup over titles, best matches first.
    async fn search(&self, text: &str, limit: usize) -> Result<Vec<Document>, CorpusError>;

    /// Whether [`find`](DocumentRepository::find) is expected to work.
    fn supports_structured_access(&self) -> bool {
        true
    }
}

/// `Vec`-backed repository for tests and embedders that already hold their
/// documents in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    documents: Vec<Document>,
    structured_access: bool,
}

impl InMemoryRepository {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            structured_access: true,
        }
    }

    /// Turn off [`find`](DocumentRepository::find), leaving only free-text
    /// search.
    pub fn without_structured_access(mut self) -> Self {
        self.structured_access = false;
        self
    }

    pub fn insert(&mut self, document: Document) {
        match self.documents.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => *existing = document,
            None => self.documents.push(document),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryRepository {
    async fn get(&self, id: &str) -> Result<Document, CorpusError> {
        self.documents
            .iter()
            .find(|doc| doc.id == id)
            .cloned()
            .ok_or_else(|| CorpusError::NotFound(id.to_string()))
    }

    async fn find(&self, filter: &DocumentFilter) -> Result<Vec<Document>, CorpusError> {
        if !self.structured_access {
            return Err(CorpusError::Unavailable(
                "structured queries are disabled for this repository".into(),
            ));
        }
        let limit = filter.limit.unwrap_or(usize::MAX);
        let found: Vec<Document> = self
            .documents
            .iter()
            .filter(|doc| filter.matches(doc))
            .take(limit)
            .cloned()
            .collect();
        debug!(matched = found.len(), "repository_find");
        Ok(found)
    }

    async fn search(&self, text: &str, limit: usize) -> Result<Vec<Document>, CorpusError> {
        let words: Vec<String> = text
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect();
        if words.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, &Document)> = self
            .documents
            .iter()
            .filter_map(|doc| {
                let title = doc.title.to_lowercase();
                let hits = words.iter().filter(|w| title.contains(w.as_str())).count();
                (hits > 0).then_some((hits, doc))
            })
            .collect();
        scored.sort_by(|a, b| match b.0.cmp(&a.0) {
            Ordering::Equal => b.1.issued_date.cmp(&a.1.issued_date),
            other => other,
        });

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(_, doc)| doc.clone())
            .collect())
    }

    fn supports_structured_access(&self) -> bool {
        self.structured_access
    }
}
