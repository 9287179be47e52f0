//! Core data model types for the corpus crate.
//!
//! A [`Document`] is plain data owned by an external repository. The engine
//! only reads it. Every field except `id` may be absent in the source system,
//! so deserialization is lenient: numeric ids are accepted and stringified,
//! missing strings default to empty, and missing content stays `None`.
//!
//! # Shape
//!
//! ```text
//! Document
//! ├── id: String
//! ├── title: String
//! ├── document_type: String          # "Nghị định", "Thông tư", "Luật", ...
//! ├── issued_date: Option<NaiveDate>
//! ├── content: Option<String>        # marked-up text
//! └── version: Option<String>        # free-form label
//! ```
//!
//! # Examples
//!
//! ```rust
//! use chrono::NaiveDate;
//! use corpus::Document;
//!
//! let doc = Document::new("42", "Nghị định 15/2022/NĐ-CP")
//!     .with_type("Nghị định")
//!     .issued_on(NaiveDate::from_ymd_opt(2022, 1, 28).unwrap())
//!     .with_content("<p>Điều 1. Phạm vi điều chỉnh</p>");
//!
//! assert!(doc.has_content());
//! assert_eq!(doc.content_or_empty(), "<p>Điều 1. Phạm vi điều chỉnh</p>");
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A legal document as supplied by the repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Document {
    /// Repository identifier. Numeric ids are stringified on deserialization.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Official title, e.g. "Nghị định 15/2022/NĐ-CP về thuế thu nhập".
    #[serde(default)]
    pub title: String,
    /// Document type label used for same-type filtering.
    #[serde(default, alias = "documentType")]
    pub document_type: String,
    /// Date of issue. Unknown dates are `None`.
    #[serde(default, alias = "issuedDate")]
    pub issued_date: Option<NaiveDate>,
    /// Marked-up body text.
    #[serde(default)]
    pub content: Option<String>,
    /// Optional version label.
    #[serde(default)]
    pub version: Option<String>,
}

impl Document {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = document_type.into();
        self
    }

    pub fn issued_on(mut self, date: NaiveDate) -> Self {
        self.issued_date = Some(date);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// The body text, or `""` when it is missing.
    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Whether the document carries non-blank content.
    pub fn has_content(&self) -> bool {
        self.content
            .as_deref()
            .is_some_and(|content| !content.trim().is_empty())
    }

    /// The first `max_chars` characters of the content.
    pub fn content_excerpt(&self, max_chars: usize) -> &str {
        let content = self.content_or_empty();
        match content.char_indices().nth(max_chars) {
            Some((idx, _)) => &content[..idx],
            None => content,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Signed(n) => n.to_string(),
        RawId::Unsigned(n) => n.to_string(),
    })
}

/// Structured query against a repository.
///
/// Every field narrows the result; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    /// Keep only documents of this type.
    pub document_type: Option<String>,
    /// Keep only documents issued on or before this date. Documents without
    /// a date are dropped when this is set.
    pub issued_on_or_before: Option<NaiveDate>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
}

impl DocumentFilter {
    pub fn matches(&self, doc: &Document) -> bool {
        if let Some(ref document_type) = self.document_type {
            if doc.document_type != *document_type {
                return false;
            }
        }
        if let Some(cutoff) = self.issued_on_or_before {
            match doc.issued_date {
                Some(date) if date <= cutoff => {}
                _ => return false,
            }
        }
        true
    }
}
