//! Comparison report assembly.
//!
//! [`compare_documents`] is the boundary for a single comparison: it fills in
//! placeholders for missing metadata, diffs the contents, and wraps the
//! outcome in an [`Envelope`]. It never panics and never returns a Rust error.

use std::time::Instant;

use chrono::NaiveDate;
use corpus::Document;
use diff::{DiffEntry, Labels, ModificationEntry, diff_documents};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::envelope::Envelope;
use crate::error::EngineError;

/// Titles sharing fewer words than this percentage trigger a warning.
pub const TITLE_WARNING_THRESHOLD: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub documents_info: DocumentsInfo,
    pub comparison: Comparison,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentsInfo {
    pub current: DocumentSummary,
    pub previous: DocumentSummary,
    pub similarity: SimilarityInfo,
}

/// Document metadata with placeholders filled in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentSummary {
    pub id: String,
    pub title: String,
    pub document_type: String,
    pub issued_date: Option<NaiveDate>,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityInfo {
    pub is_same_type: bool,
    /// Rounded title word-overlap percentage.
    pub title_similarity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comparison {
    pub additions: Vec<DiffEntry>,
    pub deletions: Vec<DiffEntry>,
    pub modifications: Vec<ModificationEntry>,
    /// Warning banners followed by the change counts, as markup.
    pub summary: String,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Current,
    Previous,
}

impl Side {
    fn as_str(self) -> &'static str {
        match self {
            Side::Current => "current",
            Side::Previous => "previous",
        }
    }
}

/// Compares two documents and reports the result as an [`Envelope`].
///
/// A missing document gives an error envelope. Missing content is compared
/// as empty text with a warning logged.
pub fn compare_documents(
    current: Option<&Document>,
    previous: Option<&Document>,
    cfg: &EngineConfig,
) -> Envelope<ComparisonResult> {
    let start = Instant::now();
    match build_report(current, previous, cfg) {
        Ok(result) => {
            let comparison = &result.comparison;
            info!(
                current_id = %result.documents_info.current.id,
                previous_id = %result.documents_info.previous.id,
                additions = comparison.additions.len(),
                deletions = comparison.deletions.len(),
                modifications = comparison.modifications.len(),
                title_similarity = result.documents_info.similarity.title_similarity,
                elapsed_micros = start.elapsed().as_micros() as u64,
                "compare_success"
            );
            Envelope::success(result)
        }
        Err(err) => {
            warn!(
                code = err.code(),
                error = %err,
                elapsed_micros = start.elapsed().as_micros() as u64,
                "compare_failure"
            );
            Envelope::error(err.to_string())
        }
    }
}

fn build_report(
    current: Option<&Document>,
    previous: Option<&Document>,
    cfg: &EngineConfig,
) -> Result<ComparisonResult, EngineError> {
    let current = current.ok_or_else(|| EngineError::MissingInput("current document".into()))?;
    let previous =
        previous.ok_or_else(|| EngineError::MissingInput("previous document".into()))?;
    let labels = cfg.diff.labels;

    let current_content = content_or_warn(current, Side::Current);
    let previous_content = content_or_warn(previous, Side::Previous);
    let current_info = summarize(current, labels, Side::Current);
    let previous_info = summarize(previous, labels, Side::Previous);

    let is_same_type = current_info.document_type == previous_info.document_type;
    let title_similarity =
        matcher::title_similarity(&current_info.title, &previous_info.title).round() as u32;

    let outcome = diff_documents(current_content, previous_content, &cfg.diff)?;
    let (additions, deletions, modifications) = outcome.counts();

    let mut summary = String::new();
    if !is_same_type {
        summary.push_str(
            &labels.type_mismatch_warning(&current_info.document_type, &previous_info.document_type),
        );
    }
    if title_similarity < TITLE_WARNING_THRESHOLD {
        summary.push_str(&labels.title_mismatch_warning(title_similarity));
    }
    summary.push_str(&labels.summary(additions, deletions, modifications));

    Ok(ComparisonResult {
        documents_info: DocumentsInfo {
            current: current_info,
            previous: previous_info,
            similarity: SimilarityInfo {
                is_same_type,
                title_similarity,
            },
        },
        comparison: Comparison {
            additions: outcome.additions,
            deletions: outcome.deletions,
            modifications: outcome.modifications,
            summary,
        },
    })
}

fn content_or_warn(doc: &Document, side: Side) -> &str {
    if !doc.has_content() {
        warn!(document_id = %doc.id, side = side.as_str(), "content_missing");
    }
    doc.content_or_empty()
}

fn summarize(doc: &Document, labels: Labels, side: Side) -> DocumentSummary {
    let or_placeholder = |value: &str, placeholder: &str| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            placeholder.to_string()
        } else {
            trimmed.to_string()
        }
    };
    let default_version = match side {
        Side::Current => labels.current_version(),
        Side::Previous => labels.previous_version(),
    };

    DocumentSummary {
        id: or_placeholder(&doc.id, "unknown"),
        title: or_placeholder(&doc.title, labels.untitled()),
        document_type: or_placeholder(&doc.document_type, labels.unknown_type()),
        issued_date: doc.issued_date,
        version: or_placeholder(doc.version.as_deref().unwrap_or_default(), default_version),
    }
}
