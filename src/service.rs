use std::sync::Arc;
use std::time::Instant;

use corpus::{Document, DocumentRepository};
use matcher::{RankedCandidate, VersionMatcher};
use ranking::{HttpRankingClient, RankingClient};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::envelope::Envelope;
use crate::error::EngineError;
use crate::report::{ComparisonResult, compare_documents};

/// Repository-backed comparison entry points.
///
/// Every operation returns an [`Envelope`]; failures are logged and turned
/// into error envelopes here.
pub struct ComparisonService {
    repo: Arc<dyn DocumentRepository>,
    matcher: VersionMatcher,
    config: EngineConfig,
}

impl ComparisonService {
    /// Validates `config` and, when it has a `ranking` section, connects the
    /// HTTP ranking client.
    pub fn new(
        repo: Arc<dyn DocumentRepository>,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        config
            .validate()
            .map_err(|e| EngineError::Config(e.to_string()))?;
        let mut matcher = VersionMatcher::new(config.matcher.clone())?;
        if let Some(ranking) = &config.ranking {
            let client = HttpRankingClient::new(ranking.clone())?;
            matcher = matcher.with_ranking_client(Arc::new(client));
        }
        Ok(Self {
            repo,
            matcher,
            config,
        })
    }

    /// Replaces the generative ranking client.
    pub fn with_ranking_client(mut self, client: Arc<dyn RankingClient>) -> Self {
        self.matcher = self.matcher.with_ranking_client(client);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ranked candidate prior versions of `document_id`, best first.
    pub async fn previous_versions(
        &self,
        document_id: &str,
        limit: usize,
    ) -> Envelope<Vec<RankedCandidate>> {
        let start = Instant::now();
        let result = self.rank_previous(document_id, limit).await;
        match &result {
            Ok(ranked) => info!(
                document_id,
                candidates = ranked.len(),
                best = ranked.first().map(|c| c.id()).unwrap_or_default(),
                elapsed_micros = start.elapsed().as_micros() as u64,
                "previous_versions_success"
            ),
            Err(err) => warn!(
                document_id,
                code = err.code(),
                error = %err,
                elapsed_micros = start.elapsed().as_micros() as u64,
                "previous_versions_failure"
            ),
        }
        result.into()
    }

    /// Compares `document_id` with its best-ranked prior version.
    pub async fn compare_with_previous(&self, document_id: &str) -> Envelope<ComparisonResult> {
        match self.resolve_previous(document_id).await {
            Ok((current, previous)) => self.compare_blocking(current, previous).await,
            Err(err) => failure(document_id, err),
        }
    }

    /// Compares two documents picked by id.
    pub async fn compare_by_ids(
        &self,
        current_id: &str,
        previous_id: &str,
    ) -> Envelope<ComparisonResult> {
        let current = match self.repo.get(current_id).await {
            Ok(doc) => doc,
            Err(err) => return failure(current_id, err.into()),
        };
        let previous = match self.repo.get(previous_id).await {
            Ok(doc) => doc,
            Err(err) => return failure(previous_id, err.into()),
        };
        self.compare_blocking(current, previous).await
    }

    /// Runs [`compare_documents`] on the blocking pool; the diff builds a
    /// quadratic similarity matrix and must not hold an async worker.
    async fn compare_blocking(
        &self,
        current: Document,
        previous: Document,
    ) -> Envelope<ComparisonResult> {
        let config = self.config.clone();
        let current_id = current.id.clone();
        let task = tokio::task::spawn_blocking(move || {
            compare_documents(Some(&current), Some(&previous), &config)
        });
        match task.await {
            Ok(envelope) => envelope,
            Err(err) => failure(&current_id, EngineError::Internal(err.to_string())),
        }
    }

    async fn rank_previous(
        &self,
        document_id: &str,
        limit: usize,
    ) -> Result<Vec<RankedCandidate>, EngineError> {
        let target = self.repo.get(document_id).await?;
        let ranked = self
            .matcher
            .previous_versions(&target, self.repo.as_ref(), limit)
            .await?;
        if ranked.is_empty() {
            return Err(EngineError::NoCandidatesFound(target.id));
        }
        Ok(ranked)
    }

    async fn resolve_previous(&self, document_id: &str) -> Result<(Document, Document), EngineError> {
        let current = self.repo.get(document_id).await?;
        let best = self
            .matcher
            .best_previous_version(&current, self.repo.as_ref())
            .await?;
        Ok((current, best.document))
    }
}

fn failure(document_id: &str, err: EngineError) -> Envelope<ComparisonResult> {
    warn!(document_id, code = err.code(), error = %err, "compare_failure");
    Envelope::error(err.to_string())
}
