use std::sync::Arc;
use std::time::Instant;

use corpus::{Document, DocumentFilter, DocumentRepository};
use ranking::RankingClient;
use tracing::{debug, info};

use crate::config::MatchConfig;
use crate::ranker::{RankingPlan, TitleCodeRanker};
use crate::title::search_terms;
use crate::types::{MatchError, RankedCandidate};


/// Finds the documents most likely to be earlier versions of a target.
pub struct VersionMatcher {
    config: MatchConfig,
    title_ranker: TitleCodeRanker,
    client: Option<Arc<dyn RankingClient>>,
}

impl VersionMatcher {
    /// Validates `config` and compiles its code patterns.
    pub fn new(config: MatchConfig) -> Result<Self, MatchError> {
        config.validate()?;
        let title_ranker = TitleCodeRanker::from_config(&config)?;
        Ok(Self {
            config,
            title_ranker,
            client: None,
        })
    }

    /// Enables generative ranking for lookups without structured corpus
    /// access.
    pub fn with_ranking_client(mut self, client: Arc<dyn RankingClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Whether `candidate` may be proposed as a prior version of `target`.
    ///
    /// Never the target itself. With `same_type_only`, types must match.
    /// With `prior_only` and a dated target, the candidate must be dated on or
    /// before it; an undated target puts no bound on dates.
    pub fn is_eligible(&self, target: &Document, candidate: &Document) -> bool {
        if candidate.id == target.id {
            return false;
        }
        if self.config.same_type_only && candidate.document_type != target.document_type {
            return false;
        }
        if self.config.prior_only {
            if let Some(cutoff) = target.issued_date {
                return candidate.issued_date.is_some_and(|date| date <= cutoff);
            }
        }
        true
    }

    /// Ranks an in-memory corpus by title and code overlap.
    ///
    /// The whole corpus is at hand, so this always takes the title/code path.
    pub fn find_candidates(
        &self,
        target: &Document,
        corpus: &[Document],
        limit: usize,
    ) -> Vec<RankedCandidate> {
        let pool: Vec<Document> = corpus
            .iter()
            .filter(|doc| self.is_eligible(target, doc))
            .cloned()
            .collect();
        let mut ranked = self.title_ranker.rank_sync(target, &pool);
        ranked.truncate(limit);
        ranked
    }

    /// Looks up and ranks prior versions through a repository.
    ///
    /// Uses a structured query when the repository offers one and free-text
    /// title search otherwise; the ranking strategy follows from which of the
    /// two answered (see [`RankingPlan::select`]). An empty result is `Ok`.
    pub async fn previous_versions(
        &self,
        target: &Document,
        repo: &dyn DocumentRepository,
        limit: usize,
    ) -> Result<Vec<RankedCandidate>, MatchError> {
        let start = Instant::now();
        let (fetched, structured) = self.fetch_pool(target, repo).await?;
        let pool: Vec<Document> = fetched
            .into_iter()
            .filter(|doc| self.is_eligible(target, doc))
            .collect();
        if pool.is_empty() {
            debug!(document_id = %target.id, structured, "version_lookup_empty_pool");
            return Ok(Vec::new());
        }

        let plan = RankingPlan::select(structured, self.client.is_some(), target.has_content());
        let ranker = plan.build(&self.config, &self.title_ranker, self.client.clone());
        let mut ranked = ranker.rank(target, &pool).await?;
        ranked.truncate(limit);

        info!(
            document_id = %target.id,
            plan = ?plan,
            pool = pool.len(),
            candidates = ranked.len(),
            elapsed_micros = start.elapsed().as_micros() as u64,
            "version_lookup_success"
        );
        Ok(ranked)
    }

    /// The top-ranked prior version, or [`MatchError::NoCandidates`].
    pub async fn best_previous_version(
        &self,
        target: &Document,
        repo: &dyn DocumentRepository,
    ) -> Result<RankedCandidate, MatchError> {
        self.previous_versions(target, repo, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| MatchError::NoCandidates(target.id.clone()))
    }

    async fn fetch_pool(
        &self,
        target: &Document,
        repo: &dyn DocumentRepository,
    ) -> Result<(Vec<Document>, bool), MatchError> {
        if repo.supports_structured_access() {
            match repo.find(&self.filter_for(target)).await {
                Ok(docs) => return Ok((docs, true)),
                Err(err) if err.is_unavailable() => {
                    debug!(document_id = %target.id, error = %err, "structured_access_unavailable");
                }
                Err(err) => return Err(err.into()),
            }
        }

        let docs = repo
            .search(&search_terms(&target.title), self.config.search_limit)
            .await?;
        Ok((docs, false))
    }

    fn filter_for(&self, target: &Document) -> DocumentFilter {
        DocumentFilter {
            document_type: self
                .config
                .same_type_only
                .then(|| target.document_type.clone()),
            issued_on_or_before: if self.config.prior_only {
                target.issued_date
            } else {
                None
            },
            limit: None,
        }
    }
}
