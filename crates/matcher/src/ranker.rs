//! Candidate ranking strategies.
//!
//! Every strategy implements [`CandidateRanker`]; [`RankingPlan`] is the one
//! place that decides which one runs for a lookup.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use corpus::Document;
use ranking::{build_ranking_prompt, parse_ranked_ids, RankingClient, RankingError};
use tracing::{debug, warn};

use crate::config::MatchConfig;
use crate::title::{title_similarity, CodeExtractor};
use crate::types::{MatchError, RankedCandidate, RankerKind};

/// Orders a pool of eligible documents for one target.
///
/// The pool has already been filtered (target removed, type and date rules
/// applied). Rankers decide scoring, ordering, and which documents to keep.
#[async_trait]
pub trait CandidateRanker: Send + Sync {
    fn kind(&self) -> RankerKind;

    async fn rank(
        &self,
        target: &Document,
        pool: &[Document],
    ) -> Result<Vec<RankedCandidate>, MatchError>;
}

/// Title word overlap plus a bonus for shared document codes.
#[derive(Debug, Clone)]
pub struct TitleCodeRanker {
    codes: CodeExtractor,
    title_weight: f64,
    code_bonus: f64,
    min_score: f64,
    tie_window: f64,
}

impl TitleCodeRanker {
    pub fn from_config(cfg: &MatchConfig) -> Result<Self, MatchError> {
        Ok(Self {
            codes: CodeExtractor::new(&cfg.code_patterns)?,
            title_weight: cfg.title_weight,
            code_bonus: cfg.code_bonus,
            min_score: cfg.min_score,
            tie_window: cfg.tie_window,
        })
    }

    /// Scores one candidate without applying the threshold.
    pub fn score(&self, target: &Document, candidate: &Document) -> RankedCandidate {
        let title = title_similarity(&target.title, &candidate.title);
        let has_code_match = self.codes.shares_code(&target.title, &candidate.title);
        let bonus = if has_code_match { self.code_bonus } else { 0.0 };
        RankedCandidate {
            document: candidate.clone(),
            score: title * self.title_weight + bonus,
            has_code_match,
            ranker: RankerKind::TitleCode,
        }
    }

    /// Scores, thresholds, and orders the pool.
    pub fn rank_sync(&self, target: &Document, pool: &[Document]) -> Vec<RankedCandidate> {
        let mut ranked: Vec<RankedCandidate> = pool
            .iter()
            .map(|candidate| self.score(target, candidate))
            .filter(|candidate| candidate.score >= self.min_score)
            .collect();
        for candidate in &ranked {
            debug!(
                candidate_id = %candidate.document.id,
                score = candidate.score,
                has_code_match = candidate.has_code_match,
                "title_code_scored"
            );
        }
        order_with_tie_window(&mut ranked, self.tie_window);
        ranked
    }
}

#[async_trait]
impl CandidateRanker for TitleCodeRanker {
    fn kind(&self) -> RankerKind {
        RankerKind::TitleCode
    }

    async fn rank(
        &self,
        target: &Document,
        pool: &[Document],
    ) -> Result<Vec<RankedCandidate>, MatchError> {
        Ok(self.rank_sync(target, pool))
    }
}

/// Edit-distance similarity over the opening plain text of each document.
///
/// The pool is sorted newest first and capped before any content is compared;
/// documents past the cap follow the scored ones with score 0.
#[derive(Debug, Clone)]
pub struct ContentSimilarityRanker {
    max_candidates: usize,
    sample_chars: usize,
    content_weight: f64,
}

impl ContentSimilarityRanker {
    pub fn from_config(cfg: &MatchConfig) -> Self {
        Self {
            max_candidates: cfg.max_content_candidates,
            sample_chars: cfg.content_sample_chars,
            content_weight: cfg.content_weight,
        }
    }

    fn sample(&self, doc: &Document) -> String {
        let text = canonical::strip_markup(doc.content_or_empty());
        text.chars().take(self.sample_chars).collect()
    }

    pub fn rank_sync(&self, target: &Document, pool: &[Document]) -> Vec<RankedCandidate> {
        let mut newest_first: Vec<&Document> = pool.iter().collect();
        newest_first.sort_by(|a, b| newer_first(a.issued_date, b.issued_date));

        let cap = self.max_candidates.min(newest_first.len());
        let (scored, overflow) = newest_first.split_at(cap);
        let target_sample = self.sample(target);

        let mut ranked: Vec<RankedCandidate> = scored
            .iter()
            .map(|doc| {
                let sample = self.sample(doc);
                let title = canonical::similarity(&target.title, &doc.title);
                let score = if sample.is_empty() {
                    title
                } else {
                    let content = canonical::similarity(&target_sample, &sample);
                    content * self.content_weight + title * (1.0 - self.content_weight)
                };
                RankedCandidate::new((*doc).clone(), score.round(), RankerKind::ContentSimilarity)
            })
            .collect();
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        ranked.extend(
            overflow
                .iter()
                .map(|doc| RankedCandidate::new((*doc).clone(), 0.0, RankerKind::ContentSimilarity)),
        );
        ranked
    }
}

#[async_trait]
impl CandidateRanker for ContentSimilarityRanker {
    fn kind(&self) -> RankerKind {
        RankerKind::ContentSimilarity
    }

    /// Runs on the blocking pool: each comparison is a full edit-distance
    /// matrix over up to `content_sample_chars` characters per side.
    async fn rank(
        &self,
        target: &Document,
        pool: &[Document],
    ) -> Result<Vec<RankedCandidate>, MatchError> {
        let ranker = self.clone();
        let target = target.clone();
        let pool = pool.to_vec();
        tokio::task::spawn_blocking(move || ranker.rank_sync(&target, &pool))
            .await
            .map_err(|err| MatchError::Worker(err.to_string()))
    }
}

/// Asks an external completion service for an ordered id list.
///
/// Ranked documents get `round(100 - position * 50 / n)` where `n` is the
/// number of ids in the answer; the rest of the pool follows with score 0.
pub struct GenerativeRanker {
    client: Arc<dyn RankingClient>,
}

impl GenerativeRanker {
    pub fn new(client: Arc<dyn RankingClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CandidateRanker for GenerativeRanker {
    fn kind(&self) -> RankerKind {
        RankerKind::Generative
    }

    async fn rank(
        &self,
        target: &Document,
        pool: &[Document],
    ) -> Result<Vec<RankedCandidate>, MatchError> {
        if pool.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = build_ranking_prompt(target, pool);
        let answer = self.client.complete(&prompt).await?;
        let ids = parse_ranked_ids(&answer);
        let n = ids.len() as f64;

        let mut taken = vec![false; pool.len()];
        let mut ranked = Vec::with_capacity(pool.len());
        for (position, id) in ids.iter().enumerate() {
            let found = pool
                .iter()
                .enumerate()
                .find(|(i, doc)| !taken[*i] && doc.id == *id);
            if let Some((i, doc)) = found {
                taken[i] = true;
                let score = (100.0 - position as f64 * (50.0 / n)).round();
                ranked.push(RankedCandidate::new(doc.clone(), score, RankerKind::Generative));
            }
        }

        if ranked.is_empty() {
            return Err(MatchError::Ranking(RankingError::MalformedResponse(
                "answer named no known candidate ids".into(),
            )));
        }

        ranked.extend(
            pool.iter()
                .zip(&taken)
                .filter(|(_, taken)| !**taken)
                .map(|(doc, _)| RankedCandidate::new(doc.clone(), 0.0, RankerKind::Generative)),
        );
        Ok(ranked)
    }
}

/// Runs `primary` under a timeout and answers from `fallback` when it fails,
/// times out, or ranks nothing.
pub struct FallbackRanker {
    primary: Box<dyn CandidateRanker>,
    fallback: Box<dyn CandidateRanker>,
    timeout: Duration,
}

impl FallbackRanker {
    pub fn new(
        primary: Box<dyn CandidateRanker>,
        fallback: Box<dyn CandidateRanker>,
        timeout: Duration,
    ) -> Self {
        Self {
            primary,
            fallback,
            timeout,
        }
    }
}

#[async_trait]
impl CandidateRanker for FallbackRanker {
    fn kind(&self) -> RankerKind {
        self.primary.kind()
    }

    async fn rank(
        &self,
        target: &Document,
        pool: &[Document],
    ) -> Result<Vec<RankedCandidate>, MatchError> {
        let failure = match tokio::time::timeout(self.timeout, self.primary.rank(target, pool)).await
        {
            Ok(Ok(ranked)) if !ranked.is_empty() || pool.is_empty() => return Ok(ranked),
            Ok(Ok(_)) => "primary ranker returned no candidates".to_string(),
            Ok(Err(err)) => err.to_string(),
            Err(_) => MatchError::RankingTimeout(self.timeout.as_millis() as u64).to_string(),
        };

        warn!(
            document_id = %target.id,
            primary = %self.primary.kind(),
            fallback = %self.fallback.kind(),
            reason = %failure,
            "ranking_fallback"
        );
        self.fallback.rank(target, pool).await
    }
}

/// Which strategy ranks a lookup, chosen from what data is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingPlan {
    /// Structured corpus access: rank by title and codes.
    TitleCode,
    /// Generative ranking, falling back to content similarity.
    GenerativeWithContentFallback,
    /// Content similarity only.
    ContentSimilarity,
}

impl RankingPlan {
    /// - structured corpus access available: title/code
    /// - otherwise, a generative client and target content: generative with
    ///   content fallback
    /// - otherwise content similarity, or title/code when the target has no
    ///   content
    pub fn select(
        structured_access: bool,
        generative_available: bool,
        target_has_content: bool,
    ) -> Self {
        if structured_access {
            RankingPlan::TitleCode
        } else if generative_available && target_has_content {
            RankingPlan::GenerativeWithContentFallback
        } else if target_has_content {
            RankingPlan::ContentSimilarity
        } else {
            RankingPlan::TitleCode
        }
    }

    pub fn build(
        self,
        cfg: &MatchConfig,
        title_ranker: &TitleCodeRanker,
        client: Option<Arc<dyn RankingClient>>,
    ) -> Box<dyn CandidateRanker> {
        let content = || -> Box<dyn CandidateRanker> {
            Box::new(ContentSimilarityRanker::from_config(cfg))
        };
        match (self, client) {
            (RankingPlan::TitleCode, _) => Box::new(title_ranker.clone()),
            (RankingPlan::GenerativeWithContentFallback, Some(client)) => {
                Box::new(FallbackRanker::new(
                    Box::new(GenerativeRanker::new(client)),
                    content(),
                    cfg.ranking_timeout,
                ))
            }
            (RankingPlan::GenerativeWithContentFallback, None)
            | (RankingPlan::ContentSimilarity, _) => content(),
        }
    }
}

/// Sorts by score descending, then reorders near-ties by date.
///
/// Candidates are grouped behind a leader: a candidate joins the current
/// group while `leader.score - score < window`, otherwise it leads a new
/// group. Each group is ordered newest first; undated documents go last.
/// Both sorts are stable, so equal keys keep their input order.
pub fn order_with_tie_window(candidates: &mut [RankedCandidate], window: f64) {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let mut start = 0;
    while start < candidates.len() {
        let leader = candidates[start].score;
        let mut end = start + 1;
        while end < candidates.len() && leader - candidates[end].score < window {
            end += 1;
        }
        candidates[start..end]
            .sort_by(|a, b| newer_first(a.document.issued_date, b.document.issued_date));
        start = end;
    }
}

fn newer_first(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
