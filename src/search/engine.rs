// src/search/engine.rs
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use tracing::{error, info, warn};

use crate::error::ScoringError;
use crate::scoring::{KeywordScorer, RelevanceScore, SemanticScorer};
use crate::types::{Job, ProviderKind, SearchCriteria, APPLY_URL_PLACEHOLDER};

pub const DEFAULT_SCORING_BUDGET: usize = 15;
pub const DEFAULT_MIN_SCORE: f64 = 0.3;
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// Normalized jobs from one provider.
#[derive(Debug, Clone)]
pub struct ProviderBatch {
    pub provider: ProviderKind,
    pub jobs: Vec<Job>,
}

impl ProviderBatch {
    pub fn new(provider: ProviderKind, jobs: Vec<Job>) -> Self {
        Self { provider, jobs }
    }
}

/// Merges provider results, scores them and returns the ranked list.
pub struct RankingEngine {
    semantic: Option<SemanticScorer>,
    keyword: KeywordScorer,
    scoring_budget: usize,
    concurrency: usize,
}

impl RankingEngine {
    pub fn new(semantic: Option<SemanticScorer>, scoring_budget: usize, concurrency: usize) -> Self {
        Self {
            semantic,
            keyword: KeywordScorer::new(),
            scoring_budget: scoring_budget.max(1),
            concurrency: concurrency.max(1),
        }
    }

    pub fn keyword_only() -> Self {
        Self::new(None, DEFAULT_SCORING_BUDGET, 1)
    }

    pub fn has_semantic(&self) -> bool {
        self.semantic.is_some()
    }

    /// Flatten, score, sort, filter and truncate. Batches are taken in the
    /// order given, which is also the tiebreak order.
    pub async fn aggregate(
        &self,
        batches: Vec<ProviderBatch>,
        criteria: &SearchCriteria,
        min_score: f64,
        max_results: usize,
    ) -> Vec<Job> {
        let pool = dedup(batches.into_iter().flat_map(|b| b.jobs).collect());
        if pool.is_empty() {
            return Vec::new();
        }

        let scored = match &self.semantic {
            Some(semantic) => match self.score_semantic(semantic, &pool, criteria).await {
                Ok(scored) => scored,
                Err(e) => {
                    warn!("Semantic scoring failed ({}), using keyword fallback", e);
                    self.keyword.score_all(pool, criteria)
                }
            },
            None => self.keyword.score_all(pool, criteria),
        };

        rank(scored, min_score, max_results)
    }

    /// Score the first `scoring_budget` jobs. The first call checks the backend:
    /// if the backend is unreachable there, the whole pass fails.
    async fn score_semantic(
        &self,
        semantic: &SemanticScorer,
        pool: &[Job],
        criteria: &SearchCriteria,
    ) -> Result<Vec<Job>, ScoringError> {
        let budgeted = &pool[..pool.len().min(self.scoring_budget)];
        if budgeted.len() < pool.len() {
            info!(
                "Scoring budget: trimming pool from {} to {} jobs",
                pool.len(),
                budgeted.len()
            );
        }

        let Some((first, rest)) = budgeted.split_first() else {
            return Ok(Vec::new());
        };

        let first_result = semantic.score(first, criteria).await;
        if let Err(ScoringError::Unavailable(reason)) = &first_result {
            return Err(ScoringError::Unavailable(reason.clone()));
        }

        let mut scored = Vec::with_capacity(budgeted.len());
        scored.push(attach(first.clone(), first_result));

        let rest: Vec<Job> = stream::iter(rest.iter().cloned())
            .map(|job| async move {
                let result = semantic.score(&job, criteria).await;
                attach(job, result)
            })
            .buffered(self.concurrency)
            .collect()
            .await;
        scored.extend(rest);

        Ok(scored)
    }
}

fn attach(mut job: Job, result: Result<RelevanceScore, ScoringError>) -> Job {
    match result {
        Ok(relevance) => {
            info!("Job '{}' scored {}", job.title, relevance.score);
            job.annotate(relevance.score, relevance.reasoning);
        }
        Err(e) => {
            error!("Error evaluating job '{}': {}", job.title, e);
            job.annotate(0.0, format!("Error during evaluation: {}", e));
        }
    }
    job
}

/// Drop repeated postings, keeping the first occurrence. Postings are the
/// same when they share an apply URL, or title, company and location when
/// no URL is known.
pub fn dedup(jobs: Vec<Job>) -> Vec<Job> {
    let before = jobs.len();
    let mut seen = HashSet::new();
    let unique: Vec<Job> = jobs
        .into_iter()
        .filter(|job| seen.insert(dedup_key(job)))
        .collect();

    if unique.len() < before {
        info!("Dropped {} duplicate postings", before - unique.len());
    }
    unique
}

fn dedup_key(job: &Job) -> String {
    let url = job.apply_url.trim();
    if !url.is_empty() && url != APPLY_URL_PLACEHOLDER {
        return format!("url:{}", url);
    }
    format!(
        "job:{}|{}|{}",
        job.title.trim().to_lowercase(),
        job.company.trim().to_lowercase(),
        job.location.trim().to_lowercase()
    )
}

/// Stable sort by score (descending), drop jobs below `min_score`, keep at
/// most `max_results`.
pub fn rank(mut jobs: Vec<Job>, min_score: f64, max_results: usize) -> Vec<Job> {
    jobs.sort_by(|a, b| b.score().total_cmp(&a.score()));
    jobs.into_iter()
        .filter(|job| job.score() >= min_score)
        .take(max_results)
        .collect()
}
