// src/search/service.rs
use anyhow::{Context, Result};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::budget::{SourcePlan, SourceTier};
use super::engine::{ProviderBatch, RankingEngine};
use crate::config::{AppConfig, SearchConfig};
use crate::normalizer::normalize;
use crate::providers::{build_providers, fetch_guarded, JobProvider};
use crate::scoring::{GeminiClient, SemanticScorer};
use crate::types::{SearchCriteria, SearchOutcome};

/// One search request end to end: providers, normalization, ranking.
pub struct JobSearchService {
    providers: Vec<Arc<dyn JobProvider>>,
    plan: SourcePlan,
    engine: RankingEngine,
    settings: SearchConfig,
    provider_timeout: Duration,
}

impl JobSearchService {
    pub fn new(
        providers: Vec<Arc<dyn JobProvider>>,
        plan: SourcePlan,
        engine: RankingEngine,
        settings: SearchConfig,
        provider_timeout: Duration,
    ) -> Self {
        let mut providers = providers;
        providers.sort_by_key(|p| plan.priority(p.kind()));
        Self {
            providers,
            plan,
            engine,
            settings,
            provider_timeout,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let providers = build_providers(config).context("Failed to build job providers")?;

        let semantic = match &config.scoring.api_key {
            Some(key) => {
                let client = GeminiClient::new(&config.scoring, key.clone(), config.timeouts.scoring())?;
                Some(SemanticScorer::new(Arc::new(client), config.timeouts.scoring()))
            }
            None => {
                warn!("GOOGLE_API_KEY not set, relevance scoring will use keyword matching only");
                None
            }
        };

        let engine = RankingEngine::new(
            semantic,
            config.search.scoring_budget,
            config.search.scoring_concurrency,
        );

        Ok(Self::new(
            providers,
            SourcePlan::from_config(config),
            engine,
            config.search.clone(),
            config.timeouts.provider(),
        ))
    }

    pub fn settings(&self) -> &SearchConfig {
        &self.settings
    }

    pub async fn search(&self, criteria: &SearchCriteria) -> Result<SearchOutcome> {
        self.search_with(criteria, self.settings.min_score, self.settings.max_results)
            .await
    }

    pub async fn search_with(
        &self,
        criteria: &SearchCriteria,
        min_score: f64,
        max_results: usize,
    ) -> Result<SearchOutcome> {
        if !SearchCriteria::is_specified(&criteria.position) {
            anyhow::bail!("position must not be empty");
        }

        let search_id = Uuid::new_v4();
        let span = info_span!("search", %search_id, position = %criteria.position);

        async move {
            let batches = self.collect(criteria).await;
            let total: usize = batches.iter().map(|b| b.jobs.len()).sum();

            if total == 0 {
                warn!("All sources returned no jobs");
                return Ok(SearchOutcome::NoResults);
            }

            info!("Ranking {} jobs from {} sources", total, batches.len());
            let ranked = self
                .engine
                .aggregate(batches, criteria, min_score, max_results)
                .await;
            info!("Returning {} relevant jobs", ranked.len());

            Ok(SearchOutcome::Ranked(ranked))
        }
        .instrument(span)
        .await
    }

    /// Cheap providers run concurrently; the supplementary tier is decided
    /// only once they have all finished.
    async fn collect(&self, criteria: &SearchCriteria) -> Vec<ProviderBatch> {
        let (cheap, supplementary): (Vec<_>, Vec<_>) = self
            .providers
            .iter()
            .partition(|p| self.plan.tier_of(p.kind()) != Some(SourceTier::Supplementary));

        let mut batches = join_all(cheap.into_iter().map(|p| self.fetch_batch(p.as_ref(), criteria))).await;

        let found: usize = batches.iter().map(|b| b.jobs.len()).sum();
        if supplementary.is_empty() {
            return batches;
        }

        if self.plan.should_call_supplementary(found) {
            info!(
                "Only {} jobs from primary sources (threshold {}), querying supplementary sources",
                found,
                self.plan.threshold()
            );
            for provider in supplementary {
                batches.push(self.fetch_batch(provider.as_ref(), criteria).await);
            }
        } else {
            info!(
                "{} jobs from primary sources, skipping supplementary sources",
                found
            );
        }

        batches
    }

    async fn fetch_batch(&self, provider: &dyn JobProvider, criteria: &SearchCriteria) -> ProviderBatch {
        let kind = provider.kind();
        let max_results = self
            .plan
            .entry(kind)
            .map(|e| e.max_results)
            .unwrap_or(self.settings.max_results);

        let records = fetch_guarded(
            provider,
            criteria.position.trim(),
            criteria.location.trim(),
            max_results,
            self.provider_timeout,
        )
        .await;

        let jobs = records.iter().map(|raw| normalize(raw, kind)).collect();
        ProviderBatch::new(kind, jobs)
    }
}
