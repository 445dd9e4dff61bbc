// src/search/budget.rs
//! Which providers run, in what order, and how many jobs each is asked for.

use crate::config::AppConfig;
use crate::types::ProviderKind;

pub const DEFAULT_SUPPLEMENTARY_THRESHOLD: usize = 8;

/// Call the costly supplementary provider only when the cheap ones came up short.
pub fn decide_supplementary_call(jobs_so_far: usize, threshold: usize) -> bool {
    jobs_so_far < threshold
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTier {
    /// Always queried.
    Cheap,
    /// Rate-limited or credit-metered; gated on the cheap tier's yield.
    Supplementary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub provider: ProviderKind,
    pub tier: SourceTier,
    pub max_results: usize,
}

/// Ordered policy table of providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePlan {
    entries: Vec<PlanEntry>,
    threshold: usize,
}

impl SourcePlan {
    pub fn new(entries: Vec<PlanEntry>, threshold: usize) -> Self {
        Self { entries, threshold }
    }

    /// LinkedIn, then Google Jobs, then Indeed as the supplementary source.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            vec![
                PlanEntry {
                    provider: ProviderKind::LinkedIn,
                    tier: SourceTier::Cheap,
                    max_results: config.providers.linkedin.max_results,
                },
                PlanEntry {
                    provider: ProviderKind::GoogleJobs,
                    tier: SourceTier::Cheap,
                    max_results: config.providers.google_jobs.max_results,
                },
                PlanEntry {
                    provider: ProviderKind::Indeed,
                    tier: SourceTier::Supplementary,
                    max_results: config.search.supplementary_max_results,
                },
            ],
            config.search.supplementary_threshold,
        )
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn entry(&self, provider: ProviderKind) -> Option<&PlanEntry> {
        self.entries.iter().find(|e| e.provider == provider)
    }

    pub fn tier_of(&self, provider: ProviderKind) -> Option<SourceTier> {
        self.entry(provider).map(|e| e.tier)
    }

    /// Plan position of a provider; unknown providers sort last.
    pub fn priority(&self, provider: ProviderKind) -> usize {
        self.entries
            .iter()
            .position(|e| e.provider == provider)
            .unwrap_or(self.entries.len())
    }

    pub fn should_call_supplementary(&self, jobs_so_far: usize) -> bool {
        decide_supplementary_call(jobs_so_far, self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decide_supplementary_call() {
        assert!(decide_supplementary_call(5, DEFAULT_SUPPLEMENTARY_THRESHOLD));
        assert!(!decide_supplementary_call(9, DEFAULT_SUPPLEMENTARY_THRESHOLD));
        assert!(!decide_supplementary_call(8, 8));
        assert!(decide_supplementary_call(0, 1));
        assert!(!decide_supplementary_call(0, 0));
    }

    #[test]
    fn test_default_plan() {
        let plan = SourcePlan::from_config(&AppConfig::default());
        assert_eq!(plan.threshold(), 8);
        assert_eq!(plan.tier_of(ProviderKind::LinkedIn), Some(SourceTier::Cheap));
        assert_eq!(plan.tier_of(ProviderKind::GoogleJobs), Some(SourceTier::Cheap));
        assert_eq!(
            plan.entry(ProviderKind::Indeed),
            Some(&PlanEntry {
                provider: ProviderKind::Indeed,
                tier: SourceTier::Supplementary,
                max_results: 3,
            })
        );
        assert!(plan.priority(ProviderKind::LinkedIn) < plan.priority(ProviderKind::GoogleJobs));
        assert!(plan.should_call_supplementary(5));
        assert!(!plan.should_call_supplementary(9));
    }
}
