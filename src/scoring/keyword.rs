// src/scoring/keyword.rs
use tracing::info;

use crate::types::{Job, SearchCriteria};

const NEUTRAL_SCORE: f64 = 0.5;

/// Local substring-match scorer used when the semantic scorer is out.
///
/// Scores are deterministic; equal scores keep pool order because ranking
/// uses a stable sort.
#[derive(Debug, Clone, Default)]
pub struct KeywordScorer;

impl KeywordScorer {
    pub fn new() -> Self {
        Self
    }

    /// Distinct lower-cased keywords: skills, position words, and the work
    /// mode and location when given.
    pub fn keywords(criteria: &SearchCriteria) -> Vec<String> {
        let mut keywords: Vec<String> = Vec::new();
        let mut push = |keyword: String| {
            if !keyword.is_empty() && !keywords.contains(&keyword) {
                keywords.push(keyword);
            }
        };

        criteria.skill_tokens().into_iter().for_each(&mut push);
        criteria
            .position
            .split_whitespace()
            .map(str::to_lowercase)
            .for_each(&mut push);

        for extra in [&criteria.work_mode, &criteria.location] {
            if SearchCriteria::is_specified(extra) {
                push(extra.trim().to_lowercase());
            }
        }

        keywords
    }

    pub fn score_all(&self, mut jobs: Vec<Job>, criteria: &SearchCriteria) -> Vec<Job> {
        let keywords = Self::keywords(criteria);
        info!(
            "Keyword fallback scoring {} jobs against {} keywords",
            jobs.len(),
            keywords.len()
        );

        for job in &mut jobs {
            let (score, reasoning) = Self::score_one(job, &keywords);
            job.annotate(score, reasoning);
        }
        jobs
    }

    fn score_one(job: &Job, keywords: &[String]) -> (f64, String) {
        if keywords.is_empty() {
            return (
                NEUTRAL_SCORE,
                "Keyword fallback: no keywords to match, neutral score".to_string(),
            );
        }

        let haystack = [
            job.title.as_str(),
            job.company.as_str(),
            job.location.as_str(),
            job.work_mode.as_str(),
            job.description.as_str(),
        ]
        .join(" ")
        .to_lowercase();

        let matched = keywords.iter().filter(|k| haystack.contains(k.as_str())).count();
        let score = (matched as f64 / keywords.len() as f64).min(1.0);

        (
            score,
            format!(
                "Keyword fallback: matched {} of {} keywords",
                matched,
                keywords.len()
            ),
        )
    }
}
