//! Stub collaborators shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use job_finder::config::AppConfig;
use job_finder::normalizer::RawRecord;
use job_finder::providers::JobProvider;
use job_finder::scoring::{SemanticScorer, TextGenerator};
use job_finder::search::{JobSearchService, RankingEngine, SourcePlan};
use job_finder::types::ProviderKind;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Provider serving canned raw records in its own wire shape.
pub struct FixtureProvider {
    pub kind: ProviderKind,
    pub records: Vec<Value>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FixtureProvider {
    pub fn new(kind: ProviderKind, records: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            kind,
            records,
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(kind: ProviderKind) -> Arc<Self> {
        Arc::new(Self {
            kind,
            records: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobProvider for FixtureProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn fetch(
        &self,
        _position: &str,
        _location: &str,
        max_results: usize,
    ) -> anyhow::Result<Vec<RawRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("upstream returned 503");
        }
        Ok(self
            .records
            .iter()
            .take(max_results)
            .cloned()
            .map(RawRecord::new)
            .collect())
    }
}

/// Scores 0.9 when the job text mentions `needle`, 0.1 otherwise.
pub struct NeedleGenerator {
    pub needle: String,
    pub calls: AtomicUsize,
}

impl NeedleGenerator {
    pub fn new(needle: &str) -> Arc<Self> {
        Arc::new(Self {
            needle: needle.to_lowercase(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for NeedleGenerator {
    async fn evaluate(&self, job_text: &str, _criteria_text: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let score = if job_text.to_lowercase().contains(&self.needle) {
            0.9
        } else {
            0.1
        };
        Ok(format!(
            "Here is my evaluation:\n{{\"title_score\": {score}, \"overall_score\": {score}, \"reasoning\": \"needle check\"}}"
        ))
    }
}

/// Backend that is never reachable.
pub struct DownGenerator {
    pub calls: AtomicUsize,
}

impl DownGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for DownGenerator {
    async fn evaluate(&self, _job_text: &str, _criteria_text: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        anyhow::bail!("dns error: failed to lookup address information")
    }
}

pub fn service(
    providers: Vec<Arc<dyn JobProvider>>,
    generator: Option<Arc<dyn TextGenerator>>,
) -> JobSearchService {
    let config = AppConfig::default();
    let semantic = generator.map(|g| SemanticScorer::new(g, Duration::from_secs(2)));
    JobSearchService::new(
        providers,
        SourcePlan::from_config(&config),
        RankingEngine::new(
            semantic,
            config.search.scoring_budget,
            config.search.scoring_concurrency,
        ),
        config.search.clone(),
        Duration::from_secs(2),
    )
}

fn slug(title: &str) -> String {
    title.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

pub fn linkedin_posting(title: &str, page_text: &str) -> Value {
    serde_json::json!({
        "job_title": title,
        "company": "Systems Ltd",
        "location": "Lahore, Punjab, Pakistan",
        "description": page_text,
        "page_text": page_text,
        "criteria": [{"label": "Employment type", "value": "Full-time"}],
        "apply_link": format!("https://www.linkedin.com/jobs/view/{}", slug(title)),
    })
}

pub fn google_result(title: &str, description: &str) -> Value {
    serde_json::json!({
        "title": title,
        "company_name": "Arbisoft",
        "location": "Islamabad, Pakistan",
        "description": description,
        "detected_extensions": {"work_from_home": true},
        "apply_options": [{"title": "Apply", "link": format!("https://careers.arbisoft.test/{}", slug(title))}],
    })
}

pub fn indeed_item(title: &str) -> Value {
    serde_json::json!({
        "positionName": title,
        "company": "Tkxel",
        "location": "Karachi",
        "description": "Office based role",
        "jobType": ["Full-time"],
        "url": "https://pk.indeed.test/viewjob?jk=1",
    })
}
