//! End-to-end search runs against fixture providers and stub scoring backends.

mod common;

use common::{
    google_result, indeed_item, linkedin_posting, service, DownGenerator, FixtureProvider,
    NeedleGenerator,
};
use job_finder::providers::JobProvider;
use job_finder::scoring::TextGenerator;
use job_finder::types::{ProviderKind, SearchCriteria, SearchOutcome, WorkMode};
use std::sync::Arc;

fn criteria() -> SearchCriteria {
    SearchCriteria::new("Rust Developer", "Pakistan")
        .with_skills("rust, tokio")
        .with_work_mode("remote")
}

#[tokio::test]
async fn test_semantic_search_ranks_normalized_jobs() {
    let linkedin = FixtureProvider::new(
        ProviderKind::LinkedIn,
        vec![
            linkedin_posting(
                "Senior Rust Engineer",
                "We build Rust services. 3-5 years of experience required. Remote team.",
            ),
            linkedin_posting("PHP Developer", "Laravel work, onsite in Lahore."),
        ],
    );
    let google = FixtureProvider::new(
        ProviderKind::GoogleJobs,
        vec![google_result("Backend Developer", "Rust and tokio, hybrid schedule.")],
    );
    let indeed = FixtureProvider::new(ProviderKind::Indeed, vec![indeed_item("Java Developer")]);
    let generator = NeedleGenerator::new("rust");

    let outcome = service(
        vec![
            linkedin as Arc<dyn JobProvider>,
            google as Arc<dyn JobProvider>,
            indeed.clone() as Arc<dyn JobProvider>,
        ],
        Some(generator.clone() as Arc<dyn TextGenerator>),
    )
    .search(&criteria())
    .await
    .unwrap();

    assert_eq!(indeed.calls(), 1);
    assert_eq!(generator.calls(), 4);

    let jobs = outcome.into_jobs();
    let titles: Vec<_> = jobs.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["Senior Rust Engineer", "Backend Developer"]);

    let rust = &jobs[0];
    assert_eq!(rust.source, ProviderKind::LinkedIn);
    assert_eq!(rust.work_mode, WorkMode::Remote);
    assert_eq!(rust.experience, "3-5 years of experience");
    assert_eq!(rust.relevance_score, Some(0.9));
    assert_eq!(rust.relevance_reasoning.as_deref(), Some("needle check"));

    let backend = &jobs[1];
    assert_eq!(backend.work_mode, WorkMode::Remote);
    assert_eq!(backend.apply_url, "https://careers.arbisoft.test/backend-developer");
}

#[tokio::test]
async fn test_scoring_outage_falls_back_to_keywords() {
    let linkedin = FixtureProvider::new(
        ProviderKind::LinkedIn,
        vec![
            linkedin_posting("Rust Developer", "Remote Rust role using tokio in Pakistan."),
            linkedin_posting("Office Manager", "Front desk duties."),
        ],
    );
    let generator = DownGenerator::new();

    let outcome = service(
        vec![linkedin as Arc<dyn JobProvider>],
        Some(generator.clone() as Arc<dyn TextGenerator>),
    )
    .search(&criteria())
    .await
    .unwrap();

    assert_eq!(generator.calls(), 1);
    let jobs = outcome.into_jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].title, "Rust Developer");
    assert!(jobs[0]
        .relevance_reasoning
        .as_deref()
        .unwrap()
        .starts_with("Keyword fallback"));
}

#[tokio::test]
async fn test_no_semantic_backend_uses_keywords() {
    let google = FixtureProvider::new(
        ProviderKind::GoogleJobs,
        vec![google_result("Rust Developer", "tokio services")],
    );

    let outcome = service(vec![google as Arc<dyn JobProvider>], None)
        .search(&criteria())
        .await
        .unwrap();

    let jobs = outcome.into_jobs();
    assert_eq!(jobs.len(), 1);
    assert!(jobs[0].score() >= 0.3);
}

#[tokio::test]
async fn test_supplementary_source_skipped_when_primary_is_plentiful() {
    let postings = (0..10)
        .map(|i| linkedin_posting(&format!("Rust Developer {}", i), "Rust tokio remote Pakistan"))
        .collect();
    let linkedin = FixtureProvider::new(ProviderKind::LinkedIn, postings);
    let indeed = FixtureProvider::new(ProviderKind::Indeed, vec![indeed_item("Rust Developer")]);

    let providers: Vec<Arc<dyn JobProvider>> = vec![linkedin, indeed.clone()];
    let outcome = service(providers, None)
        .search(&criteria())
        .await
        .unwrap();

    assert_eq!(indeed.calls(), 0);
    assert_eq!(outcome.len(), 10);
}

#[tokio::test]
async fn test_every_source_failing_yields_no_results() {
    let providers: Vec<Arc<dyn JobProvider>> = vec![
        FixtureProvider::failing(ProviderKind::LinkedIn),
        FixtureProvider::failing(ProviderKind::GoogleJobs),
        FixtureProvider::new(ProviderKind::Indeed, Vec::new()),
    ];
    let generator = NeedleGenerator::new("rust");

    let outcome = service(providers, Some(generator.clone() as Arc<dyn TextGenerator>))
        .search(&criteria())
        .await
        .unwrap();

    assert_eq!(outcome, SearchOutcome::NoResults);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_indeed_job_type_means_onsite() {
    let indeed = FixtureProvider::new(ProviderKind::Indeed, vec![indeed_item("Rust Developer")]);

    let jobs = service(vec![indeed as Arc<dyn JobProvider>], None)
        .search(&SearchCriteria::new("Rust Developer", ""))
        .await
        .unwrap()
        .into_jobs();

    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].work_mode, WorkMode::Onsite);
    assert_eq!(jobs[0].apply_url, "https://pk.indeed.test/viewjob?jk=1");
}

#[tokio::test]
async fn test_same_posting_from_two_sources_is_listed_once() {
    let mut repost = google_result("Rust Developer", "Rust and tokio, remote.");
    repost["apply_options"][0]["link"] =
        serde_json::json!("https://www.linkedin.com/jobs/view/rust-developer");
    let linkedin = FixtureProvider::new(
        ProviderKind::LinkedIn,
        vec![linkedin_posting("Rust Developer", "Remote Rust role using tokio in Pakistan.")],
    );
    let google = FixtureProvider::new(
        ProviderKind::GoogleJobs,
        vec![repost, google_result("Rust Platform Engineer", "Rust and tokio, remote.")],
    );
    let generator = NeedleGenerator::new("rust");

    let jobs = service(
        vec![linkedin as Arc<dyn JobProvider>, google as Arc<dyn JobProvider>],
        Some(generator.clone() as Arc<dyn TextGenerator>),
    )
    .search(&criteria())
    .await
    .unwrap()
    .into_jobs();

    assert_eq!(generator.calls(), 2);
    let titles: Vec<_> = jobs.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["Rust Developer", "Rust Platform Engineer"]);
    assert_eq!(jobs[0].source, ProviderKind::LinkedIn);
}
