// src/providers/mod.rs
//! Job sources. Each provider fetches raw postings in its own shape; the
//! search service normalizes them.

pub mod google_jobs;
pub mod indeed;
pub mod linkedin;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::ProviderError;
use crate::normalizer::RawRecord;
use crate::types::ProviderKind;

pub use google_jobs::GoogleJobsProvider;
pub use indeed::IndeedProvider;
pub use linkedin::LinkedInProvider;

#[async_trait]
pub trait JobProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn fetch(
        &self,
        position: &str,
        location: &str,
        max_results: usize,
    ) -> anyhow::Result<Vec<RawRecord>>;
}

/// Run one provider under a timeout. Failures are logged and yield an empty
/// contribution.
pub async fn fetch_guarded(
    provider: &dyn JobProvider,
    position: &str,
    location: &str,
    max_results: usize,
    timeout: Duration,
) -> Vec<RawRecord> {
    let kind = provider.kind();
    let result =
        tokio::time::timeout(timeout, provider.fetch(position, location, max_results)).await;

    let error = match result {
        Ok(Ok(mut records)) => {
            records.truncate(max_results);
            info!("Provider {} returned {} postings", kind, records.len());
            if !records.is_empty() {
                return records;
            }
            ProviderError::Unavailable {
                provider: kind,
                reason: "no postings returned".to_string(),
            }
        }
        Ok(Err(e)) => ProviderError::Unavailable {
            provider: kind,
            reason: format!("{:#}", e),
        },
        Err(_) => ProviderError::TimedOut {
            provider: kind,
            secs: timeout.as_secs(),
        },
    };

    warn!("{}", error);
    Vec::new()
}

/// Providers enabled by `config`. Keyed API sources without a key are left out.
pub fn build_providers(config: &AppConfig) -> anyhow::Result<Vec<Arc<dyn JobProvider>>> {
    let mut providers: Vec<Arc<dyn JobProvider>> = Vec::new();
    let timeout = config.timeouts.provider();

    if config.providers.linkedin.enabled {
        providers.push(Arc::new(LinkedInProvider::new(
            &config.providers.linkedin,
            timeout,
        )?));
    }

    let google = &config.providers.google_jobs;
    match (&google.api_key, google.enabled) {
        (Some(key), true) => {
            providers.push(Arc::new(GoogleJobsProvider::new(google, key.clone(), timeout)?))
        }
        (None, true) => warn!("SERPAPI_API_KEY not set, Google Jobs provider disabled"),
        _ => {}
    }

    let indeed = &config.providers.indeed;
    match (&indeed.api_key, indeed.enabled) {
        (Some(key), true) => {
            providers.push(Arc::new(IndeedProvider::new(indeed, key.clone(), timeout)?))
        }
        (None, true) => warn!("APIFY_API_KEY not set, Indeed provider disabled"),
        _ => {}
    }

    Ok(providers)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use serde_json::json;

    /// Provider returning canned records, an error, or hanging.
    pub struct StubProvider {
        pub kind: ProviderKind,
        pub records: Vec<RawRecord>,
        pub fail: bool,
        pub delay: Option<Duration>,
    }

    impl StubProvider {
        pub fn with_titles(kind: ProviderKind, titles: &[&str]) -> Self {
            let records = titles
                .iter()
                .map(|t| match kind {
                    ProviderKind::LinkedIn => RawRecord::new(json!({ "job_title": t })),
                    ProviderKind::GoogleJobs => RawRecord::new(json!({ "title": t })),
                    ProviderKind::Indeed => RawRecord::new(json!({ "positionName": t })),
                })
                .collect();
            Self {
                kind,
                records,
                fail: false,
                delay: None,
            }
        }

        pub fn failing(kind: ProviderKind) -> Self {
            Self {
                kind,
                records: Vec::new(),
                fail: true,
                delay: None,
            }
        }
    }

    #[async_trait]
    impl JobProvider for StubProvider {
        fn kind(&self) -> ProviderKind {
            self.kind
        }

        async fn fetch(
            &self,
            _position: &str,
            _location: &str,
            _max_results: usize,
        ) -> anyhow::Result<Vec<RawRecord>> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                anyhow::bail!("stub failure");
            }
            Ok(self.records.clone())
        }
    }
}
