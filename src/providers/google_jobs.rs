// src/providers/google_jobs.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use super::JobProvider;
use crate::config::GoogleJobsConfig;
use crate::normalizer::RawRecord;
use crate::types::ProviderKind;

/// Google Jobs results through SerpApi.
pub struct GoogleJobsProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleJobsProvider {
    pub fn new(config: &GoogleJobsConfig, api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl JobProvider for GoogleJobsProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GoogleJobs
    }

    async fn fetch(
        &self,
        position: &str,
        location: &str,
        max_results: usize,
    ) -> Result<Vec<RawRecord>> {
        info!("Searching Google Jobs for: {} in {}", position, location);

        let mut query = vec![
            ("engine", "google_jobs"),
            ("q", position),
            ("hl", "en"),
            ("api_key", self.api_key.as_str()),
        ];
        if !location.trim().is_empty() {
            query.push(("location", location));
        }

        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&query)
            .send()
            .await
            .context("Failed to send request to SerpApi")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("SerpApi returned error {}: {}", status, error_text);
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse SerpApi response")?;

        parse_results(body, max_results)
    }
}

/// Postings from a SerpApi response body. An `error` key is a failure.
pub fn parse_results(body: Value, max_results: usize) -> Result<Vec<RawRecord>> {
    if let Some(error) = body.get("error").and_then(Value::as_str) {
        anyhow::bail!("SerpApi error: {}", error);
    }

    let jobs = match body.get("jobs_results") {
        Some(Value::Array(jobs)) => jobs.clone(),
        _ => {
            let keys: Vec<_> = body
                .as_object()
                .map(|o| o.keys().cloned().collect())
                .unwrap_or_default();
            debug!("No jobs_results in SerpApi response, keys: {:?}", keys);
            Vec::new()
        }
    };

    Ok(jobs
        .into_iter()
        .take(max_results)
        .map(RawRecord::new)
        .collect())
}
