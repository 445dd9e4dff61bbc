// src/providers/indeed.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::info;

use super::JobProvider;
use crate::config::IndeedConfig;
use crate::normalizer::RawRecord;
use crate::types::ProviderKind;

/// Indeed postings through an Apify actor. Credit-metered, so callers keep
/// `max_results` small.
pub struct IndeedProvider {
    client: Client,
    api_key: String,
    base_url: String,
    actor: String,
    country: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActorInput<'a> {
    position: &'a str,
    location: &'a str,
    country: &'a str,
    max_items: usize,
}

impl IndeedProvider {
    pub fn new(config: &IndeedConfig, api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            actor: config.actor.clone(),
            country: config.country.clone(),
        })
    }
}

#[async_trait]
impl JobProvider for IndeedProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Indeed
    }

    async fn fetch(
        &self,
        position: &str,
        location: &str,
        max_results: usize,
    ) -> Result<Vec<RawRecord>> {
        info!(
            "Searching Indeed for: {} in {} (max: {} jobs)",
            position, location, max_results
        );

        let url = format!(
            "{}/v2/acts/{}/run-sync-get-dataset-items",
            self.base_url, self.actor
        );
        let input = ActorInput {
            position,
            location,
            country: &self.country,
            max_items: max_results,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&input)
            .send()
            .await
            .context("Failed to send request to Apify")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Apify returned error {}: {}", status, error_text);
        }

        let items: Vec<Value> = response
            .json()
            .await
            .context("Failed to parse Apify dataset items")?;
        info!("Retrieved {} jobs from Apify", items.len());

        Ok(items
            .into_iter()
            .filter(Value::is_object)
            .take(max_results)
            .map(RawRecord::new)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_input_shape() {
        let input = ActorInput {
            position: "Full Stack Developer",
            location: "Islamabad",
            country: "PK",
            max_items: 3,
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["maxItems"], 3);
        assert_eq!(value["position"], "Full Stack Developer");
        assert_eq!(value["country"], "PK");
    }
}
