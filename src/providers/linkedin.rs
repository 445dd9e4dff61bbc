// src/providers/linkedin.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde_json::json;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use super::JobProvider;
use crate::config::LinkedInConfig;
use crate::normalizer::RawRecord;
use crate::types::ProviderKind;

const DETAIL_CONCURRENCY: usize = 4;

/// Scrapes the public LinkedIn guest job-search pages.
pub struct LinkedInProvider {
    client: Client,
    base_url: String,
    collect_window: Duration,
}

impl LinkedInProvider {
    /// `budget` is the provider timeout applied around `fetch`. Posting pages
    /// still pending when 80% of it has passed are dropped, so the postings
    /// already fetched come back before the outer timeout fires.
    pub fn new(config: &LinkedInConfig, budget: Duration) -> Result<Self> {
        let request_timeout = Duration::from_secs(config.request_timeout_secs).min(budget);
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            collect_window: budget.saturating_sub(budget / 5),
        })
    }

    async fn get_html(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error {} from {}", response.status(), url);
        }

        response
            .text()
            .await
            .context("Failed to read response body")
    }

    async fn fetch_posting(&self, job_id: &str) -> Result<RawRecord> {
        let url = format!("{}/jobPosting/{}", self.base_url, job_id);
        let html = self.get_html(&url, &[]).await?;
        Ok(parse_posting(&html, &url))
    }
}

#[async_trait]
impl JobProvider for LinkedInProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::LinkedIn
    }

    async fn fetch(
        &self,
        position: &str,
        location: &str,
        max_results: usize,
    ) -> Result<Vec<RawRecord>> {
        let deadline = Instant::now() + self.collect_window;
        let list_url = format!("{}/seeMoreJobPostings/search", self.base_url);
        info!("Searching LinkedIn for: {} in {}", position, location);

        let html = self
            .get_html(
                &list_url,
                &[("keywords", position), ("location", location), ("start", "0")],
            )
            .await?;
        let job_ids = parse_job_ids(&html, max_results);
        debug!("LinkedIn listing returned {} job ids", job_ids.len());

        let postings: Vec<RawRecord> = stream::iter(job_ids)
            .map(|id| async move {
                match timeout_at(deadline, self.fetch_posting(&id)).await {
                    Ok(Ok(record)) => Some(record),
                    Ok(Err(e)) => {
                        warn!("Skipping LinkedIn posting {}: {:#}", id, e);
                        None
                    }
                    Err(_) => {
                        warn!("Skipping LinkedIn posting {}: out of time", id);
                        None
                    }
                }
            })
            .buffered(DETAIL_CONCURRENCY)
            .filter_map(|record| async move { record })
            .collect()
            .await;

        Ok(postings)
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Job ids from the `data-entity-urn` of each listing card, in page order.
pub fn parse_job_ids(html: &str, max_results: usize) -> Vec<String> {
    let document = Html::parse_fragment(html);
    let Some(card) = selector("li div.base-card") else {
        return Vec::new();
    };

    document
        .select(&card)
        .filter_map(|el| el.value().attr("data-entity-urn"))
        .filter_map(|urn| urn.rsplit(':').next())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .take(max_results)
        .collect()
}

/// Raw posting from a job detail page.
pub fn parse_posting(html: &str, url: &str) -> RawRecord {
    let document = Html::parse_document(html);

    let criteria: Vec<serde_json::Value> = selector("li.description__job-criteria-item")
        .map(|item_sel| {
            document
                .select(&item_sel)
                .filter_map(|item| {
                    let label = first_text(item, "h3.description__job-criteria-subheader")?;
                    let value = first_text(item, "span.description__job-criteria-text")?;
                    Some(json!({ "label": label, "value": value }))
                })
                .collect()
        })
        .unwrap_or_default();

    let page_text = clean_text(&document.root_element().text().collect::<Vec<_>>().join(" "));

    RawRecord::new(json!({
        "job_title": find_text_by_selectors(&document, &["h2.top-card-layout__title", "h1.top-card-layout__title"]),
        "company": find_text_by_selectors(&document, &["a.topcard__org-name-link", "span.topcard__flavor"]),
        "location": find_text_by_selectors(&document, &["span.topcard__flavor--bullet"]),
        "description": find_text_by_selectors(&document, &["div.show-more-less-html__markup", "div.description__text"]),
        "criteria": criteria,
        "page_text": page_text,
        "apply_link": url,
    }))
}

fn first_text(element: ElementRef<'_>, css: &str) -> Option<String> {
    let sel = selector(css)?;
    let text = clean_text(&element.select(&sel).next()?.text().collect::<Vec<_>>().join(" "));
    (!text.is_empty()).then_some(text)
}

fn find_text_by_selectors(document: &Html, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        if let Some(sel) = selector(selector_str) {
            if let Some(element) = document.select(&sel).next() {
                let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    None
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize;
    use crate::types::WorkMode;

    const LISTING: &str = r#"
        <li><div class="base-card" data-entity-urn="urn:li:jobPosting:111"></div></li>
        <li><div class="base-card" data-entity-urn="urn:li:jobPosting:222"></div></li>
        <li><div class="other"></div></li>
        <li><div class="base-card" data-entity-urn="urn:li:jobPosting:333"></div></li>
    "#;

    const POSTING: &str = r#"
        <html><body>
          <h2 class="top-card-layout__title">Senior   Rust Engineer</h2>
          <a class="topcard__org-name-link">  Ferrous Systems </a>
          <span class="topcard__flavor--bullet">Islamabad, Pakistan</span>
          <div class="show-more-less-html__markup">
            We are a hybrid team. 5+ years of experience with async Rust.
          </div>
          <ul>
            <li class="description__job-criteria-item">
              <h3 class="description__job-criteria-subheader">Employment type</h3>
              <span class="description__job-criteria-text">Full-time</span>
            </li>
          </ul>
        </body></html>
    "#;

    #[test]
    fn test_parse_job_ids() {
        assert_eq!(parse_job_ids(LISTING, 10), vec!["111", "222", "333"]);
        assert_eq!(parse_job_ids(LISTING, 2), vec!["111", "222"]);
        assert!(parse_job_ids("<p>nothing</p>", 5).is_empty());
    }

    #[test]
    fn test_parse_posting_normalizes() {
        let raw = parse_posting(POSTING, "https://linkedin.example/jobPosting/111");
        let job = normalize(&raw, ProviderKind::LinkedIn);

        assert_eq!(job.title, "Senior Rust Engineer");
        assert_eq!(job.company, "Ferrous Systems");
        assert_eq!(job.location, "Islamabad, Pakistan");
        assert_eq!(
            job.description,
            "We are a hybrid team. 5+ years of experience with async Rust."
        );
        assert_eq!(job.experience, "5+ years of experience");
        assert_eq!(job.work_mode, WorkMode::Hybrid);
        assert_eq!(job.salary, "Not specified");
        assert_eq!(job.apply_url, "https://linkedin.example/jobPosting/111");
    }

    /// Local guest API: listing plus posting pages, one of which never answers.
    async fn serve_listing(hang_on: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 8192];
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    let request = String::from_utf8_lossy(&buf[..n]).to_string();
                    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                    if path.ends_with(hang_on) {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        return;
                    }
                    let body = if path.contains("seeMoreJobPostings") {
                        LISTING
                    } else {
                        POSTING
                    };
                    let response = format!(
                        "HTTP/1.1 200 OK\r\ncontent-type: text/html\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_hanging_posting_keeps_the_rest() {
        let config = LinkedInConfig {
            base_url: serve_listing("/jobPosting/333").await,
            ..LinkedInConfig::default()
        };
        let budget = Duration::from_secs(1);
        let provider = LinkedInProvider::new(&config, budget).unwrap();

        let records =
            crate::providers::fetch_guarded(&provider, "rust", "Pakistan", 10, budget).await;

        assert_eq!(records.len(), 2);
        assert!(records
            .iter()
            .all(|r| r.text("apply_link").is_some_and(|u| !u.ends_with("/333"))));
    }
}
