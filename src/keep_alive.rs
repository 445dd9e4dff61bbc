// src/keep_alive.rs
//! Periodic self-ping so hosted instances are not put to sleep while idle.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::KeepAliveConfig;

const PING_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Default)]
struct PingStats {
    pings: AtomicU64,
    last_success: Mutex<Option<DateTime<Utc>>>,
}

pub struct KeepAliveService {
    health_url: Option<String>,
    interval: Duration,
    join_timeout: Duration,
    client: reqwest::Client,
    stop: Arc<AtomicBool>,
    wake: Arc<Notify>,
    stats: Arc<PingStats>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl KeepAliveService {
    pub fn new(config: &KeepAliveConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(PING_TIMEOUT)
            .build()
            .context("Failed to create keep-alive HTTP client")?;

        Ok(Self {
            health_url: config
                .url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(|url| format!("{}/health", url.trim_end_matches('/'))),
            interval: Duration::from_secs(config.interval_minutes.max(1) * 60),
            join_timeout: Duration::from_millis(config.join_timeout_ms),
            client,
            stop: Arc::new(AtomicBool::new(false)),
            wake: Arc::new(Notify::new()),
            stats: Arc::new(PingStats::default()),
            handle: Mutex::new(None),
        })
    }

    /// Overrides the ping interval (minutes in config, finer here).
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn health_url(&self) -> Option<&str> {
        self.health_url.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .map(|h| h.as_ref().is_some_and(|task| !task.is_finished()))
            .unwrap_or(false)
    }

    pub fn ping_count(&self) -> u64 {
        self.stats.pings.load(Ordering::SeqCst)
    }

    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        self.stats.last_success.lock().ok().and_then(|t| *t)
    }

    /// Spawn the ping loop. Returns false when no URL is configured; a second
    /// call while running leaves the existing task alone.
    pub fn start(&self) -> bool {
        let Some(url) = self.health_url.clone() else {
            warn!("Cannot start keep-alive service: no service URL configured");
            return false;
        };

        let Ok(mut handle) = self.handle.lock() else {
            error!("Keep-alive state lock poisoned");
            return false;
        };
        if handle.as_ref().is_some_and(|task| !task.is_finished()) {
            warn!("Keep-alive service is already running");
            return true;
        }

        self.stop.store(false, Ordering::SeqCst);
        let client = self.client.clone();
        let stop = self.stop.clone();
        let wake = self.wake.clone();
        let stats = self.stats.clone();
        let interval = self.interval;

        info!(
            "Keep-alive service started, pinging {} every {}s",
            url,
            interval.as_secs()
        );

        *handle = Some(tokio::spawn(async move {
            while !stop.load(Ordering::SeqCst) {
                ping(&client, &url, &stats).await;
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = wake.notified() => {}
                }
            }
        }));
        true
    }

    /// Signal the loop, then wait up to the join timeout before aborting it.
    pub async fn stop(&self) {
        let task = match self.handle.lock() {
            Ok(mut handle) => handle.take(),
            Err(_) => None,
        };
        let Some(mut task) = task else {
            return;
        };

        self.stop.store(true, Ordering::SeqCst);
        self.wake.notify_one();

        if tokio::time::timeout(self.join_timeout, &mut task).await.is_err() {
            warn!("Keep-alive task did not stop within {:?}, aborting", self.join_timeout);
            task.abort();
        }
        info!("Stopped keep-alive service");
    }
}

async fn ping(client: &reqwest::Client, url: &str, stats: &PingStats) {
    let started = Instant::now();
    stats.pings.fetch_add(1, Ordering::SeqCst);

    match client.get(url).send().await {
        Ok(response) if response.status().is_success() => {
            info!(
                "Keep-alive ping successful: {}, latency: {:.2}ms",
                response.status(),
                started.elapsed().as_secs_f64() * 1000.0
            );
            if let Ok(mut last) = stats.last_success.lock() {
                *last = Some(Utc::now());
            }
        }
        Ok(response) => warn!("Keep-alive ping returned non-200 status: {}", response.status()),
        Err(e) => error!("Keep-alive ping failed: {}", e),
    }
}
