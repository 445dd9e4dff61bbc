// src/config.rs
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::search::budget::DEFAULT_SUPPLEMENTARY_THRESHOLD;
use crate::search::engine::{DEFAULT_MAX_RESULTS, DEFAULT_MIN_SCORE, DEFAULT_SCORING_BUDGET};

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Everything the service needs, threaded into each component at construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub search: SearchConfig,
    pub scoring: ScoringConfig,
    pub providers: ProvidersConfig,
    pub timeouts: TimeoutConfig,
    pub keep_alive: KeepAliveConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub min_score: f64,
    pub max_results: usize,
    /// Cap on jobs sent to the semantic scorer per request.
    pub scoring_budget: usize,
    pub scoring_concurrency: usize,
    /// The supplementary provider runs only below this many jobs.
    pub supplementary_threshold: usize,
    pub supplementary_max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            max_results: DEFAULT_MAX_RESULTS,
            scoring_budget: DEFAULT_SCORING_BUDGET,
            scoring_concurrency: 4,
            supplementary_threshold: DEFAULT_SUPPLEMENTARY_THRESHOLD,
            supplementary_max_results: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Refuse to start without a semantic scoring key.
    pub require_semantic: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            require_semantic: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub linkedin: LinkedInConfig,
    pub google_jobs: GoogleJobsConfig,
    pub indeed: IndeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInConfig {
    pub enabled: bool,
    pub base_url: String,
    pub max_results: usize,
    pub user_agent: String,
    /// Cap on each listing or posting request. The provider timeout still
    /// bounds the whole fetch.
    pub request_timeout_secs: u64,
}

impl Default for LinkedInConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://www.linkedin.com/jobs-guest/jobs/api".to_string(),
            max_results: 20,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleJobsConfig {
    pub enabled: bool,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub max_results: usize,
}

impl Default for GoogleJobsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: "https://serpapi.com".to_string(),
            max_results: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndeedConfig {
    pub enabled: bool,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub actor: String,
    pub country: String,
}

impl Default for IndeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: "https://api.apify.com".to_string(),
            actor: "misceres~indeed-scraper".to_string(),
            country: "PK".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub provider_secs: u64,
    pub scoring_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            provider_secs: 30,
            scoring_secs: 30,
        }
    }
}

impl TimeoutConfig {
    pub fn provider(&self) -> Duration {
        Duration::from_secs(self.provider_secs)
    }

    pub fn scoring(&self) -> Duration {
        Duration::from_secs(self.scoring_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeepAliveConfig {
    pub enabled: bool,
    pub url: Option<String>,
    pub interval_minutes: u64,
    pub join_timeout_ms: u64,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: None,
            interval_minutes: 10,
            join_timeout_ms: 1000,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: AppConfig,
    #[serde(default)]
    production: AppConfig,
}

impl AppConfig {
    /// Load `.env`, the config file for the current environment, then
    /// credentials and overrides from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let path = std::env::var("JOB_FINDER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = if path.exists() {
            Self::load_from_file(&path, &environment)?
        } else {
            info!("{} not found, using defaults", path.display());
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// `JOB_FINDER_ENV`, then `ENVIRONMENT`, else `local`.
    pub fn get_environment() -> String {
        std::env::var("JOB_FINDER_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    pub fn load_from_file(path: &Path, environment: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content, environment).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml(content: &str, environment: &str) -> Result<Self, serde_yaml::Error> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        Ok(match environment {
            "production" => file.production,
            _ => file.local,
        })
    }

    /// Overlay credentials and overrides taken from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_blank("GOOGLE_API_KEY") {
            self.scoring.api_key = Some(key);
        }
        if let Some(key) = non_blank("SERPAPI_API_KEY") {
            self.providers.google_jobs.api_key = Some(key);
        }
        if let Some(key) = non_blank("APIFY_API_KEY") {
            self.providers.indeed.api_key = Some(key);
        }
        if let Some(url) = non_blank("SERVICE_URL") {
            self.keep_alive.url = Some(url);
        }
        if let Some(port) = non_blank("PORT") {
            match port.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid PORT value: {}", port),
            }
        }
    }

    /// Startup checks. A failure here aborts before any request is served.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.search.min_score) {
            return Err(ConfigError::Invalid(format!(
                "search.min_score must be within [0, 1], got {}",
                self.search.min_score
            )));
        }
        if self.search.max_results == 0 {
            return Err(ConfigError::Invalid(
                "search.max_results must be at least 1".to_string(),
            ));
        }
        if self.search.scoring_budget == 0 || self.search.scoring_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "search.scoring_budget and search.scoring_concurrency must be at least 1"
                    .to_string(),
            ));
        }
        if self.timeouts.provider_secs == 0 || self.timeouts.scoring_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeouts must be at least one second".to_string(),
            ));
        }
        if self.providers.linkedin.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "providers.linkedin.request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.keep_alive.enabled && self.keep_alive.interval_minutes == 0 {
            return Err(ConfigError::Invalid(
                "keep_alive.interval_minutes must be at least 1".to_string(),
            ));
        }
        if self.scoring.require_semantic && self.scoring.api_key.is_none() {
            return Err(ConfigError::MissingCredential("GOOGLE_API_KEY"));
        }
        Ok(())
    }
}
