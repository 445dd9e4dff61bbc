// src/types/job.rs
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NOT_SPECIFIED: &str = "Not specified";
pub const NO_DESCRIPTION: &str = "No description available";
pub const APPLY_URL_PLACEHOLDER: &str = "#";

/// Where a posting came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    LinkedIn,
    GoogleJobs,
    Indeed,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::LinkedIn => "linkedin",
            ProviderKind::GoogleJobs => "google_jobs",
            ProviderKind::Indeed => "indeed",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WorkMode {
    #[serde(rename = "remote")]
    Remote,
    #[serde(rename = "onsite")]
    Onsite,
    #[serde(rename = "hybrid")]
    Hybrid,
    #[default]
    #[serde(rename = "Not specified")]
    NotSpecified,
}

impl WorkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkMode::Remote => "remote",
            WorkMode::Onsite => "onsite",
            WorkMode::Hybrid => "hybrid",
            WorkMode::NotSpecified => NOT_SPECIFIED,
        }
    }
}

impl fmt::Display for WorkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical posting. Every text field holds a real value or its sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub experience: String,
    pub salary: String,
    pub work_mode: WorkMode,
    pub apply_url: String,
    pub source: ProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_reasoning: Option<String>,
}

impl Job {
    /// A job with every field at its sentinel value.
    pub fn placeholder(source: ProviderKind) -> Self {
        Self {
            title: NOT_SPECIFIED.to_string(),
            company: NOT_SPECIFIED.to_string(),
            location: NOT_SPECIFIED.to_string(),
            description: NO_DESCRIPTION.to_string(),
            experience: NOT_SPECIFIED.to_string(),
            salary: NOT_SPECIFIED.to_string(),
            work_mode: WorkMode::NotSpecified,
            apply_url: APPLY_URL_PLACEHOLDER.to_string(),
            source,
            relevance_score: None,
            relevance_reasoning: None,
        }
    }

    pub fn annotate(&mut self, score: f64, reasoning: impl Into<String>) {
        self.relevance_score = Some(score);
        self.relevance_reasoning = Some(reasoning.into());
    }

    /// Unscored jobs rank as 0.0.
    pub fn score(&self) -> f64 {
        self.relevance_score.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_mode_serializes_with_sentinel() {
        assert_eq!(
            serde_json::to_string(&WorkMode::NotSpecified).unwrap(),
            "\"Not specified\""
        );
        assert_eq!(serde_json::to_string(&WorkMode::Hybrid).unwrap(), "\"hybrid\"");
    }

    #[test]
    fn test_unscored_job_omits_relevance_fields() {
        let job = Job::placeholder(ProviderKind::Indeed);
        let value = serde_json::to_value(&job).unwrap();
        assert!(value.get("relevance_score").is_none());
        assert_eq!(value["apply_url"], "#");
        assert_eq!(value["source"], "indeed");
    }

    #[test]
    fn test_annotate_sets_score_and_reasoning() {
        let mut job = Job::placeholder(ProviderKind::LinkedIn);
        assert_eq!(job.score(), 0.0);
        job.annotate(0.75, "good match");
        assert_eq!(job.relevance_score, Some(0.75));
        assert_eq!(job.relevance_reasoning.as_deref(), Some("good match"));
    }
}
