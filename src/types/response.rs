use serde::{Deserialize, Serialize};

use super::job::Job;

/// Body of a successful search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobSearchResponse {
    pub relevant_jobs: Vec<Job>,
}

/// Result of one search request.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Ranked(Vec<Job>),
    /// Every provider came back empty.
    NoResults,
}

impl SearchOutcome {
    pub fn into_jobs(self) -> Vec<Job> {
        match self {
            SearchOutcome::Ranked(jobs) => jobs,
            SearchOutcome::NoResults => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SearchOutcome::Ranked(jobs) => jobs.len(),
            SearchOutcome::NoResults => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<SearchOutcome> for JobSearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        Self {
            relevant_jobs: outcome.into_jobs(),
        }
    }
}
