// src/types/criteria.rs
use serde::{Deserialize, Serialize};

use super::job::NOT_SPECIFIED;

/// What the user is looking for. Every field is free text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCriteria {
    pub position: String,
    pub experience: String,
    pub salary: String,
    #[serde(alias = "jobNature")]
    pub work_mode: String,
    pub location: String,
    /// Comma-separated skill list.
    pub skills: String,
}

impl SearchCriteria {
    pub fn new(position: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            position: position.into(),
            location: location.into(),
            ..Default::default()
        }
    }

    pub fn with_skills(mut self, skills: impl Into<String>) -> Self {
        self.skills = skills.into();
        self
    }

    pub fn with_work_mode(mut self, work_mode: impl Into<String>) -> Self {
        self.work_mode = work_mode.into();
        self
    }

    pub fn with_experience(mut self, experience: impl Into<String>) -> Self {
        self.experience = experience.into();
        self
    }

    pub fn with_salary(mut self, salary: impl Into<String>) -> Self {
        self.salary = salary.into();
        self
    }

    /// Skills split on commas, trimmed and lower-cased, blanks dropped.
    pub fn skill_tokens(&self) -> Vec<String> {
        self.skills
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// False for blank values and the "Not specified" sentinel.
    pub fn is_specified(value: &str) -> bool {
        let trimmed = value.trim();
        !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case(NOT_SPECIFIED)
    }

    /// Field value for prompts, with the sentinel standing in for blanks.
    pub fn display_field(value: &str) -> &str {
        if Self::is_specified(value) {
            value.trim()
        } else {
            NOT_SPECIFIED
        }
    }
}
