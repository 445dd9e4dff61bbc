// src/normalizer/mod.rs
//! Turns provider-specific payloads into canonical [`Job`] records.
//!
//! Every field is resolved in the same order: an explicit structured value
//! from the payload, then pattern matching over the description, then the
//! field's sentinel. Normalization never fails.

pub mod inference;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{
    Job, ProviderKind, WorkMode, APPLY_URL_PLACEHOLDER, NOT_SPECIFIED, NO_DESCRIPTION,
};

pub use inference::{extract_experience, extract_salary, infer_work_mode};

/// A posting in the shape its provider produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(pub Value);

impl RawRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Non-blank text at a `/`-separated path. Numbers and booleans are
    /// stringified.
    pub fn text(&self, path: &str) -> Option<String> {
        let value = self.lookup(path)?;
        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    }

    pub fn flag(&self, path: &str) -> Option<bool> {
        match self.lookup(path)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" => Some(true),
                "false" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Strings of an array field (or a lone string), blanks dropped.
    pub fn text_list(&self, path: &str) -> Vec<String> {
        match self.lookup(path) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
            _ => Vec::new(),
        }
    }

    fn lookup(&self, path: &str) -> Option<&Value> {
        path.split('/').try_fold(&self.0, |value, segment| {
            match segment.parse::<usize>() {
                Ok(index) => value.get(index),
                Err(_) => value.get(segment),
            }
        })
    }
}

pub fn normalize(raw: &RawRecord, provider: ProviderKind) -> Job {
    match provider {
        ProviderKind::LinkedIn => normalize_linkedin(raw),
        ProviderKind::GoogleJobs => normalize_google_jobs(raw),
        ProviderKind::Indeed => normalize_indeed(raw),
    }
}

fn or_sentinel(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

fn description_or_sentinel(value: Option<String>) -> String {
    value.unwrap_or_else(|| NO_DESCRIPTION.to_string())
}

fn url_or_placeholder(value: Option<String>) -> String {
    value.unwrap_or_else(|| APPLY_URL_PLACEHOLDER.to_string())
}

/// Scraped LinkedIn posting: `job_title`, `company`, `location`,
/// `description`, `criteria` (label/value pairs), `page_text`, `apply_link`.
fn normalize_linkedin(raw: &RawRecord) -> Job {
    let description = raw.text("description");
    let page_text = raw
        .text("page_text")
        .or_else(|| description.clone())
        .unwrap_or_default();

    let salary = linkedin_criterion(raw, "salary").or_else(|| extract_salary(&page_text));
    let experience = extract_experience(&page_text);

    Job {
        title: or_sentinel(raw.text("job_title")),
        company: or_sentinel(raw.text("company")),
        location: or_sentinel(raw.text("location")),
        description: description_or_sentinel(description),
        experience: or_sentinel(experience),
        salary: or_sentinel(salary),
        work_mode: infer_work_mode(None, &page_text),
        apply_url: url_or_placeholder(raw.text("apply_link")),
        source: ProviderKind::LinkedIn,
        relevance_score: None,
        relevance_reasoning: None,
    }
}

fn linkedin_criterion(raw: &RawRecord, label: &str) -> Option<String> {
    let Value::Array(entries) = raw.lookup("criteria")? else {
        return None;
    };
    entries.iter().find_map(|entry| {
        let name = entry.get("label")?.as_str()?;
        if name.to_lowercase().contains(label) {
            entry
                .get("value")?
                .as_str()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        } else {
            None
        }
    })
}

/// SerpApi `google_jobs` result.
fn normalize_google_jobs(raw: &RawRecord) -> Job {
    let description = raw.text("description");
    let text = description.clone().unwrap_or_default();

    let experience = raw
        .text("detected_extensions/work_experience")
        .or_else(|| raw.text("highlights/years_of_experience"))
        .or_else(|| extract_experience(&text));

    let salary = raw
        .text("salary")
        .or_else(|| raw.text("detected_extensions/salary"))
        .or_else(|| extract_salary(&text));

    let apply_url = raw
        .text("apply_options/0/link")
        .or_else(|| raw.text("apply_link"))
        .or_else(|| raw.text("via"))
        .or_else(|| raw.text("share_link"));

    Job {
        title: or_sentinel(raw.text("title")),
        company: or_sentinel(raw.text("company_name")),
        location: or_sentinel(raw.text("location")),
        description: description_or_sentinel(description),
        experience: or_sentinel(experience),
        salary: or_sentinel(salary),
        work_mode: infer_work_mode(raw.flag("detected_extensions/work_from_home"), &text),
        apply_url: url_or_placeholder(apply_url),
        source: ProviderKind::GoogleJobs,
        relevance_score: None,
        relevance_reasoning: None,
    }
}

/// Item from the Apify Indeed actor dataset.
fn normalize_indeed(raw: &RawRecord) -> Job {
    let description = raw.text("description");
    let text = description.clone().unwrap_or_default();

    let job_types = raw.text_list("jobType");
    let work_mode = if job_types.is_empty() {
        infer_work_mode(None, &text)
    } else {
        // An explicit job type that names no mode means an office role.
        match infer_work_mode(None, &job_types.join(" ")) {
            WorkMode::NotSpecified => WorkMode::Onsite,
            mode => mode,
        }
    };

    let apply_url = raw.text("externalApplyLink").or_else(|| raw.text("url"));

    Job {
        title: or_sentinel(raw.text("positionName")),
        company: or_sentinel(raw.text("company")),
        location: or_sentinel(raw.text("location")),
        description: description_or_sentinel(description),
        experience: or_sentinel(extract_experience(&text)),
        salary: or_sentinel(raw.text("salary").or_else(|| extract_salary(&text))),
        work_mode,
        apply_url: url_or_placeholder(apply_url),
        source: ProviderKind::Indeed,
        relevance_score: None,
        relevance_reasoning: None,
    }
}
