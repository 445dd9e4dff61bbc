// src/scoring/semantic.rs
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::TextGenerator;
use crate::error::ScoringError;
use crate::types::{Job, SearchCriteria};

const INSTRUCTIONS: &str = r#"TASK: Evaluate how well this job matches the search criteria.

For each criterion, assign a score from 0.0 to 1.0:
1. Title/Position match (Is the job title similar or relevant to the position sought?)
2. Experience match (Does the required experience align with the search criteria?)
3. Location match (Is the job in the desired location?)
4. Work mode match (Does the remote/onsite/hybrid status match?)
5. Salary match (Is the salary in the desired range? If not specified, score 0.5)
6. Skills match (What share of the requested skills does the job mention?)

Then give an overall score (average of all criteria).

IMPORTANT: Return your response in this EXACT JSON format:
{
  "title_score": <float between 0-1>,
  "experience_score": <float between 0-1>,
  "location_score": <float between 0-1>,
  "nature_score": <float between 0-1>,
  "salary_score": <float between 0-1>,
  "skills_score": <float between 0-1>,
  "overall_score": <float between 0-1>,
  "reasoning": "<brief explanation of the scores>"
}"#;

const NO_REASONING: &str = "No reasoning provided";

#[derive(Debug, Clone, PartialEq)]
pub struct RelevanceScore {
    pub score: f64,
    pub reasoning: String,
}

/// Outcome of reading a model reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    Parsed(Map<String, Value>),
    ParseFailed(String),
}

/// Parse the substring between the first `{` and the last `}` as a JSON object.
pub fn parse_response(text: &str) -> ParsedResponse {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return ParsedResponse::ParseFailed(text.to_string());
    };
    if end <= start {
        return ParsedResponse::ParseFailed(text.to_string());
    }

    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Object(map)) => ParsedResponse::Parsed(map),
        _ => ParsedResponse::ParseFailed(text.to_string()),
    }
}

/// Scores one job at a time through a [`TextGenerator`].
pub struct SemanticScorer {
    backend: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl SemanticScorer {
    pub fn new(backend: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub async fn score(
        &self,
        job: &Job,
        criteria: &SearchCriteria,
    ) -> Result<RelevanceScore, ScoringError> {
        let job_text = job_prompt(job);
        let criteria_text = format!("{}\n\n{}", criteria_prompt(criteria), INSTRUCTIONS);

        let reply = match tokio::time::timeout(
            self.timeout,
            self.backend.evaluate(&job_text, &criteria_text),
        )
        .await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => return Err(ScoringError::Unavailable(format!("{:#}", e))),
            Err(_) => {
                return Err(ScoringError::Unavailable(format!(
                    "no reply within {:?}",
                    self.timeout
                )))
            }
        };

        match parse_response(&reply) {
            ParsedResponse::Parsed(map) => read_score(&map, &reply),
            ParsedResponse::ParseFailed(raw) => Err(ScoringError::Parse {
                reason: "no JSON object found in response".to_string(),
                raw,
            }),
        }
    }
}

fn read_score(map: &Map<String, Value>, raw: &str) -> Result<RelevanceScore, ScoringError> {
    let score = match map.get("overall_score") {
        None | Some(Value::Null) => 0.0,
        Some(value) => coerce_f64(value).ok_or_else(|| ScoringError::Parse {
            reason: format!("overall_score is not a number: {}", value),
            raw: raw.to_string(),
        })?,
    };

    let reasoning = map
        .get("reasoning")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(NO_REASONING)
        .to_string();

    debug!("Semantic score {} ({})", score, reasoning);

    Ok(RelevanceScore {
        score: score.clamp(0.0, 1.0),
        reasoning,
    })
}

fn coerce_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn job_prompt(job: &Job) -> String {
    format!(
        "JOB DETAILS:\n\
         - Title: {}\n\
         - Company: {}\n\
         - Experience: {}\n\
         - Work Mode: {}\n\
         - Location: {}\n\
         - Salary: {}\n\
         - Description: {}",
        job.title,
        job.company,
        job.experience,
        job.work_mode,
        job.location,
        job.salary,
        job.description
    )
}

fn criteria_prompt(criteria: &SearchCriteria) -> String {
    let field = SearchCriteria::display_field;
    format!(
        "SEARCH CRITERIA:\n\
         - Position: {}\n\
         - Experience: {}\n\
         - Salary: {}\n\
         - Work Mode: {}\n\
         - Location: {}\n\
         - Skills: {}",
        field(&criteria.position),
        field(&criteria.experience),
        field(&criteria.salary),
        field(&criteria.work_mode),
        field(&criteria.location),
        field(&criteria.skills)
    )
}
