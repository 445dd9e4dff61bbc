// src/scoring/mod.rs
//! Relevance scoring: a language-model backed scorer and a local keyword
//! fallback.

pub mod gemini;
pub mod keyword;
pub mod semantic;

use async_trait::async_trait;

pub use gemini::GeminiClient;
pub use keyword::KeywordScorer;
pub use semantic::{parse_response, ParsedResponse, RelevanceScore, SemanticScorer};

/// Text-generation backend. One blocking call returning unstructured text;
/// callers own all parsing.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn evaluate(&self, job_text: &str, criteria_text: &str) -> anyhow::Result<String>;
}
