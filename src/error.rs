// src/error.rs
use thiserror::Error;

use crate::types::ProviderKind;

/// A source failed or timed out. Never fatal: the source contributes nothing.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider {provider} unavailable: {reason}")]
    Unavailable {
        provider: ProviderKind,
        reason: String,
    },

    #[error("provider {provider} timed out after {secs}s")]
    TimedOut { provider: ProviderKind, secs: u64 },
}

#[derive(Debug, Error)]
pub enum ScoringError {
    /// The text-generation backend errored, timed out or was unreachable.
    #[error("scoring service unavailable: {0}")]
    Unavailable(String),

    /// The backend answered but no structured score could be read.
    #[error("could not parse scoring response: {reason}")]
    Parse { reason: String, raw: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("missing required credential: {0}")]
    MissingCredential(&'static str),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
