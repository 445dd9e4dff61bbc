//! Job posting aggregator: fetches listings from several sources, normalizes
//! them into one shape and ranks them against a candidate's search criteria.

pub mod cli;
pub mod config;
pub mod error;
pub mod keep_alive;
pub mod normalizer;
pub mod providers;
pub mod scoring;
pub mod search;
pub mod types;
pub mod web;

pub use config::AppConfig;
pub use search::JobSearchService;
pub use types::{Job, JobSearchResponse, SearchCriteria, SearchOutcome, WorkMode};
pub use web::{build_rocket, start_web_server};
