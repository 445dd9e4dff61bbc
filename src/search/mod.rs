pub mod budget;
pub mod engine;
pub mod service;

pub use budget::{decide_supplementary_call, PlanEntry, SourcePlan, SourceTier};
pub use engine::{rank, ProviderBatch, RankingEngine};
pub use service::JobSearchService;
