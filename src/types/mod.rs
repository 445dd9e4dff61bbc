pub mod criteria;
pub mod job;
pub mod response;

pub use criteria::SearchCriteria;
pub use job::{
    Job, ProviderKind, WorkMode, APPLY_URL_PLACEHOLDER, NOT_SPECIFIED, NO_DESCRIPTION,
};
pub use response::{JobSearchResponse, SearchOutcome};
