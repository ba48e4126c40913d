mod aggregate;
mod aggregator;
pub mod domain;
mod filters;
pub mod report;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use aggregate::{GroupCountEntry, GroupCounts, GroupExclusions, GroupShareEntry, GroupShares};
pub use aggregator::{AggregationResult, CacheStats, JobDataAggregator};
pub use domain::{
    AttributeConstraint, FilterSelection, JobAttribute, JobId, JobRecord, MissingSalaryPolicy,
    SalaryRange,
};
pub use filters::FilterOptions;
pub use report::views::{AttributeBreakdown, DashboardStats, JobMarketSummary};
pub use report::{dashboard_stats, JobMarketReport};
pub use router::jobs_router;
pub use service::{AggregateRequest, JobInsightsService, JobServiceError, LOAD_FAILURE_MESSAGE};
