use super::aggregate::GroupExclusions;
use super::aggregator::{AggregationResult, JobDataAggregator};
use super::domain::{FilterSelection, JobAttribute, JobRecord};
use super::filters::FilterOptions;
use super::report::views::{DashboardStats, JobMarketSummary};
use super::report::{dashboard_stats, JobMarketReport};
use crate::workflows::sources::{JobSource, JobSourceError};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

/// Message surfaced to dashboard users whenever listings cannot be served.
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load job data. Please try refreshing.";

#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("job data has not been loaded")]
    NotLoaded,
    #[error(transparent)]
    Source(#[from] JobSourceError),
}

/// Body of an aggregation call. Inline `records` take precedence over the
/// session snapshot.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AggregateRequest {
    #[serde(default)]
    pub selection: FilterSelection,
    #[serde(default)]
    pub group_by: JobAttribute,
    #[serde(default)]
    pub excluded_groups: GroupExclusions,
    #[serde(default)]
    pub records: Option<Vec<JobRecord>>,
}

/// Holds one listing snapshot per session and answers dashboard queries from it.
pub struct JobInsightsService<S> {
    source: S,
    aggregator: JobDataAggregator,
    snapshot: RwLock<Option<Arc<Vec<JobRecord>>>>,
}

impl<S: JobSource> JobInsightsService<S> {
    pub fn new(source: S, aggregator: JobDataAggregator) -> Self {
        Self {
            source,
            aggregator,
            snapshot: RwLock::new(None),
        }
    }

    pub fn aggregator(&self) -> &JobDataAggregator {
        &self.aggregator
    }

    /// Fetches a fresh snapshot. A failed fetch leaves the previous snapshot in place.
    pub fn refresh(&self) -> Result<usize, JobServiceError> {
        let source = self.source.describe();
        match self.source.fetch_all() {
            Ok(records) => {
                let count = records.len();
                *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) =
                    Some(Arc::new(records));
                info!(%source, records = count, "job snapshot loaded");
                Ok(count)
            }
            Err(err) => {
                warn!(%source, error = %err, "job snapshot refresh failed");
                Err(err.into())
            }
        }
    }

    pub fn snapshot(&self) -> Result<Arc<Vec<JobRecord>>, JobServiceError> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(JobServiceError::NotLoaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_ok()
    }

    pub fn options(&self) -> Result<FilterOptions, JobServiceError> {
        let records = self.snapshot()?;
        Ok(self.aggregator.derive_filter_options(&records))
    }

    pub fn stats(&self, new_since: Option<NaiveDate>) -> Result<DashboardStats, JobServiceError> {
        let records = self.snapshot()?;
        Ok(dashboard_stats(&records, new_since))
    }

    pub fn summary(
        &self,
        new_since: Option<NaiveDate>,
    ) -> Result<JobMarketSummary, JobServiceError> {
        let records = self.snapshot()?;
        let report = JobMarketReport::build(&self.aggregator, &records, new_since);
        Ok(report.summary(&self.aggregator))
    }

    pub fn aggregate(
        &self,
        request: &AggregateRequest,
    ) -> Result<Arc<AggregationResult>, JobServiceError> {
        let snapshot;
        let records: &[JobRecord] = match &request.records {
            Some(records) => records.as_slice(),
            None => {
                snapshot = self.snapshot()?;
                snapshot.as_slice()
            }
        };

        Ok(self.aggregator.aggregate(
            Some(records),
            &request.selection,
            request.group_by,
            &request.excluded_groups,
        ))
    }
}
