use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::aggregator::AggregationResult;
use super::filters::FilterOptions;
use super::report::views::{DashboardStats, JobMarketSummary};
use super::service::{AggregateRequest, JobInsightsService, JobServiceError};
use crate::error::AppError;
use crate::workflows::sources::{JobSource, JobSourceError};

/// Router exposing the dashboard's job queries.
pub fn jobs_router<S>(service: Arc<JobInsightsService<S>>) -> Router
where
    S: JobSource + 'static,
{
    Router::new()
        .route("/api/v1/jobs/options", get(options_handler::<S>))
        .route("/api/v1/jobs/stats", get(stats_handler::<S>))
        .route("/api/v1/jobs/summary", get(summary_handler::<S>))
        .route("/api/v1/jobs/aggregate", post(aggregate_handler::<S>))
        .route("/api/v1/jobs/refresh", post(refresh_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NewSinceQuery {
    #[serde(default)]
    pub(crate) new_since: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct AggregationResponse<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    result: &'a AggregationResult,
}

pub(crate) async fn options_handler<S>(
    State(service): State<Arc<JobInsightsService<S>>>,
) -> Result<Json<FilterOptions>, AppError>
where
    S: JobSource + 'static,
{
    Ok(Json(service.options()?))
}

pub(crate) async fn stats_handler<S>(
    State(service): State<Arc<JobInsightsService<S>>>,
    Query(query): Query<NewSinceQuery>,
) -> Result<Json<DashboardStats>, AppError>
where
    S: JobSource + 'static,
{
    Ok(Json(service.stats(query.new_since)?))
}

pub(crate) async fn summary_handler<S>(
    State(service): State<Arc<JobInsightsService<S>>>,
    Query(query): Query<NewSinceQuery>,
) -> Result<Json<JobMarketSummary>, AppError>
where
    S: JobSource + 'static,
{
    Ok(Json(service.summary(query.new_since)?))
}

pub(crate) async fn aggregate_handler<S>(
    State(service): State<Arc<JobInsightsService<S>>>,
    Json(request): Json<AggregateRequest>,
) -> Result<Response, AppError>
where
    S: JobSource + 'static,
{
    let result = service.aggregate(&request)?;
    let body = AggregationResponse {
        generated_at: Utc::now(),
        result: &result,
    };
    Ok(Json(body).into_response())
}

/// Runs the fetch on the blocking pool; file-backed sources do synchronous I/O.
pub(crate) async fn refresh_handler<S>(
    State(service): State<Arc<JobInsightsService<S>>>,
) -> Result<Json<serde_json::Value>, AppError>
where
    S: JobSource + 'static,
{
    let count = tokio::task::spawn_blocking(move || service.refresh())
        .await
        .map_err(|err| {
            JobServiceError::Source(JobSourceError::Unavailable(format!(
                "refresh task failed: {err}"
            )))
        })??;
    Ok(Json(json!({ "records": count })))
}
