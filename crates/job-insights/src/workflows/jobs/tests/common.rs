use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::jobs::{
    jobs_router, JobDataAggregator, JobInsightsService, JobRecord, MissingSalaryPolicy,
};
use crate::workflows::sources::{JobSource, JobSourceError, StaticJobSource};

pub(super) fn posted(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, day).expect("valid date")
}

pub(super) fn listings() -> Vec<JobRecord> {
    vec![
        JobRecord::new(1)
            .with_title("Cloud Admin")
            .with_company("IBM")
            .with_location("New York, NY")
            .with_job_type("Remote")
            .with_experience("Entry Level")
            .with_salary(72_000.0)
            .with_posted_on(posted(1)),
        JobRecord::new(2)
            .with_title("Cloud Ops")
            .with_company("Oracle")
            .with_location("Austin, TX")
            .with_job_type("Hybrid")
            .with_experience("Mid Level")
            .with_salary(98_000.0)
            .with_posted_on(posted(12)),
        JobRecord::new(3)
            .with_title("Cloud Admin")
            .with_company("Oracle")
            .with_location("Austin, TX")
            .with_job_type("On-Site")
            .with_salary(120_000.0),
        JobRecord::new(4)
            .with_title("Cloud Dev")
            .with_company("Google")
            .with_location("New York, NY")
            .with_job_type("Remote"),
    ]
}

pub(super) fn loaded_service() -> Arc<JobInsightsService<StaticJobSource>> {
    let service = JobInsightsService::new(
        StaticJobSource::new(listings()),
        JobDataAggregator::new(MissingSalaryPolicy::TreatAsZero),
    );
    service.refresh().expect("static source loads");
    Arc::new(service)
}

pub(super) fn unloaded_service() -> Arc<JobInsightsService<StaticJobSource>> {
    Arc::new(JobInsightsService::new(
        StaticJobSource::new(listings()),
        JobDataAggregator::default(),
    ))
}

/// Source that succeeds on the first fetch and fails afterwards.
#[derive(Default)]
pub(super) struct FlakySource {
    calls: AtomicUsize,
}

impl JobSource for FlakySource {
    fn describe(&self) -> String {
        "flaky".to_string()
    }

    fn fetch_all(&self) -> Result<Vec<JobRecord>, JobSourceError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(listings())
        } else {
            Err(JobSourceError::Unavailable("backend timed out".to_string()))
        }
    }
}

pub(super) struct UnavailableSource;

impl JobSource for UnavailableSource {
    fn describe(&self) -> String {
        "unavailable".to_string()
    }

    fn fetch_all(&self) -> Result<Vec<JobRecord>, JobSourceError> {
        Err(JobSourceError::Unavailable("connection refused".to_string()))
    }
}

pub(super) async fn send<S: JobSource + 'static>(
    service: Arc<JobInsightsService<S>>,
    request: Request<Body>,
) -> Response {
    use tower::ServiceExt;

    jobs_router(service)
        .oneshot(request)
        .await
        .expect("router is infallible")
}

pub(super) fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

pub(super) fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("valid request")
}

pub(super) async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

pub(super) async fn assert_load_failure(response: Response, status: StatusCode) {
    assert_eq!(response.status(), status);
    let body = read_json(response).await;
    assert_eq!(body["error"], crate::workflows::jobs::LOAD_FAILURE_MESSAGE);
}
