use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use job_insights::workflows::jobs::{jobs_router, JobInsightsService};
use job_insights::workflows::sources::JobSource;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_job_routes<S>(service: Arc<JobInsightsService<S>>) -> axum::Router
where
    S: JobSource + 'static,
{
    jobs_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Acquire);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "loading" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use job_insights::workflows::jobs::{JobDataAggregator, JobRecord};
    use job_insights::workflows::sources::StaticJobSource;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app(ready: bool) -> (axum::Router, Arc<AtomicBool>) {
        let source = StaticJobSource::new(vec![
            JobRecord::new(1)
                .with_title("Cloud Admin")
                .with_company("IBM")
                .with_location("New York, NY")
                .with_job_type("Remote"),
            JobRecord::new(2)
                .with_title("Cloud Ops")
                .with_company("Oracle")
                .with_location("Austin, TX")
                .with_job_type("Hybrid"),
        ]);
        let service = Arc::new(JobInsightsService::new(source, JobDataAggregator::default()));
        service.refresh().expect("static source loads");

        let readiness = Arc::new(AtomicBool::new(ready));
        let state = AppState {
            readiness: readiness.clone(),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };

        (with_job_routes(service).layer(Extension(state)), readiness)
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let (app, _) = app(false);
        let (status, body) = get(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_follows_the_flag() {
        let (app, readiness) = app(false);
        let (status, body) = get(app.clone(), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "loading");

        readiness.store(true, Ordering::Release);
        let (status, body) = get(app, "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn job_routes_are_mounted_alongside_probes() {
        let (app, _) = app(true);
        let (status, body) = get(app, "/api/v1/jobs/options").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["locations"], json!(["All", "Austin, TX", "New York, NY"]));
        assert_eq!(body["job_types"], json!(["All", "Hybrid", "Remote"]));
    }

    #[tokio::test]
    async fn metrics_render_as_prometheus_text() {
        let (app, _) = app(true);
        let response = app
            .oneshot(
                Request::get("/metrics")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}
