use super::common::*;
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;

use crate::workflows::jobs::{JobDataAggregator, JobInsightsService};

#[tokio::test]
async fn options_endpoint_lists_wildcard_first() {
    let response = send(loaded_service(), get("/api/v1/jobs/options")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["locations"], json!(["All", "Austin, TX", "New York, NY"]));
    assert_eq!(body["job_types"], json!(["All", "Hybrid", "On-Site", "Remote"]));
}

#[tokio::test]
async fn aggregate_endpoint_filters_groups_and_hides_exclusions() {
    let payload = json!({
        "selection": {
            "attributes": { "location": "All", "job_type": "Remote" }
        },
        "group_by": "role",
        "excluded_groups": ["Cloud Dev"]
    });
    let response = send(
        loaded_service(),
        post_json("/api/v1/jobs/aggregate", &payload),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["group_by"], "role");
    assert_eq!(body["filtered"].as_array().expect("filtered list").len(), 2);
    assert_eq!(body["groups"], json!({ "Cloud Admin": 1, "Cloud Dev": 1 }));
    assert_eq!(
        body["visible_groups"],
        json!([{ "key": "Cloud Admin", "count": 1 }])
    );
    assert_eq!(body["shares"][0]["share"], json!(0.5));
    assert!(body["generated_at"].is_string());
}

#[tokio::test]
async fn aggregate_endpoint_applies_salary_range() {
    let payload = json!({
        "selection": { "salary": { "min": 50000, "max": 100000 } },
        "group_by": "company"
    });
    let response = send(
        loaded_service(),
        post_json("/api/v1/jobs/aggregate", &payload),
    )
    .await;

    let body = read_json(response).await;
    let ids: Vec<_> = body["filtered"]
        .as_array()
        .expect("filtered list")
        .iter()
        .map(|record| record["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!(1), json!(2)]);
    assert_eq!(body["groups"], json!({ "IBM": 1, "Oracle": 1 }));
}

#[tokio::test]
async fn stats_endpoint_accepts_new_since() {
    let response = send(
        loaded_service(),
        get("/api/v1/jobs/stats?new_since=2025-04-01"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["total_jobs"], 4);
    assert_eq!(body["total_companies"], 3);
    assert_eq!(body["new_jobs"], 2);
    assert_eq!(body["new_since"], "2025-04-01");
}

#[tokio::test]
async fn stats_endpoint_rejects_malformed_dates() {
    let response = send(loaded_service(), get("/api/v1/jobs/stats?new_since=soon")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn summary_endpoint_returns_all_panels() {
    let response = send(loaded_service(), get("/api/v1/jobs/summary")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    let panels: Vec<_> = body["breakdowns"]
        .as_array()
        .expect("breakdowns")
        .iter()
        .map(|panel| panel["attribute"].clone())
        .collect();
    assert_eq!(
        panels,
        vec![
            json!("role"),
            json!("job_type"),
            json!("experience"),
            json!("location")
        ]
    );
}

#[tokio::test]
async fn unloaded_snapshot_returns_service_unavailable() {
    let response = send(unloaded_service(), get("/api/v1/jobs/options")).await;
    assert_load_failure(response, StatusCode::SERVICE_UNAVAILABLE).await;
}

#[tokio::test]
async fn refresh_endpoint_reports_record_count_and_failures() {
    let response = send(
        unloaded_service(),
        post_json("/api/v1/jobs/refresh", &json!({})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({ "records": 4 }));

    let failing = Arc::new(JobInsightsService::new(
        UnavailableSource,
        JobDataAggregator::default(),
    ));
    let response = send(failing, post_json("/api/v1/jobs/refresh", &json!({}))).await;
    assert_load_failure(response, StatusCode::BAD_GATEWAY).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn refresh_endpoint_loads_the_shared_snapshot() {
    let service = unloaded_service();
    let response = send(
        Arc::clone(&service),
        post_json("/api/v1/jobs/refresh", &json!({})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(service.is_loaded());

    let response = send(service, get("/api/v1/jobs/options")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn load_failures_carry_the_cause_as_detail() {
    let failing = Arc::new(JobInsightsService::new(
        UnavailableSource,
        JobDataAggregator::default(),
    ));
    let response = send(failing, post_json("/api/v1/jobs/refresh", &json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = read_json(response).await;
    assert_eq!(body["error"], crate::workflows::jobs::LOAD_FAILURE_MESSAGE);
    let detail = body["detail"].as_str().expect("detail text");
    assert!(detail.contains("connection refused"));
}
