// Prometheus exposition tests
// Kept in their own binary: they install the process-wide recorder

use api::{create_router, AppState};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use common::config::DatabaseConfig;
use common::db::DbPool;
use common::telemetry::{self, OPERATIONS_TOTAL, QUERY_DURATION_SECONDS};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::sync::OnceLock;
use tower::ServiceExt;

fn installed_handle() -> PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    HANDLE
        .get_or_init(|| telemetry::init_metrics().expect("Failed to install recorder"))
        .clone()
}

async fn metered_app() -> Router {
    let pool = DbPool::new(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        connect_timeout_seconds: 5,
        foreign_keys: false,
    })
    .await
    .unwrap();
    pool.init_schema().await.unwrap();

    create_router(AppState::new(pool, installed_handle()))
}

async fn scrape(app: &Router) -> (StatusCode, String) {
    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_metrics_endpoint_reports_user_creation() {
    let app = metered_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/users/")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"username": "metered", "email": "metered@x.com", "password": "p"}).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = scrape(&app).await;

    assert_eq!(status, StatusCode::OK);
    assert!(
        body.contains(
            "postboard_operations_total{entity=\"user\",operation=\"create\",outcome=\"success\"}"
        ),
        "missing operation counter in:\n{body}"
    );
    assert!(body.contains(QUERY_DURATION_SECONDS));
}

#[tokio::test]
async fn test_metrics_endpoint_reports_not_found_outcome() {
    let app = metered_app().await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/posts/4040")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let (_, body) = scrape(&app).await;

    assert!(body.contains(OPERATIONS_TOTAL));
    assert!(body.contains(
        "postboard_operations_total{entity=\"post\",operation=\"delete\",outcome=\"not_found\"}"
    ));
}
