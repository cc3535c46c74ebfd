// Property-based tests for API endpoints

use api::{create_router, AppState};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use common::config::{DatabaseConfig, Settings};
use common::db::DbPool;
use common::telemetry::detached_metrics_handle;
use proptest::prelude::*;
use serde_json::{json, Value};
use tower::ServiceExt;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

async fn fresh_app() -> Router {
    let mut settings = Settings::default();
    settings.database = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        connect_timeout_seconds: 5,
        foreign_keys: true,
    };
    let pool = DbPool::new(&settings.database).await.unwrap();
    pool.init_schema().await.unwrap();
    create_router(AppState::new(pool, detached_metrics_handle()))
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// User creation echo
// For any unique username/email/password, the created record echoes every
// field exactly and carries a positive, previously unused id.
#[test]
fn property_created_user_echoes_input() {
    let rt = runtime();
    proptest!(ProptestConfig::with_cases(32), |(
        usernames in prop::collection::hash_set("[a-z][a-z0-9_]{0,15}", 1..5),
        password in "[ -~]{0,30}",
    )| {
        rt.block_on(async {
            let app = fresh_app().await;
            let mut seen_ids = Vec::new();

            for username in &usernames {
                let email = format!("{username}@example.com");
                let (status, body) = call(
                    &app,
                    post_json("/users/", json!({
                        "username": username,
                        "email": email,
                        "password": password,
                    })),
                )
                .await;

                prop_assert_eq!(status, StatusCode::OK);
                prop_assert_eq!(&body["username"], &json!(username));
                prop_assert_eq!(&body["email"], &json!(email));
                prop_assert_eq!(&body["password"], &json!(password));

                let id = body["id"].as_i64().unwrap();
                prop_assert!(id > 0);
                prop_assert!(!seen_ids.contains(&id), "id {} assigned twice", id);
                seen_ids.push(id);
            }
            Ok::<(), TestCaseError>(())
        })?;
    });
}

// Post content update isolation
// For any new content, updating a post changes only `content`; `id`,
// `title` and `user_id` stay as created.
#[test]
fn property_content_update_changes_only_content() {
    let rt = runtime();
    proptest!(ProptestConfig::with_cases(32), |(
        title in "[a-zA-Z0-9 ]{1,40}",
        content in "[a-zA-Z0-9]{1,40}",
        new_content in "[a-zA-Z0-9]{1,40}",
    )| {
        rt.block_on(async {
            let app = fresh_app().await;
            let (_, user) = call(
                &app,
                post_json("/users/", json!({"username": "u", "email": "u@x.com", "password": "p"})),
            )
            .await;

            let (_, post) = call(
                &app,
                post_json("/posts/", json!({
                    "title": title,
                    "content": content,
                    "user_id": user["id"],
                })),
            )
            .await;

            let request = Request::builder()
                .method("PUT")
                .uri(format!("/posts/{}?content={}", post["id"], new_content))
                .body(Body::empty())
                .unwrap();
            let (status, updated) = call(&app, request).await;

            prop_assert_eq!(status, StatusCode::OK);
            prop_assert_eq!(&updated["content"], &json!(new_content));
            prop_assert_eq!(&updated["title"], &post["title"]);
            prop_assert_eq!(&updated["user_id"], &post["user_id"]);
            prop_assert_eq!(&updated["id"], &post["id"]);
            Ok::<(), TestCaseError>(())
        })?;
    });
}
