use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::handlers::ErrorResponse;
use crate::state::AppState;

/// Health check endpoint; verifies the database answers `SELECT 1`
#[tracing::instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, ErrorResponse> {
    state.db_pool.health_check().await.map_err(|e| {
        tracing::warn!(error = %e, "Health check failed");
        ErrorResponse::unavailable("Database unavailable")
    })?;

    Ok(Json(json!({ "status": "ok" })))
}
