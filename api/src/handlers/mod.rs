pub mod health;
pub mod metrics;
pub mod posts;
pub mod users;

// Common response types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::errors::{DatabaseError, ValidationError};
use common::telemetry;
use serde::Serialize;
use std::future::Future;
use std::time::Instant;

/// Standard API error response, serialized as `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    pub status: StatusCode,
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    pub fn validation(err: ValidationError) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    }

    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, detail)
    }
}

/// Storage failures are never shown to the caller; the cause goes to the log
impl From<DatabaseError> for ErrorResponse {
    fn from(err: DatabaseError) -> Self {
        match &err {
            DatabaseError::DuplicateKey(_) | DatabaseError::ForeignKeyViolation(_) => {
                tracing::error!(error = %err, "Constraint violation")
            }
            _ => tracing::error!(error = %err, "Database operation failed"),
        }
        Self::internal()
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Confirmation body for deletes, `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub detail: String,
}

impl DetailResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Await a storage call, recording its duration and any failure
pub(crate) async fn observed<T, F>(
    entity: &'static str,
    operation: &'static str,
    call: F,
) -> Result<T, DatabaseError>
where
    F: Future<Output = Result<T, DatabaseError>>,
{
    let started = Instant::now();
    let result = call.await;
    telemetry::record_query_duration(entity, operation, started.elapsed().as_secs_f64());

    if result.is_err() {
        telemetry::record_entity_operation(entity, operation, "error");
    }
    result
}
