//! Request extractors that reject malformed input with a 422 `{"detail": ...}`

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::Json;
use axum_extra::extract::WithRejection;
use common::errors::ValidationError;

use crate::handlers::ErrorResponse;

/// JSON body validated against `T`
pub type ValidJson<T> = WithRejection<Json<T>, ErrorResponse>;

/// Query string validated against `T`
pub type ValidQuery<T> = WithRejection<Query<T>, ErrorResponse>;

/// Path parameters validated against `T`
pub type ValidPath<T> = WithRejection<Path<T>, ErrorResponse>;

impl From<JsonRejection> for ErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        let err = match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                ValidationError::InvalidJson("expected `Content-Type: application/json`".to_string())
            }
            other => ValidationError::InvalidJson(other.body_text()),
        };
        tracing::debug!(error = %err, "Rejected request body");
        ErrorResponse::validation(err)
    }
}

impl From<QueryRejection> for ErrorResponse {
    fn from(rejection: QueryRejection) -> Self {
        let err = ValidationError::InvalidFieldValue {
            field: "query".to_string(),
            reason: rejection.body_text(),
        };
        tracing::debug!(error = %err, "Rejected query string");
        ErrorResponse::validation(err)
    }
}

impl From<PathRejection> for ErrorResponse {
    fn from(rejection: PathRejection) -> Self {
        let err = ValidationError::InvalidFieldValue {
            field: "path".to_string(),
            reason: rejection.body_text(),
        };
        tracing::debug!(error = %err, "Rejected path parameter");
        ErrorResponse::validation(err)
    }
}
