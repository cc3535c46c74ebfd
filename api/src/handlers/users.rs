use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use common::db::repositories::UserRepository;
use common::models::{NewUser, User};
use common::telemetry::record_entity_operation;
use serde::Deserialize;

use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::handlers::{observed, DetailResponse, ErrorResponse};
use crate::state::AppState;

pub const USER_NOT_FOUND: &str = "User not found";
pub const USER_DELETED: &str = "User and their posts deleted successfully";

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateEmailQuery {
    pub email: String,
}

/// Create a user
///
/// A duplicate username or email is a storage error and returns 500.
#[tracing::instrument(skip_all, fields(username = %req.username))]
pub async fn create_user(
    State(state): State<AppState>,
    WithRejection(Json(req), _): ValidJson<CreateUserRequest>,
) -> Result<Json<User>, ErrorResponse> {
    let repo = UserRepository::new(state.db_pool.clone());
    let new_user = NewUser::from(req);

    let user = observed("user", "create", repo.create(&new_user)).await?;

    record_entity_operation("user", "create", "success");
    Ok(Json(user))
}

/// List all users
#[tracing::instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ErrorResponse> {
    let repo = UserRepository::new(state.db_pool.clone());

    let users = observed("user", "list", repo.find_all()).await?;

    record_entity_operation("user", "list", "success");
    Ok(Json(users))
}

/// Update a user's email, given as the `email` query parameter
#[tracing::instrument(skip_all, fields(user_id = user_id))]
pub async fn update_user_email(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): ValidPath<i64>,
    WithRejection(Query(query), _): ValidQuery<UpdateEmailQuery>,
) -> Result<Json<User>, ErrorResponse> {
    let repo = UserRepository::new(state.db_pool.clone());

    let user = observed("user", "update_email", repo.update_email(user_id, &query.email))
        .await?
        .ok_or_else(|| {
            record_entity_operation("user", "update_email", "not_found");
            ErrorResponse::not_found(USER_NOT_FOUND)
        })?;

    record_entity_operation("user", "update_email", "success");
    Ok(Json(user))
}

/// Delete a user and every post they own
#[tracing::instrument(skip_all, fields(user_id = user_id))]
pub async fn delete_user(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): ValidPath<i64>,
) -> Result<Json<DetailResponse>, ErrorResponse> {
    let repo = UserRepository::new(state.db_pool.clone());

    let posts_deleted = observed("user", "delete", repo.delete_with_posts(user_id))
        .await?
        .ok_or_else(|| {
            record_entity_operation("user", "delete", "not_found");
            ErrorResponse::not_found(USER_NOT_FOUND)
        })?;

    tracing::info!(user_id, posts_deleted, "User deleted via API");
    record_entity_operation("user", "delete", "success");
    Ok(Json(DetailResponse::new(USER_DELETED)))
}
