use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use common::db::repositories::PostRepository;
use common::models::{NewPost, Post};
use common::telemetry::record_entity_operation;
use serde::Deserialize;

use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::handlers::{observed, DetailResponse, ErrorResponse};
use crate::state::AppState;

pub const POST_NOT_FOUND: &str = "Post not found";
pub const POSTS_NOT_FOUND: &str = "Posts not found";
pub const POST_DELETED: &str = "Post deleted successfully";

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub user_id: i64,
}

impl From<CreatePostRequest> for NewPost {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            user_id: req.user_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateContentQuery {
    pub content: String,
}

/// Create a post
///
/// `user_id` is passed straight to the store without checking that the
/// user exists.
#[tracing::instrument(skip_all, fields(user_id = req.user_id))]
pub async fn create_post(
    State(state): State<AppState>,
    WithRejection(Json(req), _): ValidJson<CreatePostRequest>,
) -> Result<Json<Post>, ErrorResponse> {
    let repo = PostRepository::new(state.db_pool.clone());
    let new_post = NewPost::from(req);

    let post = observed("post", "create", repo.create(&new_post)).await?;

    record_entity_operation("post", "create", "success");
    Ok(Json(post))
}

/// List all posts
#[tracing::instrument(skip(state))]
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ErrorResponse> {
    let repo = PostRepository::new(state.db_pool.clone());

    let posts = observed("post", "list", repo.find_all()).await?;

    record_entity_operation("post", "list", "success");
    Ok(Json(posts))
}

/// List the posts of one user
///
/// An empty result is reported as 404 rather than an empty array.
#[tracing::instrument(skip_all, fields(user_id = user_id))]
pub async fn list_posts_by_user(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): ValidPath<i64>,
) -> Result<Json<Vec<Post>>, ErrorResponse> {
    let repo = PostRepository::new(state.db_pool.clone());

    let posts = observed("post", "list_by_user", repo.find_by_user(user_id)).await?;

    if posts.is_empty() {
        record_entity_operation("post", "list_by_user", "not_found");
        return Err(ErrorResponse::not_found(POSTS_NOT_FOUND));
    }

    record_entity_operation("post", "list_by_user", "success");
    Ok(Json(posts))
}

/// Update a post's content, given as the `content` query parameter
#[tracing::instrument(skip_all, fields(post_id = post_id))]
pub async fn update_post_content(
    State(state): State<AppState>,
    WithRejection(Path(post_id), _): ValidPath<i64>,
    WithRejection(Query(query), _): ValidQuery<UpdateContentQuery>,
) -> Result<Json<Post>, ErrorResponse> {
    let repo = PostRepository::new(state.db_pool.clone());

    let post = observed(
        "post",
        "update_content",
        repo.update_content(post_id, &query.content),
    )
    .await?
    .ok_or_else(|| {
        record_entity_operation("post", "update_content", "not_found");
        ErrorResponse::not_found(POST_NOT_FOUND)
    })?;

    record_entity_operation("post", "update_content", "success");
    Ok(Json(post))
}

/// Delete a post
#[tracing::instrument(skip_all, fields(post_id = post_id))]
pub async fn delete_post(
    State(state): State<AppState>,
    WithRejection(Path(post_id), _): ValidPath<i64>,
) -> Result<Json<DetailResponse>, ErrorResponse> {
    let repo = PostRepository::new(state.db_pool.clone());

    if !observed("post", "delete", repo.delete(post_id)).await? {
        record_entity_operation("post", "delete", "not_found");
        return Err(ErrorResponse::not_found(POST_NOT_FOUND));
    }

    record_entity_operation("post", "delete", "success");
    Ok(Json(DetailResponse::new(POST_DELETED)))
}
