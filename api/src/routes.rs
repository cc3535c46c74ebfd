use axum::{
    routing::{get, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the main application router with all routes and middleware
#[tracing::instrument(skip(state))]
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let user_routes = Router::new()
        .route(
            "/users/",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/:user_id",
            put(handlers::users::update_user_email).delete(handlers::users::delete_user),
        );

    let post_routes = Router::new()
        .route(
            "/posts/",
            get(handlers::posts::list_posts).post(handlers::posts::create_post),
        )
        .route(
            "/posts",
            get(handlers::posts::list_posts).post(handlers::posts::create_post),
        )
        .route(
            "/posts/user/:user_id",
            get(handlers::posts::list_posts_by_user),
        )
        .route(
            "/posts/:post_id",
            put(handlers::posts::update_post_content).delete(handlers::posts::delete_post),
        );

    let ops_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::metrics_handler));

    Router::new()
        .merge(user_routes)
        .merge(post_routes)
        .merge(ops_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
