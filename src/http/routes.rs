use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
///
/// Step images are served from `images_dir` under `/images`.
pub fn create_router(state: AppState, images_dir: impl AsRef<Path>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Recipe selector
        .route("/recipes", get(handlers::list_recipes))
        .route("/session/recipe", post(handlers::select_recipe))
        // Session display and commands
        .route("/session", get(handlers::get_session))
        .route("/session/command", post(handlers::post_command))
        .route("/session/listen", post(handlers::listen))
        .nest_service("/images", ServeDir::new(images_dir.as_ref()))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
