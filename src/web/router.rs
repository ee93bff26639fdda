//! Router configuration for the HTTP API.

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    connect, create_file, create_user, disconnect, get_file, get_file_data, list_files, me,
    publish_file, stats, status, unpublish_file, AppState,
};

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Service routes (no authentication)
    let service_routes = Router::new()
        .route("/status", get(status))
        .route("/stats", get(stats));

    // Users and sessions
    let user_routes = Router::new()
        .route("/users", post(create_user))
        .route("/users/me", get(me))
        .route("/connect", get(connect))
        .route("/disconnect", get(disconnect));

    // Files
    let file_routes = Router::new()
        .route("/files", post(create_file).get(list_files))
        .route("/files/:id", get(get_file))
        .route("/files/:id/publish", put(publish_file))
        .route("/files/:id/unpublish", put(unpublish_file))
        .route("/files/:id/data", get(get_file_data));

    Router::new()
        .merge(service_routes)
        .merge(user_routes)
        .merge(file_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}
