//! Application state and service-level handlers.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::auth::SessionAuthenticator;
use crate::db::{Database, UserStore};
use crate::file::FileRegistry;
use crate::thumbnail::ThumbnailQueue;
use crate::web::dto::{StatsResponse, StatusResponse};
use crate::web::error::ApiError;

/// Shared state for every handler.
pub struct AppState {
    /// Database handle, for health checks.
    pub db: Database,
    /// User records.
    pub users: Arc<dyn UserStore>,
    /// Token issue/verify/revoke.
    pub auth: Arc<SessionAuthenticator>,
    /// File and folder metadata.
    pub registry: Arc<FileRegistry>,
    /// Producer side of the thumbnail queue.
    pub thumbnails: ThumbnailQueue,
}

/// GET /status - Store health.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        redis: state.auth.is_alive().await,
        db: state.db.is_alive().await,
    })
}

/// GET /stats - Number of users and file nodes.
pub async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>, ApiError> {
    let users = state.users.count().await?;
    let files = state.registry.count().await?;
    Ok(Json(StatsResponse { users, files }))
}
