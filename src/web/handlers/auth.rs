//! Session handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};

use crate::web::dto::TokenResponse;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::TokenUser;

/// GET /connect - Exchange Basic credentials for a session token.
pub async fn connect(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = state.auth.issue_token(header).await?;
    Ok(Json(TokenResponse { token }))
}

/// GET /disconnect - Revoke the session token.
///
/// The token must resolve to a user first; otherwise 401.
pub async fn disconnect(
    State(state): State<Arc<AppState>>,
    TokenUser { user, token }: TokenUser,
) -> Result<StatusCode, ApiError> {
    state.auth.revoke_token(&token).await?;
    tracing::info!(user_id = %user.id, "Session token revoked");
    Ok(StatusCode::NO_CONTENT)
}
