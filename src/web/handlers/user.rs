//! User handlers.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, Json};

use crate::auth;
use crate::web::dto::{parse_lenient, RegisterRequest, UserResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::TokenUser;

/// POST /users - Register a new user.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let req: RegisterRequest = parse_lenient(&body);

    let user = auth::register(
        state.users.as_ref(),
        req.email.as_deref(),
        req.password.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /users/me - The token's user.
pub async fn me(TokenUser { user, .. }: TokenUser) -> Json<UserResponse> {
    Json(user.into())
}
