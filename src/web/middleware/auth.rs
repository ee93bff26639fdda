//! Session token extractors.
//!
//! Tokens arrive in the `X-Token` header and are resolved through the
//! [`SessionAuthenticator`](crate::auth::SessionAuthenticator).

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

use crate::db::User;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Header carrying the session token.
pub const TOKEN_HEADER: &str = "x-token";

fn header_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|token| !token.is_empty())
}

/// Extractor for authenticated users.
///
/// Rejects with 401 when the token is missing or does not resolve.
#[derive(Debug, Clone)]
pub struct TokenUser {
    /// The token's user.
    pub user: User,
    /// The token itself.
    pub token: String,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for TokenUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = header_token(&parts.headers).ok_or_else(ApiError::unauthorized)?;

        let user = state
            .auth
            .verify_token(Some(token))
            .await?
            .ok_or_else(ApiError::unauthorized)?;

        Ok(TokenUser {
            user,
            token: token.to_string(),
        })
    }
}

/// Optional authentication extractor.
///
/// Similar to TokenUser but yields `None` instead of rejecting.
#[derive(Debug, Clone)]
pub struct OptionalTokenUser(pub Option<User>);

impl OptionalTokenUser {
    /// The user ID, if authenticated.
    pub fn user_id(&self) -> Option<&str> {
        self.0.as_ref().map(|user| user.id.as_str())
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for OptionalTokenUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = state
            .auth
            .verify_token(header_token(&parts.headers))
            .await?;
        Ok(OptionalTokenUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_header_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(header_token(&headers), None);

        headers.insert(TOKEN_HEADER, HeaderValue::from_static(""));
        assert_eq!(header_token(&headers), None);

        headers.insert(TOKEN_HEADER, HeaderValue::from_static("abc123"));
        assert_eq!(header_token(&headers), Some("abc123"));
    }
}
