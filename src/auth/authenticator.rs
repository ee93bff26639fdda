//! Token session authentication for Files Manager.
//!
//! Tokens are issued against HTTP Basic credentials and stored in a
//! [`SessionStore`] as `auth_<token> -> user id` with a fixed time-to-live.

use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, info, warn};

use super::password::verify_password;
use super::store::SessionStore;
use crate::db::{User, UserStore};
use crate::{FilesError, Result};

/// Default token lifetime (24 hours).
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

const TOKEN_KEY_PREFIX: &str = "auth_";

fn token_key(token: &str) -> String {
    format!("{TOKEN_KEY_PREFIX}{token}")
}

fn unauthorized() -> FilesError {
    FilesError::Auth("invalid credentials".to_string())
}

/// Parse an `Authorization: Basic <base64(email:password)>` header value.
///
/// The payload is split at the first `:`, so passwords may contain colons.
/// Every malformed input is the same `Auth` error.
pub fn parse_basic_credentials(header: &str) -> Result<(String, String)> {
    let encoded = header.strip_prefix("Basic ").ok_or_else(unauthorized)?;
    let decoded = STANDARD.decode(encoded).map_err(|_| unauthorized())?;
    let payload = String::from_utf8(decoded).map_err(|_| unauthorized())?;

    let (email, password) = payload.split_once(':').ok_or_else(unauthorized)?;
    Ok((email.to_string(), password.to_string()))
}

/// Generate a fresh 128-bit token as 32 lowercase hex characters.
fn generate_token() -> String {
    format!("{:032x}", rand::random::<u128>())
}

/// Issues, verifies and revokes session tokens.
pub struct SessionAuthenticator {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    ttl: Duration,
}

impl SessionAuthenticator {
    /// Create an authenticator with the default token lifetime.
    pub fn new(users: Arc<dyn UserStore>, sessions: Arc<dyn SessionStore>) -> Self {
        Self::with_ttl(users, sessions, Duration::from_secs(DEFAULT_TOKEN_TTL_SECS))
    }

    /// Create an authenticator with a custom token lifetime.
    pub fn with_ttl(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        ttl: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            ttl,
        }
    }

    /// Check Basic credentials and issue a new token.
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn issue_token(&self, credential_header: Option<&str>) -> Result<String> {
        let header = credential_header.ok_or_else(unauthorized)?;
        let (email, password) = parse_basic_credentials(header)?;

        let Some(user) = self.users.get_by_email(&email).await? else {
            warn!("Token request for unknown email");
            return Err(unauthorized());
        };

        if verify_password(&password, &user.password).is_err() {
            warn!(user_id = %user.id, "Token request with wrong password");
            return Err(unauthorized());
        }

        let token = generate_token();
        self.sessions
            .set(&token_key(&token), &user.id, self.ttl)
            .await?;

        info!(user_id = %user.id, "Issued session token");
        Ok(token)
    }

    /// Resolve a token to its user.
    ///
    /// A missing, unknown or expired token is `Ok(None)`.
    pub async fn verify_token(&self, token: Option<&str>) -> Result<Option<User>> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        let Some(user_id) = self.sessions.get(&token_key(token)).await? else {
            debug!("Unknown or expired session token");
            return Ok(None);
        };

        self.users.get_by_id(&user_id).await
    }

    /// Revoke a token. Revoking an absent token is a no-op.
    pub async fn revoke_token(&self, token: &str) -> Result<()> {
        self.sessions.del(&token_key(token)).await?;
        debug!("Revoked session token");
        Ok(())
    }

    /// Whether the session store is reachable.
    pub async fn is_alive(&self) -> bool {
        self.sessions.is_alive().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{register, MemorySessionStore};
    use crate::db::UserRepository;
    use crate::Database;

    fn basic(email: &str, password: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{email}:{password}")))
    }

    async fn setup() -> (SessionAuthenticator, User) {
        let db = Database::open_in_memory().await.unwrap();
        let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(db.pool().clone()));
        let user = register(users.as_ref(), Some("a@x.com"), Some("pw1"))
            .await
            .unwrap();
        let auth = SessionAuthenticator::new(users, Arc::new(MemorySessionStore::new()));
        (auth, user)
    }

    #[test]
    fn test_parse_basic_credentials() {
        let (email, password) = parse_basic_credentials(&basic("a@x.com", "pw1")).unwrap();
        assert_eq!(email, "a@x.com");
        assert_eq!(password, "pw1");
    }

    #[test]
    fn test_parse_basic_splits_at_first_colon() {
        let (email, password) = parse_basic_credentials(&basic("a@x.com", "p:w:1")).unwrap();
        assert_eq!(email, "a@x.com");
        assert_eq!(password, "p:w:1");
    }

    #[test]
    fn test_parse_basic_rejects_malformed() {
        let no_colon = format!("Basic {}", STANDARD.encode("nocolon"));
        let invalid_utf8 = format!("Basic {}", STANDARD.encode([0xff, 0xfe, b':', b'x']));

        for header in [
            "",
            "Bearer abc",
            "Basic",
            "Basic !!!!",
            "Basic YWJj",
            "Basic YQ",
            no_colon.as_str(),
            invalid_utf8.as_str(),
        ] {
            assert!(
                matches!(parse_basic_credentials(header), Err(FilesError::Auth(_))),
                "header {header:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_generate_token_format() {
        let token = generate_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(token, generate_token());
    }

    #[tokio::test]
    async fn test_issue_and_verify() {
        let (auth, user) = setup().await;

        let token = auth
            .issue_token(Some(&basic("a@x.com", "pw1")))
            .await
            .unwrap();

        let verified = auth.verify_token(Some(&token)).await.unwrap().unwrap();
        assert_eq!(verified.id, user.id);
    }

    #[tokio::test]
    async fn test_multiple_tokens_per_user() {
        let (auth, user) = setup().await;
        let header = basic("a@x.com", "pw1");

        let first = auth.issue_token(Some(&header)).await.unwrap();
        let second = auth.issue_token(Some(&header)).await.unwrap();
        assert_ne!(first, second);

        auth.revoke_token(&first).await.unwrap();

        assert!(auth.verify_token(Some(&first)).await.unwrap().is_none());
        let still = auth.verify_token(Some(&second)).await.unwrap().unwrap();
        assert_eq!(still.id, user.id);
    }

    #[tokio::test]
    async fn test_issue_rejects_bad_credentials_identically() {
        let (auth, _) = setup().await;

        let unknown = auth.issue_token(Some(&basic("b@x.com", "pw1"))).await;
        let wrong = auth.issue_token(Some(&basic("a@x.com", "nope"))).await;
        let missing = auth.issue_token(None).await;

        for result in [unknown, wrong, missing] {
            match result {
                Err(FilesError::Auth(msg)) => assert_eq!(msg, "invalid credentials"),
                other => panic!("expected auth error, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_verify_missing_or_unknown_token() {
        let (auth, _) = setup().await;

        assert!(auth.verify_token(None).await.unwrap().is_none());
        assert!(auth.verify_token(Some("")).await.unwrap().is_none());
        assert!(auth.verify_token(Some("deadbeef")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let (auth, _) = setup().await;
        let token = auth
            .issue_token(Some(&basic("a@x.com", "pw1")))
            .await
            .unwrap();

        auth.revoke_token(&token).await.unwrap();
        auth.revoke_token(&token).await.unwrap();
        auth.revoke_token("never-issued").await.unwrap();

        assert!(auth.verify_token(Some(&token)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_token_expires() {
        let db = Database::open_in_memory().await.unwrap();
        let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(db.pool().clone()));
        register(users.as_ref(), Some("a@x.com"), Some("pw1"))
            .await
            .unwrap();
        let auth = SessionAuthenticator::with_ttl(
            users,
            Arc::new(MemorySessionStore::new()),
            Duration::from_millis(20),
        );

        let token = auth
            .issue_token(Some(&basic("a@x.com", "pw1")))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(auth.verify_token(Some(&token)).await.unwrap().is_none());
    }
}
