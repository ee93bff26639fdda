//! User registration for Files Manager.

use tracing::{info, warn};

use crate::auth::hash_password;
use crate::db::{NewUser, User, UserStore};
use crate::{FilesError, Result};

/// Register a new user.
///
/// This function:
/// 1. Requires a non-empty email, then a non-empty password
/// 2. Rejects an email that is already registered
/// 3. Hashes the password
/// 4. Creates the user
///
/// Validation failures are `FilesError::Validation` with the client-facing
/// message.
pub async fn register(
    users: &dyn UserStore,
    email: Option<&str>,
    password: Option<&str>,
) -> Result<User> {
    let email = email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| FilesError::Validation("Missing email".to_string()))?;
    let password = password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| FilesError::Validation("Missing password".to_string()))?;

    if users.get_by_email(email).await?.is_some() {
        return Err(already_exists());
    }

    let password_hash =
        hash_password(password).map_err(|e| FilesError::Internal(e.to_string()))?;

    let user = match users.create(&NewUser::new(email, password_hash)).await {
        Ok(user) => user,
        // Lost a race with a concurrent registration of the same email.
        Err(FilesError::Database(e)) => {
            if users.get_by_email(email).await?.is_some() {
                warn!(error = %e, "Concurrent registration for the same email");
                return Err(already_exists());
            }
            return Err(FilesError::Database(e));
        }
        Err(e) => return Err(e),
    };

    info!(user_id = %user.id, "Registered user");
    Ok(user)
}

fn already_exists() -> FilesError {
    FilesError::Validation("Already exist".to_string())
}
