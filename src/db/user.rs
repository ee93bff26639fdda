//! User model for Files Manager.

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4).
    pub id: String,
    /// Email address, unique across users.
    pub email: String,
    /// Argon2 password hash.
    pub password: String,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Email address.
    pub email: String,
    /// Argon2 password hash (already hashed).
    pub password: String,
}

impl NewUser {
    /// Create a new NewUser from an email and an already-hashed password.
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password_hash.into(),
        }
    }
}
