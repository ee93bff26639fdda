//! Password hashing for Files Manager.
//!
//! Uses Argon2id with the crate's default parameters. The stored value is a
//! PHC string, so parameters travel with each hash.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;
use thiserror::Error;

/// Password-related errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    HashError(String),

    /// Stored hash is not a valid PHC string.
    #[error("invalid password hash format")]
    InvalidHash,

    /// Password does not match the hash.
    #[error("password verification failed")]
    VerificationFailed,
}

/// Hash a password using Argon2id.
///
/// # Examples
///
/// ```
/// use files_manager::hash_password;
///
/// let hash = hash_password("pw1").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
///
/// The parameters are taken from the parsed hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_format() {
        let hash = hash_password("pw1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("$v=19$"));
    }

    #[test]
    fn test_hash_password_is_salted() {
        let hash1 = hash_password("same").unwrap();
        let hash2 = hash_password("same").unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("correct:horse").unwrap();

        assert!(verify_password("correct:horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(PasswordError::VerificationFailed)
        ));
    }

    #[test]
    fn test_verify_invalid_hash() {
        assert!(matches!(
            verify_password("pw", "not-a-hash"),
            Err(PasswordError::InvalidHash)
        ));
    }

    #[test]
    fn test_verify_empty_password() {
        let hash = hash_password("").unwrap();
        assert!(verify_password("", &hash).is_ok());
        assert!(verify_password("x", &hash).is_err());
    }
}
