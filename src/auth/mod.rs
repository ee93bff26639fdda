//! Authentication module for Files Manager.
//!
//! This module provides password hashing, user registration, the session
//! store and token-based session authentication.

mod authenticator;
mod password;
mod registration;
mod store;

pub use authenticator::{parse_basic_credentials, SessionAuthenticator, DEFAULT_TOKEN_TTL_SECS};
pub use password::{hash_password, verify_password, PasswordError};
pub use registration::register;
pub use store::{MemorySessionStore, SessionStore};
