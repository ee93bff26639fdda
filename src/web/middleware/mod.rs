//! Middleware for the HTTP API.

pub mod auth;

pub use auth::{OptionalTokenUser, TokenUser, TOKEN_HEADER};
