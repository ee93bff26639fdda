//! API handlers.

pub mod app;
pub mod auth;
pub mod file;
pub mod user;

pub use app::*;
pub use auth::*;
pub use file::*;
pub use user::*;
