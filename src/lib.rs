//! Files Manager
//!
//! An HTTP service for storing files and folders with per-file visibility,
//! token sessions and background image thumbnails.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod thumbnail;
pub mod web;

pub use auth::{
    hash_password, parse_basic_credentials, register, verify_password, MemorySessionStore,
    PasswordError, SessionAuthenticator, SessionStore,
};
pub use bootstrap::{build_services, Services};
pub use config::Config;
pub use db::{Database, NewUser, NodeRepository, NodeStore, User, UserRepository, UserStore};
pub use error::{FilesError, Result};
pub use file::{
    derived_ref, ContentStore, FileContentStore, FileNode, FileRegistry, NodeDraft, NodeType,
    ParentRef, PAGE_SIZE, THUMBNAIL_WIDTHS,
};
pub use thumbnail::{
    start_workers, JobFailure, JobHandler, JobState, SourceImage, ThumbnailJob,
    ThumbnailPipeline, ThumbnailQueue, WorkerPool,
};
pub use web::{create_router, AppState, WebServer};
