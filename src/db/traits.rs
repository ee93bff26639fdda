//! Document store traits for Files Manager.
//!
//! Components receive these as `Arc<dyn ...>` at construction so they can be
//! exercised against substitute stores. Each call is atomic on its own;
//! there are no multi-record transactions.

use async_trait::async_trait;

use crate::db::{NewUser, User};
use crate::file::{FileNode, ParentRef};
use crate::Result;

/// User record operations.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user and return it with its assigned ID.
    async fn create(&self, new_user: &NewUser) -> Result<User>;

    /// Get a user by ID.
    async fn get_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Get a user by email.
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Count all users.
    async fn count(&self) -> Result<i64>;
}

/// Filter, skip and limit for listing nodes, in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeQuery {
    /// Only nodes owned by this user.
    pub owner_id: String,
    /// `None` matches any parent; `Some` matches that parent exactly.
    pub parent: Option<ParentRef>,
    /// Number of matching nodes to skip.
    pub skip: u64,
    /// Maximum number of nodes to return.
    pub limit: u64,
}

/// File node record operations.
#[async_trait]
pub trait NodeStore: Send + Sync {
    /// Insert a fully-formed node.
    async fn insert(&self, node: &FileNode) -> Result<()>;

    /// Get a node by ID.
    async fn get_by_id(&self, id: &str) -> Result<Option<FileNode>>;

    /// Set `is_public` on a node owned by `owner_id`.
    ///
    /// Returns `false` when no such node exists.
    async fn set_public(&self, id: &str, owner_id: &str, is_public: bool) -> Result<bool>;

    /// List nodes matching the query, in creation order.
    async fn list(&self, query: &NodeQuery) -> Result<Vec<FileNode>>;

    /// Count all nodes.
    async fn count(&self) -> Result<i64>;
}
