//! File node repository for Files Manager.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::traits::{NodeQuery, NodeStore};
use crate::file::{FileNode, ParentRef};
use crate::Result;

const NODE_COLUMNS: &str = "id, owner_id, name, node_type, parent_id, is_public, content_ref";

/// SQLite-backed file node repository.
#[derive(Debug, Clone)]
pub struct NodeRepository {
    pool: SqlitePool,
}

impl NodeRepository {
    /// Create a new NodeRepository over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NodeStore for NodeRepository {
    async fn insert(&self, node: &FileNode) -> Result<()> {
        sqlx::query(
            "INSERT INTO files (id, owner_id, name, node_type, parent_id, is_public, content_ref)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&node.id)
        .bind(&node.owner_id)
        .bind(&node.name)
        .bind(node.node_type.as_str())
        .bind(node.parent.folder_id())
        .bind(node.is_public)
        .bind(&node.content_ref)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<FileNode>> {
        let node = sqlx::query_as::<_, FileNode>(&format!(
            "SELECT {NODE_COLUMNS} FROM files WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(node)
    }

    async fn set_public(&self, id: &str, owner_id: &str, is_public: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE files SET is_public = ? WHERE id = ? AND owner_id = ?")
            .bind(is_public)
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, query: &NodeQuery) -> Result<Vec<FileNode>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {NODE_COLUMNS} FROM files WHERE owner_id = "));
        builder.push_bind(query.owner_id.clone());

        match &query.parent {
            None => {}
            Some(ParentRef::Root) => {
                builder.push(" AND parent_id IS NULL");
            }
            Some(ParentRef::Folder(id)) => {
                builder.push(" AND parent_id = ");
                builder.push_bind(id.clone());
            }
        }

        // SQLite reads a negative OFFSET as 0, so out-of-range values saturate.
        builder.push(" ORDER BY seq LIMIT ");
        builder.push_bind(i64::try_from(query.limit).unwrap_or(i64::MAX));
        builder.push(" OFFSET ");
        builder.push_bind(i64::try_from(query.skip).unwrap_or(i64::MAX));

        let nodes = builder
            .build_query_as::<FileNode>()
            .fetch_all(&self.pool)
            .await?;

        Ok(nodes)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
