//! File registry for Files Manager.
//!
//! Owns node metadata, the hierarchy rule and visibility checks. Payload
//! bytes are delegated to a [`ContentStore`].

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use super::node::{FileNode, NodeType, ParentRef};
use super::storage::{derived_ref, ContentStore};
use super::{PAGE_SIZE, THUMBNAIL_WIDTHS};
use crate::db::{NodeQuery, NodeStore};
use crate::{FilesError, Result};

/// Unvalidated node creation input, as received from a client.
#[derive(Debug, Clone, Default)]
pub struct NodeDraft {
    /// Display name.
    pub name: Option<String>,
    /// Type tag; anything other than folder/file/image counts as missing.
    pub node_type: Option<String>,
    /// Parent folder or root.
    pub parent: ParentRef,
    /// Initial visibility.
    pub is_public: bool,
    /// Payload; ignored for folders.
    pub content: Option<Vec<u8>>,
}

impl NodeDraft {
    /// Create a draft with a name and type at the root.
    pub fn new(name: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            node_type: Some(node_type.into()),
            ..Default::default()
        }
    }

    /// Set the parent.
    pub fn with_parent(mut self, parent: ParentRef) -> Self {
        self.parent = parent;
        self
    }

    /// Set the payload.
    pub fn with_content(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the initial visibility.
    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }
}

/// File and folder metadata registry.
pub struct FileRegistry {
    nodes: Arc<dyn NodeStore>,
    content: Arc<dyn ContentStore>,
}

impl FileRegistry {
    /// Create a registry over the given stores.
    pub fn new(nodes: Arc<dyn NodeStore>, content: Arc<dyn ContentStore>) -> Self {
        Self { nodes, content }
    }

    /// Validate a draft and persist it as a new node owned by `owner_id`.
    ///
    /// Every validation runs before any content write, so a rejected draft
    /// never leaves bytes behind.
    pub async fn create_node(&self, owner_id: &str, draft: NodeDraft) -> Result<FileNode> {
        let name = draft
            .name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| FilesError::Validation("Missing name".to_string()))?;

        let node_type: NodeType = draft
            .node_type
            .as_deref()
            .and_then(|tag| tag.parse().ok())
            .ok_or_else(|| FilesError::Validation("Missing type".to_string()))?;

        let payload = if node_type.has_content() {
            let bytes = draft
                .content
                .filter(|bytes| !bytes.is_empty())
                .ok_or_else(|| FilesError::Validation("Missing data".to_string()))?;
            Some(bytes)
        } else {
            None
        };

        if let ParentRef::Folder(parent_id) = &draft.parent {
            let parent = self
                .nodes
                .get_by_id(parent_id)
                .await?
                .ok_or_else(|| FilesError::Validation("Parent not found".to_string()))?;
            if parent.node_type != NodeType::Folder {
                return Err(FilesError::Validation(
                    "Parent is not a folder".to_string(),
                ));
            }
        }

        let content_ref = match payload {
            Some(bytes) => Some(self.content.store(&bytes).await?),
            None => None,
        };

        let node = FileNode {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name,
            node_type,
            parent: draft.parent,
            is_public: draft.is_public,
            content_ref,
        };
        self.nodes.insert(&node).await?;

        info!(
            node_id = %node.id,
            owner_id = %node.owner_id,
            node_type = %node.node_type,
            "Created node"
        );
        Ok(node)
    }

    /// Get a node visible to `user_id`.
    ///
    /// A private node requested by anyone but its owner is `NotFound`, the
    /// same as a node that does not exist.
    pub async fn get_node(&self, id: &str, user_id: Option<&str>) -> Result<FileNode> {
        self.nodes
            .get_by_id(id)
            .await?
            .filter(|node| node.is_visible_to(user_id))
            .ok_or_else(|| FilesError::NotFound("file".to_string()))
    }

    /// List one page of the owner's nodes in creation order.
    ///
    /// `parent = None` lists every node the owner has. Pages past the end are
    /// empty.
    pub async fn list_children(
        &self,
        owner_id: &str,
        parent: Option<ParentRef>,
        page: u64,
    ) -> Result<Vec<FileNode>> {
        let query = NodeQuery {
            owner_id: owner_id.to_string(),
            parent,
            skip: page.saturating_mul(PAGE_SIZE),
            limit: PAGE_SIZE,
        };
        self.nodes.list(&query).await
    }

    /// Publish or unpublish a node. Only the owner may do this.
    pub async fn set_visibility(
        &self,
        id: &str,
        user_id: &str,
        is_public: bool,
    ) -> Result<FileNode> {
        if !self.nodes.set_public(id, user_id, is_public).await? {
            return Err(FilesError::NotFound("file".to_string()));
        }

        info!(node_id = %id, user_id = %user_id, is_public, "Changed node visibility");
        self.get_node(id, Some(user_id)).await
    }

    /// Check that `user_id` may read the node's content and return its
    /// content reference.
    pub fn authorize_content<'a>(node: &'a FileNode, user_id: Option<&str>) -> Result<&'a str> {
        if !node.is_visible_to(user_id) {
            return Err(FilesError::NotFound("file".to_string()));
        }
        match node.node_type {
            NodeType::Folder => Err(FilesError::NoContent),
            _ => node.content_ref.as_deref().ok_or(FilesError::NoContent),
        }
    }

    /// Read a node's content, or one of its renditions when `width` is set.
    pub async fn read_content(
        &self,
        id: &str,
        user_id: Option<&str>,
        width: Option<u32>,
    ) -> Result<(FileNode, Vec<u8>)> {
        let node = self
            .nodes
            .get_by_id(id)
            .await?
            .ok_or_else(|| FilesError::NotFound("file".to_string()))?;
        let content_ref = Self::authorize_content(&node, user_id)?;

        let reference = match width {
            None => content_ref.to_string(),
            Some(width) if THUMBNAIL_WIDTHS.contains(&width) => derived_ref(content_ref, width),
            Some(_) => return Err(FilesError::NotFound("rendition".to_string())),
        };

        let bytes = self
            .content
            .read(&reference)
            .await?
            .ok_or_else(|| FilesError::NotFound("content".to_string()))?;

        debug!(node_id = %id, reference = %reference, size = bytes.len(), "Read content");
        Ok((node, bytes))
    }

    /// Find a node by ID without any visibility check.
    pub async fn find_node(&self, id: &str) -> Result<Option<FileNode>> {
        self.nodes.get_by_id(id).await
    }

    /// Read the original payload of a node, if it has one.
    pub async fn read_original(&self, node: &FileNode) -> Result<Option<Vec<u8>>> {
        match &node.content_ref {
            Some(content_ref) => self.content.read(content_ref).await,
            None => Ok(None),
        }
    }

    /// Store a rendition of a node's content and return its reference.
    pub async fn store_rendition(&self, node: &FileNode, width: u32, bytes: &[u8]) -> Result<String> {
        let content_ref = node.content_ref.as_deref().ok_or(FilesError::NoContent)?;
        self.content.store_derived(content_ref, width, bytes).await?;
        Ok(derived_ref(content_ref, width))
    }

    /// Count all nodes.
    pub async fn count(&self) -> Result<i64> {
        self.nodes.count().await
    }
}
