//! File node types for Files Manager.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::FilesError;

/// Kind of node in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// A container; never carries content.
    Folder,
    /// An opaque file.
    File,
    /// An image file; gets thumbnails after upload.
    Image,
}

impl NodeType {
    /// Convert to the stored string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Folder => "folder",
            NodeType::File => "file",
            NodeType::Image => "image",
        }
    }

    /// Whether nodes of this type carry a content reference.
    pub fn has_content(&self) -> bool {
        !matches!(self, NodeType::Folder)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = FilesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "folder" => Ok(NodeType::Folder),
            "file" => Ok(NodeType::File),
            "image" => Ok(NodeType::Image),
            _ => Err(FilesError::Validation(format!("unknown node type: {s}"))),
        }
    }
}

impl TryFrom<String> for NodeType {
    type Error = FilesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Parent of a node: the root sentinel or a folder ID.
///
/// Serialized as the number `0` for the root and as the folder's string ID
/// otherwise. Deserializes from any JSON value: `null`, `0`, `"0"` and `""`
/// are the root, anything else names a folder (which only resolves if it is
/// a real node ID).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ParentRef {
    /// No parent.
    #[default]
    Root,
    /// A folder node ID.
    Folder(String),
}

impl ParentRef {
    /// Parse a client-supplied parent value.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "0" => ParentRef::Root,
            id => ParentRef::Folder(id.to_string()),
        }
    }

    /// The folder ID, or `None` for the root.
    pub fn folder_id(&self) -> Option<&str> {
        match self {
            ParentRef::Root => None,
            ParentRef::Folder(id) => Some(id),
        }
    }

    /// Whether this is the root sentinel.
    pub fn is_root(&self) -> bool {
        matches!(self, ParentRef::Root)
    }
}

impl From<Option<String>> for ParentRef {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(id) => ParentRef::Folder(id),
            None => ParentRef::Root,
        }
    }
}

impl Serialize for ParentRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParentRef::Root => serializer.serialize_u8(0),
            ParentRef::Folder(id) => serializer.serialize_str(id),
        }
    }
}

impl<'de> Deserialize<'de> for ParentRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => ParentRef::Root,
            Value::String(s) => ParentRef::parse(&s),
            Value::Number(n) if n.as_u64() == Some(0) => ParentRef::Root,
            other => ParentRef::Folder(other.to_string()),
        })
    }
}

/// Metadata record for a file or folder.
///
/// A folder never has a `content_ref`; every other node always has one.
/// Only `is_public` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct FileNode {
    /// Unique node ID (UUID v4).
    pub id: String,
    /// Owning user ID.
    pub owner_id: String,
    /// Display name; its extension decides the served Content-Type.
    pub name: String,
    /// Node kind.
    #[sqlx(try_from = "String")]
    pub node_type: NodeType,
    /// Parent folder or root.
    #[sqlx(rename = "parent_id", try_from = "Option<String>")]
    pub parent: ParentRef,
    /// Whether non-owners may see the node and read its content.
    pub is_public: bool,
    /// Reference into the content store.
    pub content_ref: Option<String>,
}

impl FileNode {
    /// Whether `user_id` may see this node.
    pub fn is_visible_to(&self, user_id: Option<&str>) -> bool {
        self.is_public || user_id == Some(self.owner_id.as_str())
    }

    /// Whether `user_id` owns this node.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}
