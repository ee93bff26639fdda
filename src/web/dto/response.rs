//! Response DTOs for the HTTP API.

use serde::Serialize;

use crate::db::User;
use crate::file::{FileNode, NodeType, ParentRef};

/// Service health.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Session store reachable.
    pub redis: bool,
    /// Document store reachable.
    pub db: bool,
}

/// Record counts.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub users: i64,
    pub files: i64,
}

/// Public view of a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

/// Newly issued session token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// File document.
///
/// `contentRef` is only present in the response to an upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub is_public: bool,
    pub parent_id: ParentRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_ref: Option<String>,
}

impl FileResponse {
    /// Document for an upload response, including the content reference.
    pub fn created(node: FileNode) -> Self {
        Self {
            id: node.id,
            user_id: node.owner_id,
            name: node.name,
            node_type: node.node_type,
            is_public: node.is_public,
            parent_id: node.parent,
            content_ref: node.content_ref,
        }
    }
}

impl From<FileNode> for FileResponse {
    fn from(node: FileNode) -> Self {
        Self {
            content_ref: None,
            ..Self::created(node)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(parent: ParentRef) -> FileNode {
        FileNode {
            id: "n1".to_string(),
            owner_id: "u1".to_string(),
            name: "a.png".to_string(),
            node_type: NodeType::Image,
            parent,
            is_public: false,
            content_ref: Some("ref".to_string()),
        }
    }

    #[test]
    fn test_file_response_hides_content_ref() {
        let value = serde_json::to_value(FileResponse::from(node(ParentRef::Root))).unwrap();

        assert_eq!(
            value,
            json!({
                "id": "n1",
                "userId": "u1",
                "name": "a.png",
                "type": "image",
                "isPublic": false,
                "parentId": 0,
            })
        );
    }

    #[test]
    fn test_created_response_has_content_ref() {
        let value = serde_json::to_value(FileResponse::created(node(ParentRef::Folder(
            "f1".to_string(),
        ))))
        .unwrap();

        assert_eq!(value["contentRef"], "ref");
        assert_eq!(value["parentId"], "f1");
    }

    #[test]
    fn test_user_response() {
        let user = User {
            id: "u1".to_string(),
            email: "a@x.com".to_string(),
            password: "hash".to_string(),
        };
        let value = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert_eq!(value, json!({"id": "u1", "email": "a@x.com"}));
    }
}
