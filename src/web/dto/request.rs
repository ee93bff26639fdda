//! Request DTOs for the HTTP API.
//!
//! Bodies are parsed leniently: a body that is not a JSON object is treated
//! as an empty one, and a field of the wrong JSON type is treated as absent,
//! so the client gets the first "Missing ..." message instead of a parse
//! error.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::file::{NodeDraft, ParentRef};

/// Parse a JSON object body, falling back to the default value.
pub fn parse_lenient<T: DeserializeOwned + Default>(body: &[u8]) -> T {
    match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
        _ => T::default(),
    }
}

/// A string field; any other JSON type is absent.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// A flag field: `true`, a non-zero number, or the strings "true" and "1".
fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(s.trim(), "true" | "1"),
        _ => false,
    })
}

/// User registration request.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    /// Email.
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    /// Password.
    #[serde(default, deserialize_with = "lenient_string")]
    pub password: Option<String>,
}

/// File or folder creation request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub parent_id: Option<ParentRef>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_public: bool,
    /// Standard base64 payload.
    #[serde(default, deserialize_with = "lenient_string")]
    pub data: Option<String>,
}

impl CreateFileRequest {
    /// Convert into a registry draft. Undecodable `data` counts as absent.
    pub fn into_draft(self) -> NodeDraft {
        NodeDraft {
            name: self.name,
            node_type: self.node_type,
            parent: self.parent_id.unwrap_or_default(),
            is_public: self.is_public,
            content: self.data.and_then(|data| STANDARD.decode(data).ok()),
        }
    }
}

/// Query parameters for `GET /files`.
///
/// Kept as strings so bad values fall back instead of rejecting.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesQuery {
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
}

impl ListFilesQuery {
    /// Parent filter; `None` lists every owned node.
    pub fn parent(&self) -> Option<ParentRef> {
        self.parent_id.as_deref().map(ParentRef::parse)
    }

    /// Page number; anything unparsable is page 0.
    pub fn page(&self) -> u64 {
        self.page
            .as_deref()
            .and_then(|page| page.trim().parse().ok())
            .unwrap_or(0)
    }
}

/// Query parameters for `GET /files/:id/data`.
#[derive(Debug, Default, Deserialize)]
pub struct ContentQuery {
    #[serde(default)]
    pub size: Option<String>,
}
