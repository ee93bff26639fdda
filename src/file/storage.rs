//! Content storage for Files Manager.
//!
//! Raw payloads live under opaque references that are unrelated to node IDs.
//! On disk the layout is sharded by the first two characters of the reference:
//! ```text
//! {root}/
//! ├── ab/
//! │   ├── ab12cd34-5678-90ab-cdef-123456789012
//! │   ├── ab12cd34-5678-90ab-cdef-123456789012_500
//! │   └── ab12cd34-5678-90ab-cdef-123456789012_250
//! └── ...
//! ```

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::{FilesError, Result};

/// Reference of the rendition of `content_ref` at `width` pixels.
///
/// Pure and repeatable: the same inputs always name the same rendition.
pub fn derived_ref(content_ref: &str, width: u32) -> String {
    format!("{content_ref}_{width}")
}

/// Byte payload persistence keyed by opaque references.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Write `bytes` under a newly generated reference and return it.
    async fn store(&self, bytes: &[u8]) -> Result<String>;

    /// Read the payload at `content_ref`, or `None` if there is none.
    async fn read(&self, content_ref: &str) -> Result<Option<Vec<u8>>>;

    /// Write a rendition at `derived_ref(content_ref, width)`, replacing any
    /// previous one.
    async fn store_derived(&self, content_ref: &str, width: u32, bytes: &[u8]) -> Result<()>;
}

/// Filesystem-backed content store.
#[derive(Debug, Clone)]
pub struct FileContentStore {
    /// Root directory; created lazily on first write.
    root: PathBuf,
}

impl FileContentStore {
    /// Create a store rooted at `root`. Nothing is touched on disk yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path for a reference, or `None` if the reference could escape
    /// the root.
    pub fn path_for(&self, reference: &str) -> Option<PathBuf> {
        if !Self::is_valid_reference(reference) {
            return None;
        }
        Some(self.root.join(Self::shard(reference)).join(reference))
    }

    fn is_valid_reference(reference: &str) -> bool {
        !reference.is_empty()
            && reference
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    fn shard(reference: &str) -> &str {
        reference.get(..2).unwrap_or(reference)
    }

    async fn write(&self, reference: &str, bytes: &[u8]) -> Result<()> {
        let path = self
            .path_for(reference)
            .ok_or_else(|| FilesError::Storage(format!("invalid reference: {reference}")))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(storage_error)?;
        }

        // Readers never see a partially written payload.
        let staging = path.with_extension(format!("tmp-{}", Uuid::new_v4().simple()));
        if let Err(e) = fs::write(&staging, bytes).await {
            let _ = fs::remove_file(&staging).await;
            return Err(storage_error(e));
        }
        fs::rename(&staging, &path).await.map_err(storage_error)?;

        debug!(reference = %reference, size = bytes.len(), "Stored content");
        Ok(())
    }
}

fn storage_error(e: io::Error) -> FilesError {
    FilesError::Storage(e.to_string())
}

#[async_trait]
impl ContentStore for FileContentStore {
    async fn store(&self, bytes: &[u8]) -> Result<String> {
        let reference = Uuid::new_v4().to_string();
        self.write(&reference, bytes).await?;
        Ok(reference)
    }

    async fn read(&self, content_ref: &str) -> Result<Option<Vec<u8>>> {
        let Some(path) = self.path_for(content_ref) else {
            return Ok(None);
        };

        match fs::read(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(e)),
        }
    }

    async fn store_derived(&self, content_ref: &str, width: u32, bytes: &[u8]) -> Result<()> {
        self.write(&derived_ref(content_ref, width), bytes).await
    }
}
