//! Thumbnail generation for uploaded images.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task;
use tracing::debug;

use super::job::{JobFailure, ThumbnailJob};
use super::resize::{decode_failure, render_failure, SourceImage};
use crate::file::{FileRegistry, NodeType};
use crate::FilesError;

/// Something that can run a thumbnail job to a terminal outcome.
///
/// On success returns the derived references written, in width order.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, job: &ThumbnailJob) -> Result<Vec<String>, JobFailure>;
}

fn retryable(error: FilesError) -> JobFailure {
    JobFailure::Retryable(error.to_string())
}

fn join_failure(error: task::JoinError) -> JobFailure {
    JobFailure::Retryable(format!("resize task failed: {error}"))
}

/// Generates renditions for image nodes.
///
/// The node is re-checked against the job's user on every run, since the
/// job outlives the request that queued it. Renditions overwrite their
/// derived references, so running a job twice is harmless.
pub struct ThumbnailPipeline {
    registry: Arc<FileRegistry>,
}

impl ThumbnailPipeline {
    /// Create a pipeline that reads and writes through `registry`.
    pub fn new(registry: Arc<FileRegistry>) -> Self {
        Self { registry }
    }

    /// Run one job.
    pub async fn process(&self, job: &ThumbnailJob) -> Result<Vec<String>, JobFailure> {
        let (Some(file_id), Some(user_id)) = (job.file_id.as_deref(), job.user_id.as_deref())
        else {
            return Err(JobFailure::Fatal("missing fileId or userId".to_string()));
        };
        job.check_widths()?;

        let node = self
            .registry
            .find_node(file_id)
            .await
            .map_err(retryable)?
            .ok_or_else(|| JobFailure::Fatal(format!("file {file_id} not found")))?;

        if !node.is_owned_by(user_id) {
            return Err(JobFailure::Fatal(format!(
                "file {file_id} not owned by user {user_id}"
            )));
        }
        if node.node_type != NodeType::Image {
            return Err(JobFailure::Fatal(format!("file {file_id} is not an image")));
        }

        let original = self
            .registry
            .read_original(&node)
            .await
            .map_err(retryable)?
            .ok_or_else(|| JobFailure::Fatal(format!("content of {file_id} is missing")))?;

        let source = task::spawn_blocking(move || SourceImage::decode(&original))
            .await
            .map_err(join_failure)?
            .map_err(decode_failure)?;
        let source = Arc::new(source);

        let mut references = Vec::with_capacity(job.widths.len());
        for &width in &job.widths {
            let image = Arc::clone(&source);
            let bytes = task::spawn_blocking(move || image.render(width))
                .await
                .map_err(join_failure)?
                .map_err(render_failure)?;

            let reference = self
                .registry
                .store_rendition(&node, width, &bytes)
                .await
                .map_err(retryable)?;
            debug!(file_id = %file_id, width, size = bytes.len(), "Stored rendition");
            references.push(reference);
        }

        Ok(references)
    }
}

#[async_trait]
impl JobHandler for ThumbnailPipeline {
    async fn handle(&self, job: &ThumbnailJob) -> Result<Vec<String>, JobFailure> {
        self.process(job).await
    }
}
