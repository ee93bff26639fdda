//! Thumbnail job payload and outcome types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::file::THUMBNAIL_WIDTHS;

fn default_widths() -> Vec<u32> {
    THUMBNAIL_WIDTHS.to_vec()
}

/// Request to generate renditions for one image node.
///
/// Both IDs are optional so that a malformed payload can still be carried
/// through the queue and failed fatally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailJob {
    /// Image node ID.
    #[serde(default)]
    pub file_id: Option<String>,
    /// User that uploaded the image; must still own it.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Target widths, generated in order.
    #[serde(default = "default_widths")]
    pub widths: Vec<u32>,
}

impl ThumbnailJob {
    /// Create a job for the default widths.
    pub fn new(file_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            file_id: Some(file_id.into()),
            user_id: Some(user_id.into()),
            widths: default_widths(),
        }
    }

    /// Check that the job asks for at least one servable width.
    pub fn check_widths(&self) -> Result<(), JobFailure> {
        if self.widths.is_empty() {
            return Err(JobFailure::Fatal("no widths requested".to_string()));
        }
        match self.widths.iter().find(|w| !THUMBNAIL_WIDTHS.contains(w)) {
            Some(width) => Err(JobFailure::Fatal(format!("unsupported width {width}"))),
            None => Ok(()),
        }
    }
}

/// Lifecycle of a job delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Queued,
    Processing,
    Completed,
    FailedFatal,
    FailedRetryable,
}

impl JobState {
    /// Whether the state ends the delivery.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Completed | JobState::FailedFatal | JobState::FailedRetryable
        )
    }
}

/// Why a job did not complete.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobFailure {
    /// Will fail the same way on every retry.
    #[error("fatal: {0}")]
    Fatal(String),

    /// Transient; a later delivery may succeed.
    #[error("retryable: {0}")]
    Retryable(String),
}

impl JobFailure {
    /// Whether the queue should deliver the job again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, JobFailure::Retryable(_))
    }

    /// Terminal state for this failure.
    pub fn state(&self) -> JobState {
        match self {
            JobFailure::Fatal(_) => JobState::FailedFatal,
            JobFailure::Retryable(_) => JobState::FailedRetryable,
        }
    }
}
