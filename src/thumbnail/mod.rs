//! Background thumbnail generation for Files Manager.
//!
//! Image uploads enqueue a [`ThumbnailJob`]. Workers run each job through the
//! [`ThumbnailPipeline`], which writes one rendition per width next to the
//! original content.

mod job;
mod pipeline;
mod queue;
mod resize;

pub use job::{JobFailure, JobState, ThumbnailJob};
pub use pipeline::{JobHandler, ThumbnailPipeline};
pub use queue::{start_workers, RetryPolicy, ThumbnailQueue, WorkerPool};
pub use resize::SourceImage;
