//! In-process thumbnail job queue with a worker pool.
//!
//! Deliveries are at-least-once: a retryable failure is sent back onto the
//! queue after a backoff until the attempt limit is reached. Fatal failures
//! are dropped immediately.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::job::{JobState, ThumbnailJob};
use super::pipeline::JobHandler;
use crate::config::ThumbnailConfig;
use crate::{FilesError, Result};

/// One delivery of a job.
#[derive(Debug, Clone)]
struct Delivery {
    job: ThumbnailJob,
    attempt: u32,
}

/// Redelivery limits for retryable failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total deliveries allowed per job, including the first.
    pub max_attempts: u32,
    /// Base delay; the delay before delivery `n + 1` is `backoff * n`.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Build a policy from configuration.
    pub fn from_config(config: &ThumbnailConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }

    /// Whether a job that failed on `attempt` gets another delivery.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Delay before redelivering a job that failed on `attempt`.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }
}

/// Producer handle for the thumbnail queue.
#[derive(Debug, Clone)]
pub struct ThumbnailQueue {
    sender: mpsc::Sender<Delivery>,
}

impl ThumbnailQueue {
    /// Enqueue a job for its first delivery.
    ///
    /// Waits while the queue is full. Fails only when the workers are gone.
    pub async fn enqueue(&self, job: ThumbnailJob) -> Result<()> {
        debug!(
            file_id = ?job.file_id,
            state = ?JobState::Queued,
            "Enqueued thumbnail job"
        );
        self.sender
            .send(Delivery { job, attempt: 1 })
            .await
            .map_err(|_| FilesError::Internal("thumbnail queue is closed".to_string()))
    }

    /// Enqueue a job without waiting. Fails when the queue is full or the
    /// workers are gone.
    pub fn try_enqueue(&self, job: ThumbnailJob) -> Result<()> {
        debug!(
            file_id = ?job.file_id,
            state = ?JobState::Queued,
            "Enqueued thumbnail job"
        );
        self.sender
            .try_send(Delivery { job, attempt: 1 })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => {
                    FilesError::Internal("thumbnail queue is full".to_string())
                }
                mpsc::error::TrySendError::Closed(_) => {
                    FilesError::Internal("thumbnail queue is closed".to_string())
                }
            })
    }
}

/// Running workers.
///
/// Workers stop once every [`ThumbnailQueue`] handle is dropped and the
/// queue has drained.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Number of workers.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the pool has no workers.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every worker to stop.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Thumbnail worker ended abnormally: {}", e);
            }
        }
    }

    /// Stop every worker without draining the queue.
    pub fn abort(&self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

/// Start `config.workers` workers running `handler` and return the queue
/// feeding them.
pub fn start_workers(
    handler: Arc<dyn JobHandler>,
    config: &ThumbnailConfig,
) -> (ThumbnailQueue, WorkerPool) {
    let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
    let receiver = Arc::new(Mutex::new(receiver));
    let policy = RetryPolicy::from_config(config);

    let handles = (0..config.workers.max(1))
        .map(|id| {
            let worker = Worker {
                id,
                handler: Arc::clone(&handler),
                receiver: Arc::clone(&receiver),
                redeliver: sender.downgrade(),
                policy,
            };
            tokio::spawn(worker.run())
        })
        .collect();

    info!(
        workers = config.workers.max(1),
        max_attempts = policy.max_attempts,
        "Thumbnail workers started"
    );

    (ThumbnailQueue { sender }, WorkerPool { handles })
}

struct Worker {
    id: usize,
    handler: Arc<dyn JobHandler>,
    receiver: Arc<Mutex<mpsc::Receiver<Delivery>>>,
    // Weak so that workers alone do not keep the queue open.
    redeliver: mpsc::WeakSender<Delivery>,
    policy: RetryPolicy,
}

impl Worker {
    async fn run(self) {
        loop {
            let delivery = self.receiver.lock().await.recv().await;
            match delivery {
                Some(delivery) => self.handle(delivery).await,
                None => break,
            }
        }
        debug!(worker = self.id, "Thumbnail worker stopped");
    }

    async fn handle(&self, delivery: Delivery) {
        let Delivery { job, attempt } = delivery;
        debug!(
            worker = self.id,
            file_id = ?job.file_id,
            attempt,
            state = ?JobState::Processing,
            "Processing thumbnail job"
        );

        let failure = match self.handler.handle(&job).await {
            Ok(references) => {
                info!(
                    file_id = ?job.file_id,
                    attempt,
                    renditions = references.len(),
                    state = ?JobState::Completed,
                    "Thumbnail job completed"
                );
                return;
            }
            Err(failure) => failure,
        };

        if !failure.is_retryable() {
            warn!(
                file_id = ?job.file_id,
                attempt,
                state = ?failure.state(),
                "Thumbnail job failed: {}",
                failure
            );
            return;
        }

        if !self.policy.should_retry(attempt) {
            error!(
                file_id = ?job.file_id,
                attempt,
                state = ?failure.state(),
                "Thumbnail job gave up: {}",
                failure
            );
            return;
        }

        warn!(
            file_id = ?job.file_id,
            attempt,
            state = ?failure.state(),
            "Thumbnail job will be retried: {}",
            failure
        );

        let delay = self.policy.delay(attempt);
        let redeliver = self.redeliver.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(sender) = redeliver.upgrade() else {
                warn!(file_id = ?job.file_id, "Queue closed, dropping retry");
                return;
            };
            let next = Delivery {
                job,
                attempt: attempt + 1,
            };
            if sender.send(next).await.is_err() {
                warn!("Queue closed, dropping retry");
            }
        });
    }
}
