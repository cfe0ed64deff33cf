use crate::core::lifecycle::LifecycleManager;
use crate::core::task::Task;
use crate::errors::Error;
use crate::queue::WorkQueue;
use std::sync::Arc;
use tracing::{info, warn};

/// Producer side of the work queue: persists a task, then publishes its
/// identifier for the worker pool.
#[derive(Clone)]
pub struct Dispatcher {
    lifecycle: LifecycleManager,
    queue: Arc<dyn WorkQueue>,
}

impl Dispatcher {
    /// Creates a new Dispatcher over the lifecycle manager and the shared
    /// work queue instance
    pub fn new(lifecycle: LifecycleManager, queue: Arc<dyn WorkQueue>) -> Self {
        Self { lifecycle, queue }
    }

    /// Persists `content` as a pending task and enqueues its identifier
    ///
    /// When the enqueue fails, the freshly created record is deleted again
    /// (best-effort compensation) so the task is never observable as queued,
    /// and the submission surfaces as `Error::DispatchFailed`. This is not a
    /// distributed transaction: a crash between the persist and the enqueue
    /// leaves an orphaned pending record with no queue entry.
    ///
    /// # Errors
    ///
    /// Returns `Error::DispatchFailed` when the enqueue fails, or a storage
    /// error when the initial persist fails
    pub async fn submit(&self, content: &str) -> Result<Task, Error> {
        let task = self.lifecycle.create(content)?;

        if let Err(e) = self.queue.enqueue(&task.id).await {
            if let Err(del_err) = self.lifecycle.remove(&task.id) {
                warn!(
                    "Failed to roll back task {} after enqueue failure: {}",
                    task.id, del_err
                );
            }
            return Err(Error::DispatchFailed(e.to_string()));
        }

        info!("Task created with ID: {}", task.id);
        Ok(task)
    }
}
