use crate::core::executor::TaskExecutor;
use crate::core::lifecycle::LifecycleManager;
use crate::core::task_status::TaskStatus;
use crate::errors::Error;
use crate::queue::WorkQueue;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Pool of symmetric workers draining the shared work queue.
///
/// Each worker runs as an independent tokio task with a cancellation token
/// tied to process shutdown; the pool owns the join handles and tears the
/// loops down on `shutdown`. Workers share nothing beyond the queue and the
/// record store, so completion order across workers is not the enqueue
/// order.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    shutdown: CancellationToken,
}

impl WorkerPool {
    /// Spawns `count` workers consuming from `queue`
    ///
    /// # Arguments
    ///
    /// * `count` - Number of workers; fixed for the lifetime of the pool
    /// * `lifecycle` - Lifecycle manager mediating all status changes
    /// * `queue` - The shared work queue instance
    /// * `executor` - The unit of work to run per task
    pub fn spawn(
        count: usize,
        lifecycle: LifecycleManager,
        queue: Arc<dyn WorkQueue>,
        executor: Arc<dyn TaskExecutor>,
    ) -> Self {
        let shutdown = CancellationToken::new();
        let handles = (0..count)
            .map(|worker_id| {
                let worker = Worker {
                    worker_id,
                    lifecycle: lifecycle.clone(),
                    queue: Arc::clone(&queue),
                    executor: Arc::clone(&executor),
                    shutdown: shutdown.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        Self { handles, shutdown }
    }

    /// Cancels every worker and waits for their loops to finish
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Worker task join failed: {}", e);
            }
        }
    }
}

/// A single consumer loop over the shared queue
struct Worker {
    worker_id: usize,
    lifecycle: LifecycleManager,
    queue: Arc<dyn WorkQueue>,
    executor: Arc<dyn TaskExecutor>,
    shutdown: CancellationToken,
}

impl Worker {
    async fn run(self) {
        info!("Worker {} started", self.worker_id);
        loop {
            let task_id = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                dequeued = self.queue.dequeue() => match dequeued {
                    Some(task_id) => task_id,
                    // queue closed and drained
                    None => break,
                },
            };

            // No failure escapes an iteration: the task keeps its last
            // durable status and the worker moves on to the next item.
            if let Err(e) = self.process_task(&task_id).await {
                error!("Task {} processing error: {}", task_id, e);
            }
        }
        info!("Worker {} stopped", self.worker_id);
    }

    /// Drives one dequeued identifier through the lifecycle
    async fn process_task(&self, task_id: &str) -> Result<(), Error> {
        let task = match self.lifecycle.get(task_id) {
            Ok(task) => task,
            Err(Error::NotFound(_)) => {
                warn!("Task {} not found", task_id);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if task.status != TaskStatus::Pending {
            warn!("Task {} already processed or canceled", task_id);
            return Ok(());
        }

        match self
            .lifecycle
            .transition(task_id, &[TaskStatus::Pending], TaskStatus::Processing)
        {
            Ok(_) => {}
            // lost the pickup race, usually to a cancel request
            Err(Error::InvalidTransition { .. }) => {
                warn!("Task {} no longer pending, skipping", task_id);
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        self.executor.execute(&task.content).await?;

        match self
            .lifecycle
            .transition(task_id, &[TaskStatus::Processing], TaskStatus::Completed)
        {
            Ok(_) => info!("Task {} completed", task_id),
            // canceled mid-flight: the cancellation stands, the work is discarded
            Err(Error::InvalidTransition { .. }) => {
                warn!("Task {} was canceled during processing", task_id)
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}
