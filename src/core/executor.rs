use crate::errors::Error;
use async_trait::async_trait;
use std::time::Duration;

/// The unit of work a worker performs once a task reaches `processing`.
///
/// The worker loop treats the executor as an external collaborator: it never
/// inspects the payload itself and a real implementation can be slotted in
/// without touching the loop.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Performs the work described by the task payload
    ///
    /// # Errors
    ///
    /// Returns an Error when the work fails; the worker logs it and leaves
    /// the task in its last durable status
    async fn execute(&self, content: &str) -> Result<(), Error>;
}

/// Reference executor simulating a fixed-duration workload
pub struct SimulatedExecutor {
    delay: Duration,
}

impl SimulatedExecutor {
    /// Creates an executor that sleeps for `delay` per task
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl TaskExecutor for SimulatedExecutor {
    async fn execute(&self, _content: &str) -> Result<(), Error> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}
