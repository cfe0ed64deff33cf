//! FIFO hand-off channel carrying task identifiers from the dispatcher to
//! the worker pool.

use crate::errors::Error;
use async_trait::async_trait;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tracing::debug;

/// Queue of task identifiers between producers and consumers.
///
/// Delivery is at-most-once: once `dequeue` returns an identifier it is gone
/// from the queue, with no acknowledgment step. A consumer that crashes after
/// dequeuing but before recording any progress strands the task; this is a
/// documented limitation of the hand-off protocol, not something the queue
/// papers over with redelivery.
///
/// A single shared instance is injected into the dispatcher and the worker
/// pool, opened at process start and closed at shutdown.
#[async_trait]
pub trait WorkQueue: Send + Sync {
    /// Appends a task identifier to the tail of the queue
    ///
    /// # Errors
    ///
    /// Returns `Error::QueueUnavailable` when the queue is closed or the
    /// transport fails; the caller is expected to compensate.
    async fn enqueue(&self, task_id: &str) -> Result<(), Error>;

    /// Pops the oldest identifier from the head of the queue, blocking the
    /// calling worker until one is available. Returns `None` once the queue
    /// has been closed and drained.
    async fn dequeue(&self) -> Option<String>;

    /// Closes the queue. Identifiers already enqueued stay dequeueable;
    /// further enqueues fail and a drained queue stops blocking consumers.
    async fn close(&self);
}

/// In-process work queue backed by an unbounded mpsc channel.
///
/// The single receiver is shared by every worker behind an async mutex; the
/// lock serializes the hand-off so each identifier reaches at most one
/// consumer, in FIFO order of enqueue.
pub struct MemoryWorkQueue {
    tx: UnboundedSender<String>,
    rx: Mutex<UnboundedReceiver<String>>,
}

impl MemoryWorkQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }
}

impl Default for MemoryWorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkQueue for MemoryWorkQueue {
    async fn enqueue(&self, task_id: &str) -> Result<(), Error> {
        self.tx
            .send(task_id.to_string())
            .map_err(|e| Error::QueueUnavailable(e.to_string()))?;
        debug!("Enqueued task {}", task_id);
        Ok(())
    }

    async fn dequeue(&self) -> Option<String> {
        let mut rx = self.rx.lock().await;
        let task_id = rx.recv().await;
        if let Some(ref id) = task_id {
            debug!("Dequeued task {}", id);
        }
        task_id
    }

    async fn close(&self) {
        self.rx.lock().await.close();
        debug!("Work queue closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn delivers_identifiers_in_fifo_order() {
        let queue = MemoryWorkQueue::new();
        for id in ["a", "b", "c"] {
            queue.enqueue(id).await.unwrap();
        }

        assert_eq!(queue.dequeue().await.as_deref(), Some("a"));
        assert_eq!(queue.dequeue().await.as_deref(), Some("b"));
        assert_eq!(queue.dequeue().await.as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn dequeued_identifier_is_gone() {
        let queue = MemoryWorkQueue::new();
        queue.enqueue("only").await.unwrap();

        assert_eq!(queue.dequeue().await.as_deref(), Some("only"));
        // the queue is now empty again, so a second dequeue blocks
        let second = timeout(Duration::from_millis(50), queue.dequeue()).await;
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn dequeue_blocks_until_an_item_arrives() {
        let queue = std::sync::Arc::new(MemoryWorkQueue::new());

        let consumer = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.dequeue().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        queue.enqueue("late").await.unwrap();

        let received = timeout(Duration::from_millis(500), consumer)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(received.as_deref(), Some("late"));
    }

    #[tokio::test]
    async fn enqueue_after_close_fails() {
        let queue = MemoryWorkQueue::new();
        queue.close().await;

        let err = queue.enqueue("t1").await.unwrap_err();
        assert!(matches!(err, crate::errors::Error::QueueUnavailable(_)));
    }

    #[tokio::test]
    async fn close_drains_buffered_items_then_returns_empty() {
        let queue = MemoryWorkQueue::new();
        queue.enqueue("t1").await.unwrap();
        queue.close().await;

        assert_eq!(queue.dequeue().await.as_deref(), Some("t1"));
        assert_eq!(queue.dequeue().await, None);
    }
}
