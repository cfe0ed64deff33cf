use crate::core::task::Task;
use crate::core::task_status::TaskStatus;
use crate::db::{Database, TaskRepository, TaskRow};
use crate::errors::Error;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

/// Mediates every status change a task can undergo.
///
/// The status state machine is enforced here and nowhere else: `transition`
/// applies each move as an atomic check-and-set against the record store, so
/// a concurrent cancel and a concurrent worker pickup can never both win on
/// the same task. Serializable isolation is not required globally, only
/// per-record atomicity of the read-check-write, which the conditional
/// UPDATE in the repository provides.
#[derive(Clone)]
pub struct LifecycleManager {
    database: Database,
}

impl LifecycleManager {
    /// Creates a new LifecycleManager over the given record store
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Allocates an identifier and persists a new task in `pending` status
    ///
    /// # Arguments
    ///
    /// * `content` - Opaque task payload
    ///
    /// # Errors
    ///
    /// Returns an Error if the record store rejects the insert
    pub fn create(&self, content: &str) -> Result<Task, Error> {
        let row = TaskRow {
            id: Uuid::new_v4().to_string(),
            content: content.to_string(),
            status: TaskStatus::Pending.to_string(),
            created_at: Utc::now().to_rfc3339(),
            updated_at: None,
        };

        let mut conn = self.database.conn()?;
        TaskRepository::new(&mut conn).insert_task(&row)?;
        debug!("Task {} persisted as pending", row.id);
        Task::try_from(row)
    }

    /// Retrieves a task by its id
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` when no such task exists
    pub fn get(&self, task_id: &str) -> Result<Task, Error> {
        let mut conn = self.database.conn()?;
        let row = TaskRepository::new(&mut conn)
            .get_task(task_id)?
            .ok_or_else(|| Error::NotFound(task_id.to_string()))?;
        Task::try_from(row)
    }

    /// Moves a task from one of `expected_from` to `to`, atomically with
    /// respect to the precondition check, and returns the updated record.
    ///
    /// # Arguments
    ///
    /// * `task_id` - The task to transition
    /// * `expected_from` - Statuses the task must currently be in; pass a
    ///   single status for worker transitions, or both cancelable statuses
    ///   for a cancel request
    /// * `to` - The target status
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` when no such task exists, or
    /// `Error::InvalidTransition` when the precondition does not hold,
    /// including when the task is already terminal
    pub fn transition(
        &self,
        task_id: &str,
        expected_from: &[TaskStatus],
        to: TaskStatus,
    ) -> Result<Task, Error> {
        let mut conn = self.database.conn()?;
        let mut repo = TaskRepository::new(&mut conn);

        let updated = repo.update_task_status(task_id, expected_from, to)?;
        if updated == 0 {
            // Zero rows means either no such task or a failed precondition;
            // re-read to tell the two apart.
            let row = repo
                .get_task(task_id)?
                .ok_or_else(|| Error::NotFound(task_id.to_string()))?;
            let status = row.status.parse::<TaskStatus>()?;
            return Err(Error::InvalidTransition {
                id: task_id.to_string(),
                status,
            });
        }

        debug!("Task {} transitioned to {}", task_id, to);
        let row = repo
            .get_task(task_id)?
            .ok_or_else(|| Error::NotFound(task_id.to_string()))?;
        Task::try_from(row)
    }

    /// Removes a task record. Only the dispatcher calls this, to roll back a
    /// creation whose enqueue failed before the task was ever observable as
    /// queued.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` when no such task exists
    pub fn remove(&self, task_id: &str) -> Result<(), Error> {
        let mut conn = self.database.conn()?;
        let deleted = TaskRepository::new(&mut conn).delete_task(task_id)?;
        if deleted == 0 {
            return Err(Error::NotFound(task_id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_database() -> (Database, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.db");
        let database = Database::new(path.to_str().unwrap());
        database.init_schema().unwrap();
        (database, dir)
    }

    #[test]
    fn create_persists_a_pending_task() {
        let (database, _dir) = test_database();
        let lifecycle = LifecycleManager::new(database);

        let task = lifecycle.create("hello").unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.updated_at.is_none());

        let fetched = lifecycle.get(&task.id).unwrap();
        assert_eq!(fetched.content, "hello");
        assert_eq!(fetched.status, TaskStatus::Pending);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let (database, _dir) = test_database();
        let lifecycle = LifecycleManager::new(database);

        let err = lifecycle.get("missing").unwrap_err();
        assert!(matches!(err, Error::NotFound(id) if id == "missing"));
    }

    #[test]
    fn worker_transitions_follow_the_state_machine() {
        let (database, _dir) = test_database();
        let lifecycle = LifecycleManager::new(database);
        let task = lifecycle.create("work").unwrap();

        let task = lifecycle
            .transition(&task.id, &[TaskStatus::Pending], TaskStatus::Processing)
            .unwrap();
        assert_eq!(task.status, TaskStatus::Processing);
        assert!(task.updated_at.is_some());

        let task = lifecycle
            .transition(&task.id, &[TaskStatus::Processing], TaskStatus::Completed)
            .unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[test]
    fn cancel_accepts_pending_and_processing() {
        let (database, _dir) = test_database();
        let lifecycle = LifecycleManager::new(database);

        let pending = lifecycle.create("a").unwrap();
        let canceled = lifecycle
            .transition(
                &pending.id,
                &[TaskStatus::Pending, TaskStatus::Processing],
                TaskStatus::Canceled,
            )
            .unwrap();
        assert_eq!(canceled.status, TaskStatus::Canceled);

        let in_flight = lifecycle.create("b").unwrap();
        lifecycle
            .transition(&in_flight.id, &[TaskStatus::Pending], TaskStatus::Processing)
            .unwrap();
        let canceled = lifecycle
            .transition(
                &in_flight.id,
                &[TaskStatus::Pending, TaskStatus::Processing],
                TaskStatus::Canceled,
            )
            .unwrap();
        assert_eq!(canceled.status, TaskStatus::Canceled);
    }

    #[test]
    fn terminal_tasks_reject_further_transitions() {
        let (database, _dir) = test_database();
        let lifecycle = LifecycleManager::new(database);
        let task = lifecycle.create("done").unwrap();

        lifecycle
            .transition(&task.id, &[TaskStatus::Pending], TaskStatus::Processing)
            .unwrap();
        lifecycle
            .transition(&task.id, &[TaskStatus::Processing], TaskStatus::Completed)
            .unwrap();

        let err = lifecycle
            .transition(
                &task.id,
                &[TaskStatus::Pending, TaskStatus::Processing],
                TaskStatus::Canceled,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                status: TaskStatus::Completed,
                ..
            }
        ));

        // and the status did not move
        assert_eq!(
            lifecycle.get(&task.id).unwrap().status,
            TaskStatus::Completed
        );
    }

    #[test]
    fn transition_on_unknown_id_is_not_found() {
        let (database, _dir) = test_database();
        let lifecycle = LifecycleManager::new(database);

        let err = lifecycle
            .transition("ghost", &[TaskStatus::Pending], TaskStatus::Processing)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_cancel_and_pickup_have_exactly_one_winner() {
        let (database, _dir) = test_database();
        let lifecycle = LifecycleManager::new(database);
        let task = lifecycle.create("contested").unwrap();

        let pickup = {
            let lifecycle = lifecycle.clone();
            let id = task.id.clone();
            tokio::task::spawn_blocking(move || {
                lifecycle.transition(&id, &[TaskStatus::Pending], TaskStatus::Processing)
            })
        };
        let cancel = {
            let lifecycle = lifecycle.clone();
            let id = task.id.clone();
            tokio::task::spawn_blocking(move || {
                lifecycle.transition(
                    &id,
                    &[TaskStatus::Pending, TaskStatus::Processing],
                    TaskStatus::Canceled,
                )
            })
        };

        let pickup = pickup.await.unwrap();
        let cancel = cancel.await.unwrap();

        // Cancel accepts `processing` as a source state, so it can still win
        // after the pickup; the pickup however must lose once the task is
        // canceled. Whatever the interleaving, the loser sees
        // InvalidTransition and the final status is terminal-or-processing
        // consistent with the winner(s).
        match (pickup, cancel) {
            (Ok(_), Err(e)) => {
                assert!(matches!(e, Error::InvalidTransition { .. }));
                assert_eq!(
                    lifecycle.get(&task.id).unwrap().status,
                    TaskStatus::Processing
                );
            }
            (Err(e), Ok(_)) => {
                assert!(matches!(e, Error::InvalidTransition { .. }));
                assert_eq!(
                    lifecycle.get(&task.id).unwrap().status,
                    TaskStatus::Canceled
                );
            }
            // pickup then cancel-of-processing: both succeed, cancel stands
            (Ok(_), Ok(_)) => {
                assert_eq!(
                    lifecycle.get(&task.id).unwrap().status,
                    TaskStatus::Canceled
                );
            }
            (Err(p), Err(c)) => panic!("both transitions lost: {p}, {c}"),
        }
    }

    #[test]
    fn remove_deletes_the_record() {
        let (database, _dir) = test_database();
        let lifecycle = LifecycleManager::new(database);
        let task = lifecycle.create("ephemeral").unwrap();

        lifecycle.remove(&task.id).unwrap();
        assert!(matches!(
            lifecycle.get(&task.id).unwrap_err(),
            Error::NotFound(_)
        ));
    }
}
