use crate::core::TaskStatus;
use crate::db::models::TaskRow;
use crate::errors::Error;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

/// Repository for managing task records in the SQLite database
pub struct TaskRepository<'a> {
    /// Database connection
    pub conn: &'a mut SqliteConnection,
}

impl<'a> TaskRepository<'a> {
    /// Creates a new TaskRepository instance
    ///
    /// # Arguments
    ///
    /// * `conn` - Mutable reference to SQLite database connection
    ///
    /// # Returns
    ///
    /// A new TaskRepository instance
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        TaskRepository { conn }
    }

    /// Inserts a new task record into the database
    ///
    /// # Arguments
    ///
    /// * `row` - The task row to persist
    ///
    /// # Errors
    ///
    /// Returns an Error if database operations fail
    pub fn insert_task(&mut self, row: &TaskRow) -> Result<(), Error> {
        use crate::schema::tasks;

        diesel::insert_into(tasks::table)
            .values(row)
            .execute(self.conn)?;
        Ok(())
    }

    /// Retrieves a single task by its id
    ///
    /// # Arguments
    ///
    /// * `the_task_id` - The task ID to look up
    ///
    /// # Returns
    ///
    /// The task row if found
    ///
    /// # Errors
    ///
    /// Returns an Error if database operations fail
    pub fn get_task(&mut self, the_task_id: &str) -> Result<Option<TaskRow>, Error> {
        use crate::schema::tasks;

        let found = tasks::table
            .filter(tasks::id.eq(the_task_id))
            .first::<TaskRow>(self.conn)
            .optional()?;
        Ok(found)
    }

    /// Updates the status of a task, but only when its current status is one
    /// of `expected`. The conditional UPDATE is the per-record check-and-set:
    /// SQLite applies the row filter and the write atomically, so two racing
    /// transitions on the same task can never both match.
    ///
    /// # Arguments
    ///
    /// * `the_task_id` - The task ID to update
    /// * `expected` - Statuses the task must currently be in
    /// * `new_status` - The status to set
    ///
    /// # Returns
    ///
    /// The number of rows updated: 1 when the precondition held, 0 otherwise
    ///
    /// # Errors
    ///
    /// Returns an Error if database operations fail
    pub fn update_task_status(
        &mut self,
        the_task_id: &str,
        expected: &[TaskStatus],
        new_status: TaskStatus,
    ) -> Result<usize, Error> {
        use crate::schema::tasks::dsl::{id, status, tasks, updated_at};
        let now = Utc::now().to_rfc3339();
        let expected_str = expected.iter().map(|s| s.to_string()).collect::<Vec<String>>();

        let updated = diesel::update(
            tasks
                .filter(id.eq(the_task_id))
                .filter(status.eq_any(expected_str)),
        )
        .set((status.eq(new_status.to_string()), updated_at.eq(&now)))
        .execute(self.conn)?;
        Ok(updated)
    }

    /// Deletes a task record by its id
    ///
    /// # Arguments
    ///
    /// * `the_task_id` - The task ID to delete
    ///
    /// # Returns
    ///
    /// The number of rows deleted
    ///
    /// # Errors
    ///
    /// Returns an Error if database operations fail
    pub fn delete_task(&mut self, the_task_id: &str) -> Result<usize, Error> {
        use crate::schema::tasks::dsl::{id, tasks};

        let deleted = diesel::delete(tasks.filter(id.eq(the_task_id))).execute(self.conn)?;
        Ok(deleted)
    }
}
