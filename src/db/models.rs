use crate::core::Task;
use crate::errors::Error;
use crate::schema::tasks;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};

/// Represents a task in the database
#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, AsChangeset, Insertable,
)]
#[diesel(table_name = tasks)]
pub struct TaskRow {
    /// Unique identifier for the task
    pub id: String,
    /// Opaque task payload
    pub content: String,
    /// Current status of the task
    pub status: String,
    /// Timestamp when the task was created
    pub created_at: String,
    /// Timestamp when the status was last changed
    pub updated_at: Option<String>,
}

impl TryFrom<TaskRow> for Task {
    type Error = Error;

    fn try_from(row: TaskRow) -> Result<Self, Error> {
        let status = row.status.parse()?;
        Ok(Task {
            id: row.id,
            content: row.content,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
