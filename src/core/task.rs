use super::task_status::TaskStatus;
use serde::Serialize;

/// Represents a task submitted by a client, with its payload and status
///
/// Instances are read-only snapshots of the record store. All status changes
/// go through the lifecycle manager's check-and-set transition; nothing else
/// writes `status`.
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    /// Unique identifier assigned at creation
    pub id: String,
    /// Opaque payload, immutable after creation
    pub content: String,
    /// Current lifecycle status
    pub status: TaskStatus,
    /// RFC 3339 timestamp set once at creation
    pub created_at: String,
    /// RFC 3339 timestamp of the last status mutation, if any
    pub updated_at: Option<String>,
}
