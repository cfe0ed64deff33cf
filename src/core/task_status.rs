use crate::errors::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents the current status of a task in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Persisted and queued, waiting for a worker to pick it up
    Pending,
    /// A worker is currently executing the task
    Processing,
    /// The worker finished the task; terminal
    Completed,
    /// A cancel request won the race against the workers; terminal
    Canceled,
}

impl TaskStatus {
    /// Returns the canonical storage representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Processing => "processing",
            TaskStatus::Completed => "completed",
            TaskStatus::Canceled => "canceled",
        }
    }

    /// Whether the status is terminal; terminal tasks never change status again
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Canceled)
    }

    /// Whether a cancel request may still act on a task in this status
    pub fn is_cancelable(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::Processing)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    /// Attempts to create a TaskStatus from its storage representation
    ///
    /// # Arguments
    /// * `s` - String slice containing the status name
    ///
    /// # Returns
    /// * `Ok(TaskStatus)` if the string matches a valid status
    /// * `Err(Error::UnknownStatus)` otherwise
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "processing" => Ok(TaskStatus::Processing),
            "completed" => Ok(TaskStatus::Completed),
            "canceled" => Ok(TaskStatus::Canceled),
            other => Err(Error::UnknownStatus(other.to_string())),
        }
    }
}
