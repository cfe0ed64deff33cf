use crate::core::TaskStatus;
use diesel::r2d2::PoolError;
use diesel::result::Error as DieselError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("task {0} not found")]
    NotFound(String),
    #[error("task {id} is {status} and cannot transition")]
    InvalidTransition { id: String, status: TaskStatus },
    #[error("storage error: {0}")]
    Storage(#[from] DieselError),
    #[error("storage error: {0}")]
    Pool(#[from] PoolError),
    #[error("work queue unavailable: {0}")]
    QueueUnavailable(String),
    #[error("dispatch failed: {0}")]
    DispatchFailed(String),
    #[error("task execution failed: {0}")]
    Execution(String),
    #[error("unknown task status '{0}'")]
    UnknownStatus(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}
