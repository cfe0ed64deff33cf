use crate::api::errors::ApiError;
use crate::core::{Dispatcher, LifecycleManager, Task, TaskStatus};
use axum::http::StatusCode;
use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Deserialize;

/// Represents the request payload for creating a new task
#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub content: String,
}

/// Creates a new task and queues it for processing
///
/// # Arguments
/// * `dispatcher` - Producer side of the work queue
/// * `payload` - JSON payload containing the task content
///
/// # Returns
/// * `201 Created` with the persisted task, or an error response when
///   dispatch fails
#[axum::debug_handler]
pub async fn create_task(
    Extension(dispatcher): Extension<Dispatcher>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = dispatcher.submit(&payload.content).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Retrieves a task by its ID
///
/// # Arguments
/// * `id` - Task ID to look up
/// * `lifecycle` - Lifecycle manager mediating record access
///
/// # Returns
/// * The task, or `404` when no such task exists
#[axum::debug_handler]
pub async fn get_task(
    Path(id): Path<String>,
    Extension(lifecycle): Extension<LifecycleManager>,
) -> Result<Json<Task>, ApiError> {
    let task = lifecycle.get(&id)?;
    Ok(Json(task))
}

/// Cancels a task that has not finished yet
///
/// Cancellation races worker pickup: it succeeds while the task is still
/// `pending` or `processing` and is rejected once the task is terminal.
///
/// # Arguments
/// * `id` - Task ID to cancel
/// * `lifecycle` - Lifecycle manager mediating the transition
///
/// # Returns
/// * The canceled task, `404` for an unknown id, or `400` when the task can
///   no longer be canceled
#[axum::debug_handler]
pub async fn cancel_task(
    Path(id): Path<String>,
    Extension(lifecycle): Extension<LifecycleManager>,
) -> Result<Json<Task>, ApiError> {
    let task = lifecycle.transition(
        &id,
        &[TaskStatus::Pending, TaskStatus::Processing],
        TaskStatus::Canceled,
    )?;
    Ok(Json(task))
}

/// Liveness probe
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
