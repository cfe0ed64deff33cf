//! API routes configuration module

use crate::api::handlers::{cancel_task, create_task, get_task, health};
use crate::core::{Dispatcher, LifecycleManager};
use axum::{
    routing::{get, patch, post},
    Extension, Router,
};

/// Creates and configures the API router with all routes
///
/// # Arguments
/// * `dispatcher` - Producer side of the work queue, shared across handlers
/// * `lifecycle` - Lifecycle manager, shared across handlers
///
/// # Returns
/// * `Router` - Configured router with all API endpoints and middleware
pub fn app(dispatcher: Dispatcher, lifecycle: LifecycleManager) -> Router {
    Router::new()
        .route("/tasks", post(create_task))
        .route("/tasks/:id", get(get_task))
        .route("/tasks/:id/cancel", patch(cancel_task))
        .route("/health", get(health))
        .layer(Extension(dispatcher))
        .layer(Extension(lifecycle))
}
