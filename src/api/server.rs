use crate::api::routes;
use crate::core::{Dispatcher, LifecycleManager};
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Starts and runs the HTTP server using Axum web framework
///
/// # Arguments
/// * `port` - Port number to listen on for incoming HTTP connections
/// * `dispatcher` - Producer side of the work queue, injected into handlers
/// * `lifecycle` - Lifecycle manager, injected into handlers
/// * `shutdown` - Token that stops the server when cancelled
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Ok once the server has shut
///   down, Error if binding or serving fails
pub async fn launch_server(
    port: u16,
    dispatcher: Dispatcher,
    lifecycle: LifecycleManager,
    shutdown: CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = routes::app(dispatcher, lifecycle);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    Ok(())
}
