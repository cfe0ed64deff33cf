//! Main entry point for the application.
//!
//! This module initializes logging, loads environment variables and
//! configuration, and starts the two halves of the service: the HTTP API
//! (producer side) and the worker pool (consumer side), wired together
//! through the shared work queue and the task record store.
//!
//! On ctrl-c the server stops accepting requests, the workers are cancelled
//! and joined, and the queue is closed.

use clap::Parser;
use std::sync::Arc;
use taskqd::core::{Dispatcher, LifecycleManager, SimulatedExecutor, WorkerPool};
use taskqd::queue::{MemoryWorkQueue, WorkQueue};
use taskqd::{api, cli, config, db, utils};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Main entry point that initializes and runs the application.
///
/// # Initialization steps:
/// 1. Parse CLI arguments
/// 2. Load environment variables and settings
/// 3. Initialize logging system
/// 4. Open the record store and the work queue
/// 5. Spawn the worker pool and the API server
#[tokio::main]
async fn main() {
    let cli = cli::Cli::try_parse().expect("Failed to parse CLI arguments");

    let dotenv_result = dotenvy::dotenv();
    let mut settings = config::Settings::from_env().expect("Failed to load settings");
    if let Some(level) = &cli.logging_level {
        settings.log_level = level.clone();
    }
    if let Some(port) = cli.api_port {
        settings.api_port = port;
    }
    if let Some(workers) = cli.workers {
        settings.worker_count = workers;
    }
    if let Some(path) = &cli.database_path {
        settings.database_path = path.clone();
    }

    utils::init_logging(&settings.log_level, cli.log_to_file);
    if let Err(e) = dotenv_result {
        warn!("Failed to load .env file: {}", e);
    }
    info!("Starting taskqd ({} environment)", settings.app_env);

    let database = db::Database::new(&settings.database_path);
    database
        .init_schema()
        .expect("Failed to initialize database schema");

    let queue: Arc<dyn WorkQueue> = Arc::new(MemoryWorkQueue::new());
    let lifecycle = LifecycleManager::new(database);
    let dispatcher = Dispatcher::new(lifecycle.clone(), Arc::clone(&queue));
    let executor = Arc::new(SimulatedExecutor::new(settings.processing_delay));

    info!("Spawning {} workers", settings.worker_count);
    let pool = WorkerPool::spawn(
        settings.worker_count,
        lifecycle.clone(),
        Arc::clone(&queue),
        executor,
    );

    info!("Starting API server on port {}", settings.api_port);
    let shutdown = CancellationToken::new();
    let server = {
        let shutdown = shutdown.clone();
        let port = settings.api_port;
        tokio::spawn(async move {
            if let Err(e) = api::server::launch_server(port, dispatcher, lifecycle, shutdown).await
            {
                error!("Failed to start server: {}", e);
            }
        })
    };

    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
    info!("Shutdown signal received");

    shutdown.cancel();
    if let Err(e) = server.await {
        error!("Server task join failed: {}", e);
    }
    pool.shutdown().await;
    queue.close().await;
    info!("Shutdown complete");
}
