//! Main application run loop

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::app::options::AppOptions;
use crate::app::state::AppState;
use crate::errors::ServiceError;
use crate::server::serve::serve;
use crate::server::state::ServerState;
use crate::workers::deployer;

/// Run the Skylift backend
pub async fn run(
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServiceError> {
    info!("Initializing Skylift backend...");

    // Create shutdown channel
    let (shutdown_tx, _shutdown_rx): (broadcast::Sender<()>, _) = broadcast::channel(1);

    let app_state = AppState::init(&options).await?;

    // Webhook deployment queue and its worker
    let (deploy_tx, deploy_rx) = mpsc::channel(options.deploy_queue_capacity);
    let worker_handle = init_deploy_worker(&app_state, deploy_rx, shutdown_tx.subscribe());

    // HTTP server
    let server_state = Arc::new(ServerState {
        github: app_state.github.clone(),
        deployments: app_state.deployments.clone(),
        functions: app_state.functions.clone(),
        objects: app_state.objects.clone(),
        bindings: app_state.bindings.clone(),
        deploy_queue: deploy_tx,
        webhook_secret: options.webhook_secret.clone(),
    });

    let mut server_shutdown_rx = shutdown_tx.subscribe();
    let server_handle = serve(&options.server, server_state, async move {
        let _ = server_shutdown_rx.recv().await;
    })
    .await?;

    // Wait for the shutdown signal
    shutdown_signal.await;
    info!("Shutdown signal received, shutting down...");

    // Stop workers and the server, then wait for them
    let _ = shutdown_tx.send(());
    shutdown(worker_handle, server_handle).await
}

fn init_deploy_worker(
    app_state: &AppState,
    deploy_rx: mpsc::Receiver<deployer::DeployRequest>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    info!("Initializing deploy worker...");

    let service = app_state.deployments.clone();
    tokio::spawn(async move {
        deployer::run(
            service,
            deploy_rx,
            Box::pin(async move {
                let _ = shutdown_rx.recv().await;
            }),
        )
        .await;
    })
}

async fn shutdown(
    worker_handle: JoinHandle<()>,
    server_handle: JoinHandle<Result<(), ServiceError>>,
) -> Result<(), ServiceError> {
    if let Err(e) = worker_handle.await {
        error!("Deploy worker did not stop cleanly: {}", e);
    }

    server_handle
        .await
        .map_err(|e| ServiceError::ShutdownError(e.to_string()))??;

    info!("Shutdown complete");
    Ok(())
}
