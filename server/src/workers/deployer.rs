//! Background worker draining webhook-triggered deployment requests

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::deploy::service::DeploymentService;
use crate::models::deployment::DeploymentConfig;

/// A queued deployment request
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub access_token: String,
    pub config: DeploymentConfig,
}

/// Run the deploy worker.
///
/// Requests are processed one at a time; outcomes are logged and never
/// reported back to the webhook sender.
pub async fn run(
    service: Arc<DeploymentService>,
    mut queue: mpsc::Receiver<DeployRequest>,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) {
    info!("Deploy worker starting...");

    loop {
        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Deploy worker shutting down...");
                return;
            }
            request = queue.recv() => {
                let Some(request) = request else {
                    info!("Deploy queue closed, worker exiting...");
                    return;
                };

                let repository = request.config.repository_name.clone();
                let branch = request.config.branch.clone();
                info!("Processing queued deployment for {}:{}", repository, branch);

                match service
                    .create_deployment(&request.access_token, &request.config)
                    .await
                {
                    Ok(deployment) => {
                        info!(
                            "Queued deployment {} for {}:{} finished with status {:?}",
                            deployment.id, repository, branch, deployment.status
                        );
                    }
                    Err(e) => {
                        error!(
                            "Queued deployment failed for {}:{}: {}",
                            repository, branch, e
                        );
                    }
                }
            }
        }
    }
}
