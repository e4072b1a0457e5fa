//! Server state

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::aws::functions::FunctionHost;
use crate::aws::objects::ObjectStore;
use crate::bindings::DeployBindings;
use crate::deploy::service::DeploymentService;
use crate::github::client::GitHubClient;
use crate::workers::deployer::DeployRequest;

/// Server state shared across handlers
pub struct ServerState {
    pub github: Arc<GitHubClient>,
    pub deployments: Arc<DeploymentService>,
    pub functions: Arc<dyn FunctionHost>,
    pub objects: Arc<dyn ObjectStore>,
    pub bindings: Arc<dyn DeployBindings>,
    pub deploy_queue: mpsc::Sender<DeployRequest>,
    pub webhook_secret: String,
}
