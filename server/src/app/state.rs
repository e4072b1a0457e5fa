//! Application state management

use std::sync::Arc;

use tracing::info;

use crate::app::options::AppOptions;
use crate::aws::clients::AwsClients;
use crate::aws::functions::{FunctionHost, LambdaFunctionHost};
use crate::aws::objects::{ObjectStore, S3ObjectStore};
use crate::bindings::{DeployBindings, StaticBindings};
use crate::deploy::service::DeploymentService;
use crate::deploy::store::InMemoryDeploymentStore;
use crate::errors::ServiceError;
use crate::github::client::GitHubClient;

/// Main application state
pub struct AppState {
    /// GitHub API client
    pub github: Arc<GitHubClient>,

    /// Deployment service
    pub deployments: Arc<DeploymentService>,

    /// Function provisioning capability
    pub functions: Arc<dyn FunctionHost>,

    /// Object storage capability
    pub objects: Arc<dyn ObjectStore>,

    /// Deploy binding lookup
    pub bindings: Arc<dyn DeployBindings>,
}

impl AppState {
    /// Initialize application state
    pub async fn init(options: &AppOptions) -> Result<Self, ServiceError> {
        info!("Initializing application state...");

        let github = Arc::new(GitHubClient::new(&options.github_base_url)?);

        let aws_clients = AwsClients::new(&options.aws).await;
        let functions: Arc<dyn FunctionHost> =
            Arc::new(LambdaFunctionHost::new(aws_clients.lambda));
        let objects: Arc<dyn ObjectStore> =
            Arc::new(S3ObjectStore::new(aws_clients.s3, aws_clients.region.clone()));

        let bindings: Arc<dyn DeployBindings> = match &options.bindings_file {
            Some(path) => {
                info!("Loading deploy bindings from {}", path.display());
                Arc::new(StaticBindings::from_file(path)?)
            }
            None => Arc::new(StaticBindings::empty()),
        };

        let deployments = Arc::new(DeploymentService::new(
            Arc::new(InMemoryDeploymentStore::new()),
            github.clone(),
            functions.clone(),
            objects.clone(),
            aws_clients.region,
            options.aws.lambda_role_arn.clone(),
        ));

        Ok(Self {
            github,
            deployments,
            functions,
            objects,
            bindings,
        })
    }
}
