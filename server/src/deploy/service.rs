//! Deployment tracking and publisher dispatch

use std::sync::Arc;

use tracing::{error, info};

use crate::aws::functions::FunctionHost;
use crate::aws::objects::ObjectStore;
use crate::deploy::store::DeploymentStore;
use crate::deploy::{lambda, s3_static};
use crate::errors::ServiceError;
use crate::github::client::ArchiveFetcher;
use crate::models::deployment::{AwsService, Deployment, DeploymentConfig};

const EC2_NOT_IMPLEMENTED: &str = "EC2 deployment not implemented in this demo. \
Consider using AWS CodeDeploy for production EC2 deployments.";

/// Orchestrates deployment attempts and owns their records
pub struct DeploymentService {
    store: Arc<dyn DeploymentStore>,
    fetcher: Arc<dyn ArchiveFetcher>,
    functions: Arc<dyn FunctionHost>,
    objects: Arc<dyn ObjectStore>,
    region: String,
    lambda_role_arn: String,
}

impl DeploymentService {
    pub fn new(
        store: Arc<dyn DeploymentStore>,
        fetcher: Arc<dyn ArchiveFetcher>,
        functions: Arc<dyn FunctionHost>,
        objects: Arc<dyn ObjectStore>,
        region: String,
        lambda_role_arn: String,
    ) -> Self {
        Self {
            store,
            fetcher,
            functions,
            objects,
            region,
            lambda_role_arn,
        }
    }

    /// Run one deployment attempt to completion.
    ///
    /// Publisher failures are captured on the record, never propagated;
    /// an `Err` here means the record itself could not be tracked.
    pub async fn create_deployment(
        &self,
        access_token: &str,
        config: &DeploymentConfig,
    ) -> Result<Deployment, ServiceError> {
        let mut deployment = Deployment::new(config);
        self.store.insert(deployment.clone()).await?;

        info!(
            "Starting {} deployment {} for {}:{}",
            config.aws_service.as_str(),
            deployment.id,
            config.repository_name,
            config.branch
        );

        let result = match config.aws_service {
            AwsService::Lambda => {
                lambda::publish(
                    self.fetcher.as_ref(),
                    self.functions.as_ref(),
                    &self.region,
                    &self.lambda_role_arn,
                    access_token,
                    config,
                    &mut deployment,
                )
                .await
            }
            AwsService::S3Static => {
                s3_static::publish(
                    self.fetcher.as_ref(),
                    self.objects.as_ref(),
                    &self.region,
                    access_token,
                    config,
                    &mut deployment,
                )
                .await
            }
            AwsService::Ec2 => {
                deployment.mark_failed(EC2_NOT_IMPLEMENTED);
                Ok(())
            }
            // No ECS publisher; the record stays pending
            AwsService::Ecs => Ok(()),
        };

        if let Err(e) = result {
            error!("Deployment {} failed: {}", deployment.id, e);
            deployment.mark_failed(&format!("Deployment failed: {}", e));
        }

        self.store.update(deployment.clone()).await?;
        Ok(deployment)
    }

    /// Fetch one deployment record
    pub async fn get_deployment(&self, id: &str) -> Result<Option<Deployment>, ServiceError> {
        self.store.get(id).await
    }

    /// All deployment records, oldest first
    pub async fn list_deployments(&self) -> Result<Vec<Deployment>, ServiceError> {
        self.store.list().await
    }
}
