//! Static-hosting publisher: GitHub repository to an S3 website bucket

use tracing::info;

use crate::aws::objects::ObjectStore;
use crate::deploy::artifact;
use crate::errors::ServiceError;
use crate::github::client::ArchiveFetcher;
use crate::models::deployment::{Deployment, DeploymentConfig};

const INDEX_DOCUMENT: &str = "index.html";
const ERROR_DOCUMENT: &str = "error.html";

/// Publish a repository branch as a public static site on S3.
pub async fn publish(
    fetcher: &dyn ArchiveFetcher,
    objects: &dyn ObjectStore,
    region: &str,
    access_token: &str,
    config: &DeploymentConfig,
    deployment: &mut Deployment,
) -> Result<(), ServiceError> {
    deployment.mark_building();

    let archive = fetcher
        .download_archive(access_token, &config.repository_name, &config.branch)
        .await?;

    deployment.append_log("Creating S3 bucket for static hosting...\n");

    let bucket_name = config.target_name().to_lowercase();

    match objects.create_bucket(&bucket_name).await {
        Ok(()) => {}
        // An existing bucket is reused
        Err(ServiceError::ConflictError(_)) => {
            info!("Bucket {} already exists, reusing", bucket_name);
        }
        Err(e) => return Err(e),
    }

    objects
        .configure_website(&bucket_name, INDEX_DOCUMENT, ERROR_DOCUMENT)
        .await?;
    objects.apply_public_read_policy(&bucket_name).await?;

    deployment.append_log("Uploading files to S3...\n");

    for artifact in artifact::unpack(&archive)? {
        let content_type = artifact::content_type(&artifact.path);
        objects
            .put_object(&bucket_name, &artifact.path, artifact.content, content_type)
            .await?;
    }

    let deployment_url = format!("http://{}.s3-website-{}.amazonaws.com", bucket_name, region);
    deployment.mark_success(deployment_url.clone());
    deployment.append_log(&format!(
        "Static site deployed successfully to {}\n",
        deployment_url
    ));

    Ok(())
}
