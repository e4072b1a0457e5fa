//! Serverless publisher: GitHub repository to a Lambda function

use tracing::info;

use crate::aws::functions::{FunctionHost, FunctionSpec};
use crate::errors::ServiceError;
use crate::github::client::ArchiveFetcher;
use crate::models::deployment::{Deployment, DeploymentConfig};

const DEFAULT_RUNTIME: &str = "python3.9";
const HANDLER: &str = "index.handler";

/// Publish a repository branch as a Lambda function.
///
/// The zipball is supplied to the function as-is; duplicate-name creation
/// falls back to updating the existing function's code and configuration.
pub async fn publish(
    fetcher: &dyn ArchiveFetcher,
    functions: &dyn FunctionHost,
    region: &str,
    role_arn: &str,
    access_token: &str,
    config: &DeploymentConfig,
    deployment: &mut Deployment,
) -> Result<(), ServiceError> {
    deployment.mark_building();

    let archive = fetcher
        .download_archive(access_token, &config.repository_name, &config.branch)
        .await?;

    deployment.append_log("Creating Lambda function...\n");

    let function_name = config.target_name();
    let runtime = config.runtime.as_deref().unwrap_or(DEFAULT_RUNTIME);

    let spec = FunctionSpec {
        function_name: function_name.clone(),
        runtime: runtime.to_string(),
        role: role_arn.to_string(),
        handler: HANDLER.to_string(),
        description: format!("Deployed from {}", config.repository_name),
        environment_variables: config.environment_variables.clone(),
        code: archive.clone(),
    };

    match functions.create_function(&spec).await {
        Ok(()) => {}
        Err(ServiceError::ConflictError(_)) => {
            // Function exists, update it
            info!("Function {} exists, updating instead", function_name);
            functions
                .update_function_code(&function_name, &archive)
                .await?;
            functions
                .update_function_configuration(
                    &function_name,
                    runtime,
                    &config.environment_variables,
                )
                .await?;
        }
        Err(e) => return Err(e),
    }

    deployment.mark_success(format!(
        "https://console.aws.amazon.com/lambda/home?region={}#/functions/{}",
        region, function_name
    ));
    deployment.append_log(&format!(
        "Lambda function {} deployed successfully!\n",
        function_name
    ));

    Ok(())
}
