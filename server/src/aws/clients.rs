//! AWS SDK client factory

use aws_config::{BehaviorVersion, Region};
use tracing::info;

/// AWS connection options
#[derive(Debug, Clone)]
pub struct AwsOptions {
    /// Region used for all service clients and resource URLs
    pub region: String,

    /// Endpoint override, for local emulators
    pub endpoint_url: Option<String>,

    /// Execution role ARN assigned to created Lambda functions
    pub lambda_role_arn: String,
}

impl Default for AwsOptions {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint_url: None,
            lambda_role_arn: "arn:aws:iam::123456789012:role/lambda-execution-role".to_string(),
        }
    }
}

/// Service clients sharing one SDK configuration
pub struct AwsClients {
    pub s3: aws_sdk_s3::Client,
    pub lambda: aws_sdk_lambda::Client,
    pub region: String,
}

impl AwsClients {
    /// Build clients from the ambient credential chain
    pub async fn new(options: &AwsOptions) -> Self {
        let mut config_builder = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(options.region.clone()));

        if let Some(endpoint_url) = &options.endpoint_url {
            info!("Using AWS endpoint override {}", endpoint_url);
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        let sdk_config = config_builder.load().await;

        Self {
            s3: aws_sdk_s3::Client::new(&sdk_config),
            lambda: aws_sdk_lambda::Client::new(&sdk_config),
            region: options.region.clone(),
        }
    }
}
