//! Application configuration options

use std::env;
use std::path::PathBuf;

use crate::aws::clients::AwsOptions;
use crate::errors::ServiceError;

const DEFAULT_GITHUB_BASE_URL: &str = "https://api.github.com";

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Server configuration
    pub server: ServerOptions,

    /// AWS connection configuration
    pub aws: AwsOptions,

    /// GitHub API base URL
    pub github_base_url: String,

    /// Shared secret for webhook signature verification
    pub webhook_secret: String,

    /// Optional JSON file seeding the deploy binding tables
    pub bindings_file: Option<PathBuf>,

    /// Capacity of the webhook deployment queue
    pub deploy_queue_capacity: usize,
}

impl AppOptions {
    /// Build options from the environment.
    ///
    /// `SKYLIFT_WEBHOOK_SECRET` is required; everything else falls back to
    /// a default.
    pub fn from_env() -> Result<Self, ServiceError> {
        let webhook_secret = env::var("SKYLIFT_WEBHOOK_SECRET").map_err(|_| {
            ServiceError::ConfigError("SKYLIFT_WEBHOOK_SECRET is not set".to_string())
        })?;

        let server = ServerOptions {
            host: env::var("SKYLIFT_HOST").unwrap_or_else(|_| ServerOptions::default().host),
            port: match env::var("SKYLIFT_PORT") {
                Ok(raw) => raw.parse().map_err(|_| {
                    ServiceError::ConfigError(format!("invalid SKYLIFT_PORT: {}", raw))
                })?,
                Err(_) => ServerOptions::default().port,
            },
            cors_origin: env::var("SKYLIFT_CORS_ORIGIN")
                .unwrap_or_else(|_| ServerOptions::default().cors_origin),
        };

        let aws_defaults = AwsOptions::default();
        let aws = AwsOptions {
            region: env::var("AWS_DEFAULT_REGION").unwrap_or(aws_defaults.region),
            endpoint_url: env::var("AWS_ENDPOINT_URL").ok(),
            lambda_role_arn: env::var("SKYLIFT_LAMBDA_ROLE")
                .unwrap_or(aws_defaults.lambda_role_arn),
        };

        Ok(Self {
            server,
            aws,
            github_base_url: env::var("SKYLIFT_GITHUB_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GITHUB_BASE_URL.to_string()),
            webhook_secret,
            bindings_file: env::var("SKYLIFT_BINDINGS_FILE").ok().map(PathBuf::from),
            deploy_queue_capacity: 64,
        })
    }
}

/// HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed origin for the dashboard frontend
    pub cors_origin: String,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origin: "http://localhost:3000".to_string(),
        }
    }
}
