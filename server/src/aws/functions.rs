//! Lambda function provisioning and listing

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_lambda::error::SdkError;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{Environment, FunctionCode, Runtime};
use serde::Serialize;
use tracing::debug;

use crate::errors::ServiceError;

/// Parameters for creating a function
#[derive(Debug, Clone)]
pub struct FunctionSpec {
    pub function_name: String,
    pub runtime: String,
    pub role: String,
    pub handler: String,
    pub description: String,
    pub environment_variables: HashMap<String, String>,
    /// Zip archive supplied as the code payload
    pub code: Vec<u8>,
}

/// A deployed function, as listed for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct FunctionSummary {
    pub function_name: String,
    pub runtime: String,
    pub handler: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

/// Capability for provisioning serverless functions
#[async_trait]
pub trait FunctionHost: Send + Sync {
    /// Create a new function; `ConflictError` when the name is taken
    async fn create_function(&self, spec: &FunctionSpec) -> Result<(), ServiceError>;

    /// Replace the code payload of an existing function
    async fn update_function_code(
        &self,
        function_name: &str,
        code: &[u8],
    ) -> Result<(), ServiceError>;

    /// Replace runtime and environment of an existing function
    async fn update_function_configuration(
        &self,
        function_name: &str,
        runtime: &str,
        environment_variables: &HashMap<String, String>,
    ) -> Result<(), ServiceError>;

    /// List deployed functions
    async fn list_functions(&self) -> Result<Vec<FunctionSummary>, ServiceError>;
}

/// Function host backed by AWS Lambda
pub struct LambdaFunctionHost {
    client: aws_sdk_lambda::Client,
}

impl LambdaFunctionHost {
    pub fn new(client: aws_sdk_lambda::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FunctionHost for LambdaFunctionHost {
    async fn create_function(&self, spec: &FunctionSpec) -> Result<(), ServiceError> {
        debug!("Creating Lambda function {}", spec.function_name);

        let environment = Environment::builder()
            .set_variables(Some(spec.environment_variables.clone()))
            .build();
        let code = FunctionCode::builder()
            .zip_file(Blob::new(spec.code.clone()))
            .build();

        self.client
            .create_function()
            .function_name(&spec.function_name)
            .runtime(Runtime::from(spec.runtime.as_str()))
            .role(&spec.role)
            .handler(&spec.handler)
            .description(&spec.description)
            .environment(environment)
            .code(code)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(service_error)
                    if service_error.err().is_resource_conflict_exception() =>
                {
                    ServiceError::ConflictError(spec.function_name.clone())
                }
                _ => ServiceError::ProvisioningError(error_string(&e)),
            })?;

        Ok(())
    }

    async fn update_function_code(
        &self,
        function_name: &str,
        code: &[u8],
    ) -> Result<(), ServiceError> {
        debug!("Updating code of Lambda function {}", function_name);

        self.client
            .update_function_code()
            .function_name(function_name)
            .zip_file(Blob::new(code))
            .send()
            .await
            .map_err(|e| ServiceError::ProvisioningError(error_string(&e)))?;

        Ok(())
    }

    async fn update_function_configuration(
        &self,
        function_name: &str,
        runtime: &str,
        environment_variables: &HashMap<String, String>,
    ) -> Result<(), ServiceError> {
        debug!("Updating configuration of Lambda function {}", function_name);

        let environment = Environment::builder()
            .set_variables(Some(environment_variables.clone()))
            .build();

        self.client
            .update_function_configuration()
            .function_name(function_name)
            .runtime(Runtime::from(runtime))
            .environment(environment)
            .send()
            .await
            .map_err(|e| ServiceError::ProvisioningError(error_string(&e)))?;

        Ok(())
    }

    async fn list_functions(&self) -> Result<Vec<FunctionSummary>, ServiceError> {
        let response = self
            .client
            .list_functions()
            .send()
            .await
            .map_err(|e| ServiceError::RemoteFetchError(error_string(&e)))?;

        let functions = response
            .functions()
            .iter()
            .map(|f| FunctionSummary {
                function_name: f.function_name().unwrap_or_default().to_string(),
                runtime: f
                    .runtime()
                    .map(|r| r.as_str().to_string())
                    .unwrap_or_default(),
                handler: f.handler().unwrap_or_default().to_string(),
                role: f.role().unwrap_or_default().to_string(),
                code_size: Some(f.code_size()),
                last_modified: f.last_modified().map(|s| s.to_string()),
            })
            .collect();

        Ok(functions)
    }
}

fn error_string<T: std::error::Error>(error: &SdkError<T>) -> String {
    match error {
        SdkError::ServiceError(inner) => inner.err().to_string(),
        _ => error.to_string(),
    }
}
