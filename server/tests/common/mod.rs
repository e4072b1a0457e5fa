//! Shared test fixtures: in-memory fakes for the deployment capabilities

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use skylift::aws::functions::{FunctionHost, FunctionSpec, FunctionSummary};
use skylift::aws::objects::{BucketSummary, ObjectStore};
use skylift::bindings::{BindingEntry, DeployBindings};
use skylift::deploy::service::DeploymentService;
use skylift::deploy::store::{DeploymentStore, InMemoryDeploymentStore};
use skylift::errors::ServiceError;
use skylift::github::client::ArchiveFetcher;
use skylift::models::deployment::DeploymentConfig;

pub const REGION: &str = "us-east-1";
pub const ROLE_ARN: &str = "arn:aws:iam::123456789012:role/lambda-execution-role";

/// Build a zipball with the synthetic wrapper directory GitHub uses
pub fn zipball(prefix: &str, entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.add_directory(prefix, options).unwrap();
    for (name, content) in entries {
        writer
            .start_file(format!("{}/{}", prefix, name), options)
            .unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Archive fetcher returning a fixed archive or a fixed failure
pub struct FakeArchiveFetcher {
    archive: Vec<u8>,
    failure: Option<String>,
}

impl FakeArchiveFetcher {
    pub fn returning(archive: Vec<u8>) -> Self {
        Self {
            archive,
            failure: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            archive: Vec::new(),
            failure: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl ArchiveFetcher for FakeArchiveFetcher {
    async fn download_archive(
        &self,
        _access_token: &str,
        _repo_full_name: &str,
        _branch: &str,
    ) -> Result<Vec<u8>, ServiceError> {
        match &self.failure {
            Some(message) => Err(ServiceError::RemoteFetchError(message.clone())),
            None => Ok(self.archive.clone()),
        }
    }
}

/// Function host recording calls; optionally reports the name as taken
#[derive(Default)]
pub struct FakeFunctionHost {
    pub name_taken: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeFunctionHost {
    pub fn with_existing_function() -> Self {
        Self {
            name_taken: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FunctionHost for FakeFunctionHost {
    async fn create_function(&self, spec: &FunctionSpec) -> Result<(), ServiceError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("create:{}", spec.function_name));
        if self.name_taken {
            return Err(ServiceError::ConflictError(spec.function_name.clone()));
        }
        Ok(())
    }

    async fn update_function_code(
        &self,
        function_name: &str,
        _code: &[u8],
    ) -> Result<(), ServiceError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("update_code:{}", function_name));
        Ok(())
    }

    async fn update_function_configuration(
        &self,
        function_name: &str,
        runtime: &str,
        _environment_variables: &HashMap<String, String>,
    ) -> Result<(), ServiceError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("update_config:{}:{}", function_name, runtime));
        Ok(())
    }

    async fn list_functions(&self) -> Result<Vec<FunctionSummary>, ServiceError> {
        Ok(Vec::new())
    }
}

/// Object store recording bucket operations and uploads
#[derive(Default)]
pub struct FakeObjectStore {
    pub bucket_exists: bool,
    pub operations: Mutex<Vec<String>>,
    pub uploads: Mutex<Vec<(String, String, String)>>,
}

impl FakeObjectStore {
    pub fn with_existing_bucket() -> Self {
        Self {
            bucket_exists: true,
            operations: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded_operations(&self) -> Vec<String> {
        self.operations.lock().unwrap().clone()
    }

    /// Uploaded objects as (key, content_type) pairs
    pub fn recorded_uploads(&self) -> Vec<(String, String)> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|(_, key, content_type)| (key.clone(), content_type.clone()))
            .collect()
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn create_bucket(&self, bucket: &str) -> Result<(), ServiceError> {
        self.operations
            .lock()
            .unwrap()
            .push(format!("create_bucket:{}", bucket));
        if self.bucket_exists {
            return Err(ServiceError::ConflictError(bucket.to_string()));
        }
        Ok(())
    }

    async fn configure_website(
        &self,
        bucket: &str,
        index_document: &str,
        error_document: &str,
    ) -> Result<(), ServiceError> {
        self.operations.lock().unwrap().push(format!(
            "configure_website:{}:{}:{}",
            bucket, index_document, error_document
        ));
        Ok(())
    }

    async fn apply_public_read_policy(&self, bucket: &str) -> Result<(), ServiceError> {
        self.operations
            .lock()
            .unwrap()
            .push(format!("public_policy:{}", bucket));
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        _body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ServiceError> {
        self.uploads.lock().unwrap().push((
            bucket.to_string(),
            key.to_string(),
            content_type.to_string(),
        ));
        Ok(())
    }

    async fn list_buckets(&self) -> Result<Vec<BucketSummary>, ServiceError> {
        Ok(Vec::new())
    }
}

/// Bindings backed by plain maps
#[derive(Default)]
pub struct TestBindings {
    pub auto: HashMap<(String, String), BindingEntry>,
    pub preview: HashMap<String, BindingEntry>,
}

impl DeployBindings for TestBindings {
    fn auto_deploy(&self, repository: &str, branch: &str) -> Option<BindingEntry> {
        self.auto
            .get(&(repository.to_string(), branch.to_string()))
            .cloned()
    }

    fn preview_deploy(&self, repository: &str) -> Option<BindingEntry> {
        self.preview.get(repository).cloned()
    }
}

/// Everything a deployment scenario needs
pub struct Harness {
    pub service: Arc<DeploymentService>,
    pub functions: Arc<FakeFunctionHost>,
    pub objects: Arc<FakeObjectStore>,
}

pub fn build_service(
    fetcher: FakeArchiveFetcher,
    functions: FakeFunctionHost,
    objects: FakeObjectStore,
) -> Harness {
    let store = Arc::new(InMemoryDeploymentStore::new());
    let functions = Arc::new(functions);
    let objects = Arc::new(objects);

    let service = Arc::new(DeploymentService::new(
        store as Arc<dyn DeploymentStore>,
        Arc::new(fetcher),
        functions.clone(),
        objects.clone(),
        REGION.to_string(),
        ROLE_ARN.to_string(),
    ));

    Harness {
        service,
        functions,
        objects,
    }
}

pub fn config(repository: &str, service: &str) -> DeploymentConfig {
    serde_json::from_str(&format!(
        r#"{{"repository_name": "{}", "aws_service": "{}"}}"#,
        repository, service
    ))
    .unwrap()
}
