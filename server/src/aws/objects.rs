//! S3 bucket provisioning, object upload and listing

use async_trait::async_trait;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, ErrorDocument, IndexDocument,
    WebsiteConfiguration,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::errors::ServiceError;

/// A bucket, as listed for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct BucketSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
}

/// Capability for provisioning object storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Create a bucket; `ConflictError` when it already exists
    async fn create_bucket(&self, bucket: &str) -> Result<(), ServiceError>;

    /// Configure the bucket for static-site serving
    async fn configure_website(
        &self,
        bucket: &str,
        index_document: &str,
        error_document: &str,
    ) -> Result<(), ServiceError>;

    /// Allow public reads on every object in the bucket
    async fn apply_public_read_policy(&self, bucket: &str) -> Result<(), ServiceError>;

    /// Upload one object
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ServiceError>;

    /// List buckets
    async fn list_buckets(&self) -> Result<Vec<BucketSummary>, ServiceError>;
}

/// Object store backed by AWS S3
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    region: String,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client, region: String) -> Self {
        Self { client, region }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn create_bucket(&self, bucket: &str) -> Result<(), ServiceError> {
        debug!("Creating S3 bucket {}", bucket);

        let mut request = self.client.create_bucket().bucket(bucket);

        // us-east-1 rejects an explicit location constraint
        if self.region != "us-east-1" {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }

        request.send().await.map_err(|e| match &e {
            SdkError::ServiceError(service_error)
                if service_error.err().is_bucket_already_exists()
                    || service_error.err().is_bucket_already_owned_by_you() =>
            {
                ServiceError::ConflictError(bucket.to_string())
            }
            _ => ServiceError::ProvisioningError(error_string(&e)),
        })?;

        Ok(())
    }

    async fn configure_website(
        &self,
        bucket: &str,
        index_document: &str,
        error_document: &str,
    ) -> Result<(), ServiceError> {
        debug!("Configuring static website hosting on {}", bucket);

        let index = IndexDocument::builder()
            .suffix(index_document)
            .build()
            .map_err(|e| ServiceError::ProvisioningError(e.to_string()))?;
        let error = ErrorDocument::builder()
            .key(error_document)
            .build()
            .map_err(|e| ServiceError::ProvisioningError(e.to_string()))?;

        self.client
            .put_bucket_website()
            .bucket(bucket)
            .website_configuration(
                WebsiteConfiguration::builder()
                    .index_document(index)
                    .error_document(error)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| ServiceError::ProvisioningError(error_string(&e)))?;

        Ok(())
    }

    async fn apply_public_read_policy(&self, bucket: &str) -> Result<(), ServiceError> {
        let policy = json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Effect": "Allow",
                "Principal": "*",
                "Action": "s3:GetObject",
                "Resource": format!("arn:aws:s3:::{}/*", bucket)
            }]
        });

        self.client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy.to_string())
            .send()
            .await
            .map_err(|e| ServiceError::ProvisioningError(error_string(&e)))?;

        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ServiceError> {
        debug!("Uploading s3://{}/{}", bucket, key);

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| ServiceError::ProvisioningError(error_string(&e)))?;

        Ok(())
    }

    async fn list_buckets(&self) -> Result<Vec<BucketSummary>, ServiceError> {
        let response = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| ServiceError::RemoteFetchError(error_string(&e)))?;

        let buckets = response
            .buckets()
            .iter()
            .map(|b| BucketSummary {
                name: b.name().unwrap_or_default().to_string(),
                creation_date: b
                    .creation_date()
                    .and_then(|d| DateTime::from_timestamp(d.secs(), d.subsec_nanos())),
            })
            .collect();

        Ok(buckets)
    }
}

fn error_string<T: std::error::Error>(error: &SdkError<T>) -> String {
    match error {
        SdkError::ServiceError(inner) => inner.err().to_string(),
        _ => error.to_string(),
    }
}
