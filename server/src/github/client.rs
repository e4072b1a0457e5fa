//! GitHub API client

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use tracing::{debug, error};

use crate::errors::ServiceError;
use crate::models::repository::GitHubRepository;

const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";

/// Capability for fetching a branch of a repository as a byte archive
#[async_trait]
pub trait ArchiveFetcher: Send + Sync {
    /// Download a repository branch as a zip archive
    async fn download_archive(
        &self,
        access_token: &str,
        repo_full_name: &str,
        branch: &str,
    ) -> Result<Vec<u8>, ServiceError>;
}

/// HTTP client for the GitHub REST API
pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    /// Create a new GitHub client
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(concat!("skylift/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the authenticated user's repositories
    pub async fn get_user_repositories(
        &self,
        access_token: &str,
    ) -> Result<Vec<GitHubRepository>, ServiceError> {
        let url = format!("{}/user/repos", self.base_url);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, format!("token {}", access_token))
            .header(header::ACCEPT, ACCEPT_HEADER)
            .send()
            .await
            .map_err(|e| ServiceError::RemoteFetchError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(remote_error("fetch repositories", response).await);
        }

        let repos = response.json().await?;
        Ok(repos)
    }

    /// Get repository content at a path, passed through unmodified
    pub async fn get_repository_content(
        &self,
        access_token: &str,
        repo_full_name: &str,
        path: &str,
    ) -> Result<serde_json::Value, ServiceError> {
        let url = format!(
            "{}/repos/{}/contents/{}",
            self.base_url, repo_full_name, path
        );
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, format!("token {}", access_token))
            .header(header::ACCEPT, ACCEPT_HEADER)
            .send()
            .await
            .map_err(|e| ServiceError::RemoteFetchError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(remote_error("fetch repository content", response).await);
        }

        let content = response.json().await?;
        Ok(content)
    }
}

#[async_trait]
impl ArchiveFetcher for GitHubClient {
    async fn download_archive(
        &self,
        access_token: &str,
        repo_full_name: &str,
        branch: &str,
    ) -> Result<Vec<u8>, ServiceError> {
        let url = format!(
            "{}/repos/{}/zipball/{}",
            self.base_url, repo_full_name, branch
        );
        debug!("GET {} (archive)", url);

        let response = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, format!("token {}", access_token))
            .header(header::ACCEPT, ACCEPT_HEADER)
            .send()
            .await
            .map_err(|e| ServiceError::RemoteFetchError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(remote_error("download repository", response).await);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ServiceError::RemoteFetchError(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

async fn remote_error(action: &str, response: reqwest::Response) -> ServiceError {
    let status: StatusCode = response.status();
    let body = response.text().await.unwrap_or_default();
    error!("GitHub request failed ({}): {} - {}", action, status, body);
    ServiceError::RemoteFetchError(format!("Failed to {}: {} - {}", action, status, body))
}
