//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::deployment::DeploymentConfig;
use crate::server::state::ServerState;

/// Error body returned by all failing endpoints
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

pub(crate) fn error_response(status: StatusCode, detail: String) -> (StatusCode, Json<ErrorDetail>) {
    (status, Json(ErrorDetail { detail }))
}

/// Root banner
pub async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Skylift API" }))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "skylift".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Repository listing request
#[derive(Debug, Deserialize)]
pub struct RepositoriesRequest {
    pub access_token: String,
}

/// Repository listing handler
pub async fn repositories_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<RepositoriesRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorDetail>)> {
    match state.github.get_user_repositories(&request.access_token).await {
        Ok(repositories) => Ok(Json(repositories)),
        Err(e) => Err(error_response(
            StatusCode::BAD_REQUEST,
            format!("Failed to fetch repositories: {}", e),
        )),
    }
}

/// Repository content query
#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    pub access_token: String,
    #[serde(default)]
    pub path: String,
}

/// Repository content passthrough handler
pub async fn repository_content_handler(
    State(state): State<Arc<ServerState>>,
    Path((owner, repo)): Path<(String, String)>,
    Query(query): Query<ContentQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorDetail>)> {
    let repo_full_name = format!("{}/{}", owner, repo);
    match state
        .github
        .get_repository_content(&query.access_token, &repo_full_name, &query.path)
        .await
    {
        Ok(content) => Ok(Json(content)),
        Err(e) => Err(error_response(
            StatusCode::BAD_REQUEST,
            format!("Failed to fetch repository content: {}", e),
        )),
    }
}

/// Deployment creation request
#[derive(Debug, Deserialize)]
pub struct CreateDeploymentRequest {
    pub access_token: String,
    pub config: DeploymentConfig,
}

/// Deployment creation handler; publishes within the request
pub async fn create_deployment_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<CreateDeploymentRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorDetail>)> {
    match state
        .deployments
        .create_deployment(&request.access_token, &request.config)
        .await
    {
        Ok(deployment) => Ok(Json(deployment)),
        Err(e) => Err(error_response(
            StatusCode::BAD_REQUEST,
            format!("Failed to create deployment: {}", e),
        )),
    }
}

/// Deployment listing handler
pub async fn list_deployments_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorDetail>)> {
    match state.deployments.list_deployments().await {
        Ok(deployments) => Ok(Json(deployments)),
        Err(e) => Err(error_response(
            StatusCode::BAD_REQUEST,
            format!("Failed to list deployments: {}", e),
        )),
    }
}

/// Single deployment handler
pub async fn get_deployment_handler(
    State(state): State<Arc<ServerState>>,
    Path(deployment_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorDetail>)> {
    match state.deployments.get_deployment(&deployment_id).await {
        Ok(Some(deployment)) => Ok(Json(deployment)),
        Ok(None) => Err(error_response(
            StatusCode::NOT_FOUND,
            "Deployment not found".to_string(),
        )),
        Err(e) => Err(error_response(
            StatusCode::BAD_REQUEST,
            format!("Failed to fetch deployment: {}", e),
        )),
    }
}

/// Bucket listing handler
pub async fn list_buckets_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorDetail>)> {
    match state.objects.list_buckets().await {
        Ok(buckets) => Ok(Json(buckets)),
        Err(e) => Err(error_response(
            StatusCode::BAD_REQUEST,
            format!("Failed to list buckets: {}", e),
        )),
    }
}

/// Function listing handler
pub async fn list_functions_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorDetail>)> {
    match state.functions.list_functions().await {
        Ok(functions) => Ok(Json(functions)),
        Err(e) => Err(error_response(
            StatusCode::BAD_REQUEST,
            format!("Failed to list functions: {}", e),
        )),
    }
}
