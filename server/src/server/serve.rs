//! HTTP server setup

use std::future::Future;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::options::ServerOptions;
use crate::errors::ServiceError;
use crate::server::handlers::{
    create_deployment_handler, get_deployment_handler, health_handler, list_buckets_handler,
    list_deployments_handler, list_functions_handler, repositories_handler,
    repository_content_handler, root_handler,
};
use crate::server::state::ServerState;
use crate::server::webhooks::github_webhook_handler;

/// Build the API router
pub fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Root and health
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        // GitHub passthrough
        .route("/api/github/repositories", post(repositories_handler))
        .route(
            "/api/github/repositories/{owner}/{repo}/content",
            get(repository_content_handler),
        )
        // Deployments
        .route("/api/github/deploy", post(create_deployment_handler))
        .route("/api/github/deployments", get(list_deployments_handler))
        .route("/api/github/deployments/{id}", get(get_deployment_handler))
        // Resource dashboards
        .route("/api/s3/buckets", get(list_buckets_handler))
        .route("/api/lambda/functions", get(list_functions_handler))
        // Webhooks
        .route("/api/webhooks/github", post(github_webhook_handler))
        // State and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn serve(
    options: &ServerOptions,
    state: Arc<ServerState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), ServiceError>>, ServiceError> {
    let cors_origin = options
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| ServiceError::ConfigError(format!("invalid CORS origin: {}", e)))?;

    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let app = build_router(state).layer(cors);

    let addr = format!("{}:{}", options.host, options.port);
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| ServiceError::ServerError(e.to_string()))?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServiceError::ServerError(e.to_string()))
    });

    Ok(handle)
}
