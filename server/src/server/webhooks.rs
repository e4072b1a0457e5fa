//! GitHub webhook handling

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, error, info};

use crate::server::handlers::{error_response, ErrorDetail};
use crate::server::state::ServerState;
use crate::workers::deployer::DeployRequest;

type HmacSha256 = Hmac<Sha256>;

/// Verify a `X-Hub-Signature-256` header against the raw request body.
///
/// The header carries `sha256=<hex of HMAC-SHA256(secret, body)>`; the
/// comparison is constant-time.
pub fn verify_signature(secret: &str, signature_header: &str, body: &[u8]) -> bool {
    let Some(signature_hex) = signature_header.strip_prefix("sha256=") else {
        return false;
    };
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

/// GitHub webhook handler.
///
/// The response acknowledges receipt only; matched events are queued for
/// the deploy worker and their outcome is never reported to the sender.
pub async fn github_webhook_handler(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorDetail>)> {
    let signature = headers
        .get("X-Hub-Signature-256")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            error_response(StatusCode::BAD_REQUEST, "Missing signature".to_string())
        })?;

    if !verify_signature(&state.webhook_secret, signature, &body) {
        return Err(error_response(
            StatusCode::FORBIDDEN,
            "Invalid signature".to_string(),
        ));
    }

    let payload: serde_json::Value = serde_json::from_slice(&body).map_err(|_| {
        error_response(StatusCode::BAD_REQUEST, "Invalid JSON payload".to_string())
    })?;

    let event_type = headers
        .get("X-GitHub-Event")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    match event_type {
        "push" => route_push_event(&state, &payload).await,
        "pull_request" => route_pull_request_event(&state, &payload).await,
        other => {
            debug!("Ignoring webhook event type {:?}", other);
        }
    }

    Ok(Json(serde_json::json!({ "status": "received" })))
}

/// Queue an auto-deploy for a push to a configured repository/branch
async fn route_push_event(state: &ServerState, payload: &serde_json::Value) {
    let Some(repository) = payload["repository"]["full_name"].as_str() else {
        error!("Push event without repository full_name, ignoring");
        return;
    };
    let Some(git_ref) = payload["ref"].as_str() else {
        error!("Push event without ref, ignoring");
        return;
    };
    let branch = git_ref.strip_prefix("refs/heads/").unwrap_or(git_ref);

    let Some(binding) = state.bindings.auto_deploy(repository, branch) else {
        debug!("No auto-deploy binding for {}:{}", repository, branch);
        return;
    };

    info!("Auto-deploy triggered for {}:{}", repository, branch);
    enqueue(
        state,
        DeployRequest {
            access_token: binding.access_token,
            config: binding.config,
        },
    )
    .await;
}

/// Queue a preview deploy for an opened or updated pull request
async fn route_pull_request_event(state: &ServerState, payload: &serde_json::Value) {
    let action = payload["action"].as_str().unwrap_or_default();
    if action != "opened" && action != "synchronize" {
        return;
    }

    let Some(repository) = payload["repository"]["full_name"].as_str() else {
        error!("Pull request event without repository full_name, ignoring");
        return;
    };
    let Some(pr_number) = payload["number"].as_i64() else {
        error!("Pull request event without number, ignoring");
        return;
    };
    let Some(branch) = payload["pull_request"]["head"]["ref"].as_str() else {
        error!("Pull request event without head ref, ignoring");
        return;
    };

    let Some(binding) = state.bindings.preview_deploy(repository) else {
        debug!("No preview-deploy binding for {}", repository);
        return;
    };

    let mut config = binding.config;
    config.branch = branch.to_string();
    config.environment = format!("preview-{}", pr_number);

    info!(
        "Preview deploy triggered for {}#{} ({})",
        repository, pr_number, branch
    );
    enqueue(
        state,
        DeployRequest {
            access_token: binding.access_token,
            config,
        },
    )
    .await;
}

async fn enqueue(state: &ServerState, request: DeployRequest) {
    if let Err(e) = state.deploy_queue.send(request).await {
        error!("Failed to queue deployment request: {}", e);
    }
}
