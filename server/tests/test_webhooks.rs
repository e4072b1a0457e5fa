//! Webhook endpoint tests

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tokio::sync::mpsc;
use tower::ServiceExt;

use common::{
    build_service, config, zipball, FakeArchiveFetcher, FakeFunctionHost, FakeObjectStore,
    Harness, TestBindings,
};
use skylift::bindings::BindingEntry;
use skylift::github::client::GitHubClient;
use skylift::server::serve::build_router;
use skylift::server::state::ServerState;
use skylift::workers::deployer::DeployRequest;

const SECRET: &str = "test-webhook-secret";

fn sign(body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(SECRET.as_bytes()).unwrap();
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

fn bindings_with_rules() -> TestBindings {
    let mut auto = HashMap::new();
    auto.insert(
        ("user/my-lambda-app".to_string(), "main".to_string()),
        BindingEntry {
            access_token: "stored-token".to_string(),
            config: config("user/my-lambda-app", "lambda"),
        },
    );

    let mut preview = HashMap::new();
    preview.insert(
        "user/my-static-site".to_string(),
        BindingEntry {
            access_token: "stored-token".to_string(),
            config: config("user/my-static-site", "s3-static"),
        },
    );

    TestBindings { auto, preview }
}

fn build_state(
    harness: &Harness,
    bindings: TestBindings,
) -> (Arc<ServerState>, mpsc::Receiver<DeployRequest>) {
    let (deploy_tx, deploy_rx) = mpsc::channel(8);
    let state = Arc::new(ServerState {
        github: Arc::new(GitHubClient::new("https://api.github.com").unwrap()),
        deployments: harness.service.clone(),
        functions: harness.functions.clone(),
        objects: harness.objects.clone(),
        bindings: Arc::new(bindings),
        deploy_queue: deploy_tx,
        webhook_secret: SECRET.to_string(),
    });
    (state, deploy_rx)
}

fn default_harness() -> Harness {
    build_service(
        FakeArchiveFetcher::returning(zipball("app-main-ff00", &[("index.html", b"x".as_slice())])),
        FakeFunctionHost::default(),
        FakeObjectStore::default(),
    )
}

fn webhook_request(event: &str, signature: Option<&str>, body: &[u8]) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/webhooks/github")
        .header("content-type", "application/json")
        .header("X-GitHub-Event", event);
    if let Some(signature) = signature {
        builder = builder.header("X-Hub-Signature-256", signature);
    }
    builder.body(Body::from(body.to_vec())).unwrap()
}

#[tokio::test]
async fn test_webhook_missing_signature_is_rejected() {
    let harness = default_harness();
    let (state, _deploy_rx) = build_state(&harness, bindings_with_rules());
    let app = build_router(state);

    let response = app
        .oneshot(webhook_request("push", None, b"{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_webhook_invalid_signature_is_rejected() {
    let harness = default_harness();
    let (state, _deploy_rx) = build_state(&harness, bindings_with_rules());
    let app = build_router(state);

    let body = br#"{"ref": "refs/heads/main"}"#;
    let mut signature = sign(body);
    signature.replace_range(10..11, if &signature[10..11] == "0" { "1" } else { "0" });

    let response = app
        .oneshot(webhook_request("push", Some(&signature), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_webhook_invalid_json_is_rejected() {
    let harness = default_harness();
    let (state, _deploy_rx) = build_state(&harness, bindings_with_rules());
    let app = build_router(state);

    let body = b"not json";
    let response = app
        .oneshot(webhook_request("push", Some(&sign(body)), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_webhook_push_queues_configured_deployment() {
    let harness = default_harness();
    let (state, mut deploy_rx) = build_state(&harness, bindings_with_rules());
    let app = build_router(state);

    let body = serde_json::json!({
        "ref": "refs/heads/main",
        "repository": { "full_name": "user/my-lambda-app" }
    })
    .to_string()
    .into_bytes();

    let response = app
        .oneshot(webhook_request("push", Some(&sign(&body)), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let payload = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let acknowledged: serde_json::Value = serde_json::from_slice(&payload).unwrap();
    assert_eq!(acknowledged["status"], "received");

    let request = deploy_rx.recv().await.unwrap();
    assert_eq!(request.access_token, "stored-token");
    assert_eq!(request.config.repository_name, "user/my-lambda-app");
    assert_eq!(request.config.branch, "main");
}

#[tokio::test]
async fn test_webhook_push_without_binding_is_acknowledged_only() {
    let harness = default_harness();
    let (state, mut deploy_rx) = build_state(&harness, bindings_with_rules());
    let app = build_router(state);

    let body = serde_json::json!({
        "ref": "refs/heads/main",
        "repository": { "full_name": "user/unconfigured" }
    })
    .to_string()
    .into_bytes();

    let response = app
        .oneshot(webhook_request("push", Some(&sign(&body)), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(deploy_rx.try_recv().is_err());
    assert!(harness.service.list_deployments().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_webhook_unknown_event_is_acknowledged_only() {
    let harness = default_harness();
    let (state, mut deploy_rx) = build_state(&harness, bindings_with_rules());
    let app = build_router(state);

    let body = b"{}";
    let response = app
        .oneshot(webhook_request("issues", Some(&sign(body)), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(deploy_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_webhook_pull_request_queues_preview_deployment() {
    let harness = default_harness();
    let (state, mut deploy_rx) = build_state(&harness, bindings_with_rules());
    let app = build_router(state);

    let body = serde_json::json!({
        "action": "opened",
        "number": 42,
        "repository": { "full_name": "user/my-static-site" },
        "pull_request": { "head": { "ref": "feature-x" } }
    })
    .to_string()
    .into_bytes();

    let response = app
        .oneshot(webhook_request("pull_request", Some(&sign(&body)), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = deploy_rx.recv().await.unwrap();
    assert_eq!(request.config.repository_name, "user/my-static-site");
    assert_eq!(request.config.branch, "feature-x");
    assert_eq!(request.config.environment, "preview-42");
}

#[tokio::test]
async fn test_webhook_pull_request_ignores_other_actions() {
    let harness = default_harness();
    let (state, mut deploy_rx) = build_state(&harness, bindings_with_rules());
    let app = build_router(state);

    let body = serde_json::json!({
        "action": "closed",
        "number": 42,
        "repository": { "full_name": "user/my-static-site" },
        "pull_request": { "head": { "ref": "feature-x" } }
    })
    .to_string()
    .into_bytes();

    let response = app
        .oneshot(webhook_request("pull_request", Some(&sign(&body)), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(deploy_rx.try_recv().is_err());
}
