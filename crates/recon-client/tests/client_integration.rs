//! Backend client tests against a local mock backend.
//!
//! The mock implements the three routes the client consumes, with
//! scripted bodies, so these tests exercise real sockets and real
//! serialization rather than stubbed transport.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use recon_client::{API_KEY_HEADER, BackendClient};
use recon_core::wire::{JobStatus, ScanRequest, ScanType};

#[derive(Clone)]
struct MockState {
    saw_api_key: Arc<AtomicBool>,
}

async fn health(State(state): State<MockState>, headers: HeaderMap) -> impl IntoResponse {
    if headers.get(API_KEY_HEADER).map(|v| v.as_bytes()) == Some(b"test-key") {
        state.saw_api_key.store(true, Ordering::SeqCst);
    }
    axum::Json(serde_json::json!({
        "status": "healthy",
        "version": "1.0.0",
        "modules_available": ["domain_intel", "tech_fingerprint"]
    }))
}

async fn submit(headers: HeaderMap) -> impl IntoResponse {
    if headers.get(API_KEY_HEADER).map(|v| v.as_bytes()) != Some(b"test-key") {
        return (
            StatusCode::UNAUTHORIZED,
            axum::Json(serde_json::json!({"detail": "Invalid API key"})),
        );
    }
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({
            "scan_id": "scan-123",
            "status": "initiated",
            "message": "Scan started."
        })),
    )
}

async fn status() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "scan_id": "scan-123",
        "status": "running",
        "modules_executed": ["domain_intel"],
        "target": "example.com"
    }))
}

async fn spawn_mock() -> (String, MockState) {
    let state = MockState {
        saw_api_key: Arc::new(AtomicBool::new(false)),
    };
    let app = Router::new()
        .route("/health", get(health))
        .route("/api/v1/scan", post(submit))
        .route("/api/v1/scan/{id}", get(status))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), state)
}

#[tokio::test]
async fn submit_returns_scan_id_and_sends_api_key() {
    let (base, state) = spawn_mock().await;
    let client = BackendClient::new("test-key");

    let submitted = client
        .submit_scan(&base, &ScanRequest::new("example.com", ScanType::Domain, false))
        .await
        .unwrap();
    assert_eq!(submitted.scan_id, "scan-123");

    client.health(&base).await.unwrap();
    assert!(state.saw_api_key.load(Ordering::SeqCst));
}

#[tokio::test]
async fn auth_failure_surfaces_the_detail_field() {
    let (base, _state) = spawn_mock().await;
    let client = BackendClient::new("wrong-key");

    let err = client
        .submit_scan(&base, &ScanRequest::new("example.com", ScanType::Domain, false))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("Invalid API key"));
}

#[tokio::test]
async fn status_parses_legacy_running_and_extra_fields() {
    let (base, _state) = spawn_mock().await;
    let client = BackendClient::new("test-key");

    let status = client.scan_status(&base, "scan-123").await.unwrap();
    assert_eq!(status.status, JobStatus::InProgress);
    assert_eq!(status.modules_executed, vec!["domain_intel"]);
    assert_eq!(status.extra["target"], "example.com");
}

#[tokio::test]
async fn probe_counts_any_response_as_alive() {
    let (base, _state) = spawn_mock().await;
    // Wrong key: /health still answers, which is all liveness needs.
    let client = BackendClient::new("wrong-key");
    assert!(client.probe(&base, Duration::from_secs(2)).await);
}

#[tokio::test]
async fn probe_fails_against_a_closed_port() {
    let client = BackendClient::new("test-key");
    assert!(
        !client
            .probe("http://127.0.0.1:1", Duration::from_millis(300))
            .await
    );
}

#[tokio::test]
async fn health_payload_lists_modules() {
    let (base, _state) = spawn_mock().await;
    let client = BackendClient::new("test-key");

    let info = client.health(&base).await.unwrap();
    assert_eq!(info.status, "healthy");
    assert_eq!(info.modules_available.len(), 2);
}
