//! Router tests for the webhook receiver.
//!
//! Requests go straight through the axum router with `oneshot`; the printer
//! is a plain file in a temp directory, or a named pipe where the test needs
//! to hold the device open.
//!
//! Run with:
//!   cargo test -p hookprint-server --test webhook

use std::collections::HashMap;
use std::path::Path;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use hookprint_server::{Config, ServerState, api};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

// ── Helpers ─────────────────────────────────────────────────────────────────

fn app(device: &Path, extra: &[(&str, &str)]) -> Router {
    let mut vars: HashMap<String, String> = extra
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    vars.insert(
        "PRINTER_DEVICE".into(),
        device.to_string_lossy().into_owned(),
    );

    let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();
    api::router(ServerState::new(config).unwrap())
}

fn post(event: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("x-github-delivery", "72d3162e-cc78-11e3-81ab-4c9367dc0958");
    if let Some(event) = event {
        builder = builder.header("x-github-event", event);
    }
    builder.body(body.into()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn issue_payload() -> Value {
    json!({
        "action": "opened",
        "issue": {
            "number": 42,
            "title": "Printer jams on long receipts",
            "body": "Steps to reproduce:\n1. Print a long issue",
            "created_at": "2024-01-22T14:32:15Z",
            "html_url": "https://github.com/octo/hello/issues/42",
            "user": { "login": "alice" },
            "assignee": { "login": "bob" },
            "labels": [{ "name": "bug" }]
        },
        "repository": { "full_name": "octo/hello" }
    })
}

// ── Method and body validation ──────────────────────────────────────────────

#[tokio::test]
async fn get_is_rejected_with_405() {
    let dir = TempDir::new().unwrap();
    let device = dir.path().join("lp0");
    let request = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(&device, &[]), request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, "Error: Expecting a POST request");
    assert!(!device.exists());
}

#[tokio::test]
async fn invalid_json_is_rejected_with_400() {
    let dir = TempDir::new().unwrap();
    let device = dir.path().join("lp0");

    for body in ["not json", "", "42", "null"] {
        let (status, text) = send(app(&device, &[]), post(Some("issues"), body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", body);
        assert_eq!(text, "Error: Invalid JSON payload");
    }
    assert!(!device.exists());
}

// ── Printing ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn issue_is_printed_to_device() {
    let dir = TempDir::new().unwrap();
    let device = dir.path().join("lp0");

    let (status, body) = send(
        app(&device, &[]),
        post(Some("issues"), issue_payload().to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Printed successfully");

    let job = std::fs::read(&device).unwrap();
    assert!(job.starts_with(&[0x1B, 0x40]));
    assert!(contains(&job, b"New Issue"));
    assert!(contains(&job, b"Issue: #42"));
    assert!(contains(&job, b"Assigned to: @bob"));
    assert!(contains(&job, b"[bug]"));
    assert!(contains(&job, b"2024-01-22 14:32:15 UTC"));
    // Partial cut after three lines
    assert!(contains(&job, &[0x1D, 0x56, 0x42, 0x03]));
}

#[tokio::test]
async fn qr_code_follows_config() {
    let dir = TempDir::new().unwrap();
    let device = dir.path().join("lp0");

    let (status, _) = send(
        app(&device, &[("PRINT_QR_CODE", "true")]),
        post(Some("issues"), issue_payload().to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let job = std::fs::read(&device).unwrap();
    assert!(contains(&job, b"https://github.com/octo/hello/issues/42"));
    assert!(contains(&job, &[0x1D, 0x28, 0x6B]));
}

#[tokio::test]
async fn pull_request_with_array_body_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let device = dir.path().join("lp0");

    let (status, _) = send(app(&device, &[]), post(Some("pull_request"), "[]")).await;

    assert_eq!(status, StatusCode::OK);
    let job = std::fs::read(&device).unwrap();
    assert!(contains(&job, b"[opened]"));
    assert!(contains(&job, b"Created by: @unknown"));
    assert!(contains(&job, b"(no title)"));
}

#[tokio::test]
async fn failed_workflow_run_is_printed() {
    let dir = TempDir::new().unwrap();
    let device = dir.path().join("lp0");
    let payload = json!({
        "action": "completed",
        "workflow_run": {
            "id": 30433642,
            "name": "CI",
            "conclusion": "failure",
            "updated_at": "2024-01-22T14:32:15Z"
        },
        "repository": { "full_name": "octo/hello" }
    });

    let (status, _) = send(
        app(&device, &[]),
        post(Some("workflow_run"), payload.to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let job = std::fs::read(&device).unwrap();
    assert!(contains(&job, b"Workflow Failed"));
    assert!(contains(&job, b"Workflow: CI"));
    assert!(contains(&job, b"Run ID: 30433642"));
    assert!(contains(&job, b"Status: FAILURE"));
}

#[tokio::test]
async fn successful_workflow_run_prints_nothing() {
    let dir = TempDir::new().unwrap();
    let device = dir.path().join("lp0");
    let payload = json!({
        "workflow_run": { "name": "CI", "conclusion": "success" }
    });

    let (status, body) = send(
        app(&device, &[]),
        post(Some("workflow_run"), payload.to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Printed successfully");
    assert!(!device.exists());
}

#[tokio::test]
async fn unknown_event_prints_its_name() {
    let dir = TempDir::new().unwrap();
    let device = dir.path().join("lp0");

    let (status, _) = send(app(&device, &[]), post(Some("push"), "{}")).await;

    assert_eq!(status, StatusCode::OK);
    let job = std::fs::read(&device).unwrap();
    assert!(contains(&job, b"Unknown GitHub Event"));
    assert!(contains(&job, b"push"));
    assert!(!contains(&job, &[0x1D, 0x56]));
}

#[tokio::test]
async fn missing_event_header_is_unknown_event() {
    let dir = TempDir::new().unwrap();
    let device = dir.path().join("lp0");

    let (status, _) = send(app(&device, &[]), post(None, "{}")).await;

    assert_eq!(status, StatusCode::OK);
    let job = std::fs::read(&device).unwrap();
    assert!(contains(&job, b"Unknown GitHub Event"));
}

// ── Failures ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unwritable_device_answers_500() {
    let dir = TempDir::new().unwrap();
    let device = dir.path().join("missing").join("lp0");

    let (status, body) = send(
        app(&device, &[]),
        post(Some("issues"), issue_payload().to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("Printing failed: "), "{}", body);
}

#[tokio::test]
async fn wrong_field_type_answers_500() {
    let dir = TempDir::new().unwrap();
    let device = dir.path().join("lp0");
    let payload = json!({ "issue": { "title": 12 } });

    let (status, body) = send(
        app(&device, &[]),
        post(Some("issues"), payload.to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("Printing failed: "));
    assert!(!device.exists());
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let dir = TempDir::new().unwrap();
    let device = dir.path().join("lp0");
    let body = format!(r#"{{"pad":"{}"}}"#, "x".repeat(2048));

    let (status, _) = send(
        app(&device, &[("MAX_BODY_BYTES", "1024")]),
        post(Some("issues"), body),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!device.exists());
}

// ── Serialization and timeout ───────────────────────────────────────────────

/// Named pipe standing in for a printer; opening it for writing blocks
/// until a reader shows up.
#[cfg(unix)]
fn mkfifo(path: &Path) {
    let status = std::process::Command::new("mkfifo")
        .arg(path)
        .status()
        .unwrap();
    assert!(status.success());
}

#[cfg(unix)]
async fn read_job(device: &Path) -> Vec<u8> {
    let device = device.to_path_buf();
    tokio::task::spawn_blocking(move || std::fs::read(device))
        .await
        .unwrap()
        .unwrap()
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_requests_print_one_job_at_a_time() {
    let dir = TempDir::new().unwrap();
    let device = dir.path().join("lp0");
    mkfifo(&device);
    let app = app(&device, &[]);

    let first = tokio::spawn(send(
        app.clone(),
        post(Some("issues"), issue_payload().to_string()),
    ));
    let second = tokio::spawn(send(
        app,
        post(Some("issues"), issue_payload().to_string()),
    ));

    // Each open of the pipe sees exactly one complete job
    let job_a = read_job(&device).await;
    let job_b = read_job(&device).await;

    assert_eq!(first.await.unwrap().0, StatusCode::OK);
    assert_eq!(second.await.unwrap().0, StatusCode::OK);

    let header: &[u8] = b"New Issue";
    for job in [&job_a, &job_b] {
        assert!(job.starts_with(&[0x1B, 0x40]));
        let headers = job.windows(header.len()).filter(|w| *w == header).count();
        assert_eq!(headers, 1);
    }
    assert_eq!(job_a, job_b);
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stalled_printer_times_out_with_408() {
    let dir = TempDir::new().unwrap();
    let device = dir.path().join("lp0");
    mkfifo(&device);

    let (status, _) = send(
        app(&device, &[("REQUEST_TIMEOUT_MS", "200")]),
        post(Some("issues"), issue_payload().to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);

    // Release the writer still blocked on open
    read_job(&device).await;
}

// ── Routing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn custom_webhook_path() {
    let dir = TempDir::new().unwrap();
    let device = dir.path().join("lp0");
    let app = app(&device, &[("WEBHOOK_PATH", "github")]);

    let request = Request::builder()
        .method("POST")
        .uri("/github")
        .header("x-github-event", "push")
        .body(Body::from("{}"))
        .unwrap();
    let (status, _) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(app, post(Some("push"), "{}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_printer() {
    let dir = TempDir::new().unwrap();
    let device = dir.path().join("lp0");
    let app = app(&device, &[]);

    let request = || {
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap()
    };

    let (status, body) = send(app.clone(), request()).await;
    assert_eq!(status, StatusCode::OK);
    let health: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "degraded");
    assert_eq!(health["printer_online"], false);
    assert_eq!(health["printer"], format!("file:{}", device.display()));

    std::fs::write(&device, b"").unwrap();
    let (_, body) = send(app, request()).await;
    let health: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["printer_online"], true);
}
