mod common;

use common::TestApp;
use indexer_service::workers::{CommandOutput, MockCommandRunner};
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::sync::Arc;

// =============================================================================
// Ping
// =============================================================================

#[tokio::test]
async fn ping_returns_pong() {
    let app = TestApp::spawn(Arc::new(MockCommandRunner::new())).await;

    let response = Client::new()
        .get(format!("{}/ping", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "message": "pong" }));
}

#[tokio::test]
async fn ping_is_unaffected_by_failed_uploads() {
    let runner = Arc::new(MockCommandRunner::new().failing("batch", "boom"));
    let app = TestApp::spawn(runner).await;

    let upload = app.post_upload().await;
    assert_eq!(upload.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = Client::new()
        .get(format!("{}/ping", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "pong");
}

// =============================================================================
// Upload
// =============================================================================

#[tokio::test]
async fn upload_relays_both_outputs() {
    let runner = Arc::new(
        MockCommandRunner::new()
            .with_output("batch", CommandOutput::success("Loaded 1043 documents\n"))
            .with_output("ngrams", CommandOutput::success("Computed ngrams\n")),
    );
    let app = TestApp::spawn(runner.clone()).await;

    let response = app.post_upload().await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body,
        json!({
            "batch_output": "Loaded 1043 documents\n",
            "wait_time": 10,
            "ngrams_output": "Computed ngrams\n",
            "message": "Batch and ngrams processing completed successfully."
        })
    );
    assert_eq!(runner.subcommands(), vec!["batch", "ngrams"]);
}

#[tokio::test]
async fn upload_stops_when_batch_fails() {
    let runner = Arc::new(
        MockCommandRunner::new().failing("batch", "FileNotFoundError: /daily/gtm.json\n"),
    );
    let app = TestApp::spawn(runner.clone()).await;

    let response = app.post_upload().await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body,
        json!({ "error": "Batch failed: FileNotFoundError: /daily/gtm.json\n" })
    );
    assert_eq!(runner.subcommands(), vec!["batch"]);
}

#[tokio::test]
async fn upload_reports_ngrams_failure() {
    let runner =
        Arc::new(MockCommandRunner::new().failing("ngrams", "Redis connection refused"));
    let app = TestApp::spawn(runner.clone()).await;

    let response = app.post_upload().await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "Ngrams failed: Redis connection refused" }));
    assert_eq!(runner.subcommands(), vec!["batch", "ngrams"]);
}

#[tokio::test]
async fn upload_reports_spawn_failure_as_step_error() {
    let runner = Arc::new(
        MockCommandRunner::new().unspawnable("batch", "No such file or directory"),
    );
    let app = TestApp::spawn(runner).await;

    let response = app.post_upload().await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["error"],
        "Batch failed: Failed to spawn addok: No such file or directory"
    );
}

#[tokio::test]
async fn upload_requires_post() {
    let app = TestApp::spawn(Arc::new(MockCommandRunner::new())).await;

    let response = Client::new()
        .get(format!("{}/upload", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn concurrent_uploads_both_run() {
    let runner = Arc::new(MockCommandRunner::new());
    let app = TestApp::spawn(runner.clone()).await;

    let (first, second) = tokio::join!(app.post_upload(), app.post_upload());

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);

    let mut subcommands = runner.subcommands();
    subcommands.sort();
    assert_eq!(subcommands, vec!["batch", "batch", "ngrams", "ngrams"]);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::spawn(Arc::new(MockCommandRunner::new())).await;

    let response = Client::new()
        .get(format!("{}/ping", app.address))
        .header("x-request-id", "req-42")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.headers()["x-request-id"], "req-42");
}
