//! HTTP client tests against a mock session service.

use serde_json::json;
use session_bridge_adapter::{SessionAdapter, ShellOptions, SummarizeOptions};
use session_bridge_core::{ClientError, Operation, SessionClient, SessionRequest, WorkspaceContext};
use session_bridge_http::{HttpClientConfig, HttpSessionClient};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path, query_param},
};

// ============================================================================
// Helpers
// ============================================================================

const DIRECTORY: &str = "/work/repo";

fn client(server: &MockServer) -> HttpSessionClient {
    HttpSessionClient::new(&HttpClientConfig::new(server.uri())).expect("valid config")
}

fn adapter(server: &MockServer) -> SessionAdapter<HttpSessionClient> {
    SessionAdapter::new(client(server), WorkspaceContext::new(DIRECTORY))
}

fn remote_session(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Session",
        "projectID": "prj_1",
        "directory": DIRECTORY,
        "version": "1.0.0",
        "time": { "created": 100, "updated": 200 }
    })
}

// ============================================================================
// Client
// ============================================================================

#[tokio::test]
async fn test_create_posts_with_directory() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session"))
        .and(query_param("directory", DIRECTORY))
        .and(body_json(json!({ "title": "Hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote_session("ses_1")))
        .expect(1)
        .mount(&server)
        .await;

    let request = SessionRequest::new(&WorkspaceContext::new(DIRECTORY)).field("title", "Hello");
    let value = client(&server).call(Operation::Create, request).await.unwrap();

    assert_eq!(value["id"], "ses_1");
}

#[tokio::test]
async fn test_error_body_becomes_error_marker() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/session/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "name": "NotFoundError",
            "data": { "message": "Session not found: missing" }
        })))
        .mount(&server)
        .await;

    let request = SessionRequest::for_session(&WorkspaceContext::new(DIRECTORY), "missing");
    let err = client(&server).call(Operation::Get, request).await.unwrap_err();

    assert_eq!(
        err,
        ClientError::named("NotFoundError", "Session not found: missing")
    );
}

#[tokio::test]
async fn test_empty_body_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session/ses_1/abort"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let request = SessionRequest::for_session(&WorkspaceContext::new(DIRECTORY), "ses_1");
    let value = client(&server).call(Operation::Abort, request).await.unwrap();

    assert!(value.is_null());
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let request = SessionRequest::new(&WorkspaceContext::new(DIRECTORY));
    let err = client(&server).call(Operation::List, request).await.unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Pooled servers stay alive after drop; a dedicated one shuts down.
    let server = MockServer::builder().start().await;
    let uri = server.uri();
    drop(server);

    let client = HttpSessionClient::new(&HttpClientConfig::new(uri)).unwrap();
    let request = SessionRequest::new(&WorkspaceContext::new(DIRECTORY));
    let err = client.call(Operation::List, request).await.unwrap_err();

    assert!(matches!(err, ClientError::Transport(_)));
}

// ============================================================================
// Adapter over HTTP
// ============================================================================

#[tokio::test]
async fn test_adapter_list_and_switch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/session"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([remote_session("a"), remote_session("b")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/session/b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote_session("b")))
        .mount(&server)
        .await;

    let adapter = adapter(&server);
    let sessions = adapter.list_sessions().await.unwrap();
    let session = adapter.switch_session("b").await.unwrap();

    assert_eq!(sessions.len(), 2);
    assert_eq!(session.id, "b");
    assert_eq!(session.created_at, 100);
}

#[tokio::test]
async fn test_adapter_diff_sends_message_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/session/ses_1/diff"))
        .and(query_param("messageID", "msg_2"))
        .and(query_param("directory", DIRECTORY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "file": "src/lib.rs",
            "before": "",
            "after": "fn main() {}",
            "additions": 1,
            "deletions": 0
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let diffs = adapter(&server)
        .get_session_diff("ses_1", Some("msg_2"))
        .await
        .unwrap();

    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].additions, 1);
}

#[tokio::test]
async fn test_adapter_shell_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session/ses_1/shell"))
        .and(body_json(json!({ "command": "cargo fmt", "agent": "build" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg_1" })))
        .expect(1)
        .mount(&server)
        .await;

    let result = adapter(&server)
        .execute_shell("ses_1", "cargo fmt", ShellOptions::default())
        .await;

    assert!(result.is_success());
}

#[tokio::test]
async fn test_adapter_summarize_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session/ses_1/summarize"))
        .and(body_json(json!({
            "providerID": "anthropic",
            "modelID": "claude-sonnet-4-5"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let result = adapter(&server)
        .summarize_session("ses_1", SummarizeOptions::default())
        .await;

    assert!(result.is_success());
}

#[tokio::test]
async fn test_adapter_share_and_unshare() {
    let server = MockServer::start().await;
    let mut shared = remote_session("ses_1");
    shared["share"] = json!({ "url": "https://share.example/ses_1" });
    Mock::given(method("POST"))
        .and(path("/session/ses_1/share"))
        .respond_with(ResponseTemplate::new(200).set_body_json(shared))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/session/ses_1/share"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote_session("ses_1")))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = adapter(&server);
    let share = adapter.share_session("ses_1").await;
    let unshare = adapter.unshare_session("ses_1").await;

    assert_eq!(
        share.data().and_then(|d| d.share_url.as_deref()),
        Some("https://share.example/ses_1")
    );
    assert!(unshare.is_success());
}

#[tokio::test]
async fn test_adapter_delete_missing_reports_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/session/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "name": "NotFoundError",
            "data": { "message": "Session not found: missing" }
        })))
        .mount(&server)
        .await;

    let result = adapter(&server).delete_session("missing").await;

    assert!(!result.is_success());
    assert_eq!(result.error(), Some("Session not found: missing"));
}

#[tokio::test]
async fn test_adapter_switch_blank_error_keeps_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/session/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "name": "NotFoundError",
            "data": { "message": "" }
        })))
        .mount(&server)
        .await;

    let err = adapter(&server).switch_session("missing").await.unwrap_err();

    assert_eq!(err.to_string(), "HTTP 404 Not Found");
}

#[tokio::test]
async fn test_adapter_status_failure_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/session/status"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(adapter(&server).get_session_status().await.is_none());
}

#[tokio::test]
async fn test_adapter_fork_without_id_raises() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session/ses_1/fork"))
        .and(body_json(json!({ "messageID": "msg_3" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let result = adapter(&server).fork_session("ses_1", "msg_3").await;

    assert!(result.is_err());
}
