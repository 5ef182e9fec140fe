//! Integration tests for HttpVerificationClient.
//!
//! Uses wiremock for HTTP mocking. Tests cover create_session, get_result,
//! status mapping (400 not-found, bare 404 per operation, 5xx) and the
//! orchestrator end to end.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use liveness_core::{
    HttpVerificationClient, LivenessError, RemoteConfig, Resolution, SessionOrchestrator,
    SessionStatus, SessionStore, VerificationClient,
};
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CREATE_TARGET: &str = "RekognitionService.CreateFaceLivenessSession";
const RESULTS_TARGET: &str = "RekognitionService.GetFaceLivenessSessionResults";

fn create_test_client(mock_server: &MockServer) -> HttpVerificationClient {
    let config = RemoteConfig::default()
        .with_endpoint(mock_server.uri())
        .with_token("test-token")
        .with_timeout(5);
    HttpVerificationClient::new(config).expect("failed to create client")
}

#[tokio::test]
async fn test_create_session_sends_request_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("x-amz-target", CREATE_TARGET))
        .and(header("authorization", "Bearer test-token"))
        .and(header("content-type", "application/x-amz-json-1.1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"SessionId": "S1"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let session_id = client.create_session().await.expect("create failed");
    assert_eq!(session_id, "S1");

    let requests = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let token = body["ClientRequestToken"].as_str().expect("token missing");
    assert!(uuid::Uuid::parse_str(token).is_ok(), "token should be a uuid");
    assert_ne!(token, "S1");
}

#[tokio::test]
async fn test_create_session_tokens_are_fresh() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("x-amz-target", CREATE_TARGET))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"SessionId": "S1"})),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    client.create_session().await.unwrap();
    client.create_session().await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let tokens: Vec<String> = requests
        .iter()
        .map(|r| {
            let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
            body["ClientRequestToken"].as_str().unwrap().to_string()
        })
        .collect();
    assert_ne!(tokens[0], tokens[1]);
}

#[tokio::test]
async fn test_get_result_succeeded_with_image() {
    let mock_server = MockServer::start().await;
    let image = b"\xff\xd8\xff\xe0jpeg-bytes".to_vec();

    Mock::given(method("POST"))
        .and(header("x-amz-target", RESULTS_TARGET))
        .and(body_partial_json(serde_json::json!({"SessionId": "S1"})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-amzn-requestid", "req-123")
                .set_body_json(serde_json::json!({
                    "SessionId": "S1",
                    "Status": "SUCCEEDED",
                    "Confidence": 98.7,
                    "ReferenceImage": {"Bytes": BASE64.encode(&image)}
                })),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.get_result("S1").await.expect("get_result failed");

    assert_eq!(result.status, SessionStatus::Succeeded);
    assert_eq!(result.confidence, Some(98.7));
    assert_eq!(result.reference_image, Some(image));
    assert_eq!(result.response_metadata["RequestId"], "req-123");
    assert_eq!(result.response_metadata["HTTPStatusCode"], 200);
}

#[tokio::test]
async fn test_get_result_in_progress() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("x-amz-target", RESULTS_TARGET))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "SessionId": "S1",
            "Status": "IN_PROGRESS"
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.get_result("S1").await.unwrap();

    assert_eq!(result.status, SessionStatus::InProgress);
    assert!(result.confidence.is_none());
    assert!(result.reference_image.is_none());
}

#[tokio::test]
async fn test_get_result_session_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("x-amz-target", RESULTS_TARGET))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "__type": "SessionNotFoundException",
            "Message": "Session not found"
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.get_result("missing").await.unwrap_err();

    assert!(
        matches!(
            err,
            LivenessError::NotFound { kind: "session", ref session_id } if session_id == "missing"
        ),
        "unexpected error: {:?}",
        err
    );
}

#[tokio::test]
async fn test_get_result_bare_404_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("x-amz-target", RESULTS_TARGET))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.get_result("S9").await.unwrap_err();

    assert!(err.is_not_found(), "unexpected error: {:?}", err);
    assert!(
        matches!(
            err,
            LivenessError::NotFound { kind: "session", ref session_id } if session_id == "S9"
        ),
        "unexpected error: {:?}",
        err
    );
}

#[tokio::test]
async fn test_create_session_404_stays_remote() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("x-amz-target", CREATE_TARGET))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.create_session().await.unwrap_err();

    match err {
        LivenessError::Remote { message } => {
            assert!(message.contains("404"), "{message}");
            assert!(message.contains("UnknownError"), "{message}");
        }
        other => panic!("expected Remote, got {:?}", other),
    }
}

#[tokio::test]
async fn test_get_result_server_error_is_remote() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "__type": "InternalServerError",
            "Message": "boom"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.get_result("S1").await.unwrap_err();

    match err {
        LivenessError::Remote { message } => {
            assert!(message.contains("500"), "{message}");
            assert!(message.contains("InternalServerError"), "{message}");
            assert!(message.contains("boom"), "{message}");
        }
        other => panic!("expected Remote, got {:?}", other),
    }
}

#[tokio::test]
async fn test_get_result_garbage_body_is_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.get_result("S1").await.unwrap_err();
    assert!(matches!(err, LivenessError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_remote_error() {
    let config = RemoteConfig::default()
        .with_endpoint("http://127.0.0.1:1")
        .with_timeout(2);
    let client = HttpVerificationClient::new(config).unwrap();

    let err = client.create_session().await.unwrap_err();
    assert!(err.is_remote());
}

#[tokio::test]
async fn test_orchestrator_against_http_client() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(header("x-amz-target", RESULTS_TARGET))
        .and(header_exists("content-type"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "SessionId": "S1",
            "Status": "SUCCEEDED",
            "Confidence": 93.25
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Arc::new(create_test_client(&mock_server));
    let orchestrator = SessionOrchestrator::new(client, SessionStore::with_dir(temp_dir.path()));

    let first = orchestrator.resolve("S1").await.unwrap();
    assert!(matches!(first, Resolution::Captured(_)));

    let second = orchestrator.resolve("S1").await.unwrap();
    assert!(second.is_cached());
    assert_eq!(first.record(), second.record());
    // expect(1) is verified when the mock server drops
}
