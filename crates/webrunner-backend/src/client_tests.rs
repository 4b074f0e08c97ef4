use super::*;
use webrunner_protocols::{StepResult, TestResult, TestStatus};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_base_url_trailing_slash_stripped() {
    let client = BackendClient::new("http://backend:3000/");
    assert_eq!(client.base_url(), "http://backend:3000");
}

#[tokio::test]
async fn test_list_tests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"_id": "t1", "status": "pending", "steps": [
                {"name": "open", "commands": ["navigate home"]}
            ]},
            {"_id": "t2", "status": "completed", "steps": []}
        ])))
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri());
    let tests = client.list_tests().await.unwrap();
    assert_eq!(tests.len(), 2);
    assert_eq!(tests[0].id, "t1");
    assert_eq!(tests[0].status, TestStatus::Pending);
    assert_eq!(tests[1].status, TestStatus::Completed);
}

#[tokio::test]
async fn test_list_tests_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tests"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri());
    match client.list_tests().await {
        Err(BackendError::Http(msg)) => assert!(msg.contains("500")),
        other => panic!("expected Http error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_list_tests_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tests"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri());
    assert!(matches!(
        client.list_tests().await,
        Err(BackendError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_get_test_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tests/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri());
    match client.get_test("missing").await {
        Err(BackendError::NotFound(id)) => assert_eq!(id, "missing"),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_get_test() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tests/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(
            {"_id": "t1", "startUrl": "https://example.com", "steps": []}
        )))
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri());
    let test = client.get_test("t1").await.unwrap();
    assert_eq!(test.id, "t1");
    assert_eq!(test.start_url.as_deref(), Some("https://example.com"));
}

#[tokio::test]
async fn test_update_status_sends_camel_case_result() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/tests/t1/status"))
        .and(body_partial_json(serde_json::json!({
            "status": "failed",
            "executionTime": 1.5,
            "error": "timeout: #submit",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri());
    let result = TestResult::failed(
        "t1",
        1.5,
        vec![StepResult::failed("click-btn", 1.5, "timeout: #submit")],
        "timeout: #submit",
    );
    client
        .update_status("t1", &StatusUpdate::from(&result))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_status_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/tests/gone/status"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri());
    assert!(matches!(
        client.update_status("gone", &StatusUpdate::running()).await,
        Err(BackendError::NotFound(_))
    ));
}
