//! Firewall lease and async action wait tests.

use std::time::Duration;

use serde_json::json;
use stackapi::{
    lease, lease_sync, lease_sync_with, wait_stack_async_action, LeaseOptions, StackApiError,
    StackClient, WaitConfig,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACTION_PATH: &str = "/stacks/uid-1/actions/42.json";

fn running() -> serde_json::Value {
    json!({
        "response": {
            "id": 42,
            "action": "firewall_lease",
            "started_at": "2024-05-01T10:00:00Z",
            "started_via": null,
            "finished_at": null,
            "finished_success": null,
            "finished_message": null,
            "finished_result": null
        }
    })
}

fn finished(success: bool, message: &str) -> serde_json::Value {
    json!({
        "response": {
            "id": 42,
            "action": "firewall_lease",
            "started_at": "2024-05-01T10:00:00Z",
            "finished_at": "2024-05-01T10:00:04Z",
            "finished_success": success,
            "finished_message": message
        }
    })
}

fn fast_wait() -> WaitConfig {
    WaitConfig {
        interval: Duration::from_millis(10),
        timeout: Duration::from_secs(5),
    }
}

async fn mount_lease(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/stacks/uid-1/firewalls.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(running()))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_lease_defaults_in_request_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/stacks/uid-1/firewalls.json"))
        .and(body_json(json!({
            "from_ip": "AUTO",
            "ttl": 20,
            "port": 22,
            "server_id": ""
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(running()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = StackClient::new("test-token", &mock_server.uri()).unwrap();
    let action = lease(&client, "uid-1", &LeaseOptions::default()).await.unwrap();

    assert_eq!(action.id, 42);
}

#[tokio::test]
async fn test_lease_explicit_options() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/stacks/uid-1/firewalls.json"))
        .and(body_json(json!({
            "from_ip": "198.51.100.7",
            "ttl": 5,
            "port": 5432,
            "server_id": "srv-db"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(running()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = StackClient::new("test-token", &mock_server.uri()).unwrap();
    let options = LeaseOptions {
        from_ip: Some("198.51.100.7".to_string()),
        ttl: Some(5),
        port: Some(5432),
        server_uid: Some("srv-db".to_string()),
    };
    lease(&client, "uid-1", &options).await.unwrap();
}

#[tokio::test]
async fn test_failed_lease_never_polls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/stacks/uid-1/firewalls.json"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({ "error": "invalid ip" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(ACTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(finished(true, "")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = StackClient::new("test-token", &mock_server.uri()).unwrap();
    let err = lease_sync(&client, "uid-1", &LeaseOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StackApiError::ApiError {
            status_code: Some(422),
            ..
        }
    ));
}

#[tokio::test]
async fn test_settled_action_returns_without_waiting() {
    let mock_server = MockServer::start().await;
    mount_lease(&mock_server).await;

    Mock::given(method("GET"))
        .and(path(ACTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(finished(true, "lease opened")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = StackClient::new("test-token", &mock_server.uri()).unwrap();
    let started = std::time::Instant::now();
    // Default settings: 2 second interval, 5 minute deadline
    let outcome = lease_sync(&client, "uid-1", &LeaseOptions::default())
        .await
        .unwrap();

    assert!(outcome.ok);
    assert_eq!(outcome.message, "lease opened");
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_wait_polls_until_settled() {
    let mock_server = MockServer::start().await;
    mount_lease(&mock_server).await;

    Mock::given(method("GET"))
        .and(path(ACTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(running()))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(ACTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(finished(false, "port busy")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = StackClient::new("test-token", &mock_server.uri()).unwrap();
    let outcome = lease_sync_with(&client, "uid-1", &LeaseOptions::default(), fast_wait())
        .await
        .unwrap();

    // A failed action is still a settled action
    assert!(!outcome.ok);
    assert_eq!(outcome.message, "port busy");
}

#[tokio::test]
async fn test_wait_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ACTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(running()))
        .mount(&mock_server)
        .await;

    let client = StackClient::new("test-token", &mock_server.uri()).unwrap();
    let wait = WaitConfig {
        interval: Duration::from_millis(20),
        timeout: Duration::from_millis(100),
    };
    let err = wait_stack_async_action(&client, "uid-1", 42, wait)
        .await
        .unwrap_err();

    match err {
        StackApiError::Timeout { action_id, waited } => {
            assert_eq!(action_id, 42);
            assert!(waited + Duration::from_millis(20) > Duration::from_millis(100));
        }
        other => panic!("Expected Timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_poll_error_propagates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ACTION_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "not found" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = StackClient::new("test-token", &mock_server.uri()).unwrap();
    let err = wait_stack_async_action(&client, "uid-1", 42, fast_wait())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}
