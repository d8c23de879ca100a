//! Tests for settings, environment variables, deployments and actions.

use serde_json::json;
use stackapi::{
    create_stack, env_vars_string, invoke_db_stack_action, invoke_stack_action, reboot_stack,
    redeploy_stack, set_env_var, set_setting, upload_env_vars, RedeployParams, StackApiError,
    StackClient, TargetOptions, UploadMode,
};
use wiremock::matchers::{any, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn action(id: i64) -> serde_json::Value {
    json!({ "response": { "id": id, "action": "update", "finished_at": null } })
}

#[tokio::test]
async fn test_set_setting_replaces_periods_in_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/stacks/uid-1/settings/db-host.json"))
        .and(body_json(json!({ "value": "10.0.0.5" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(action(11)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = StackClient::new("test-token", &mock_server.uri()).unwrap();
    let result = set_setting(&client, "uid-1", "db.host", "10.0.0.5").await.unwrap();

    assert_eq!(result.id, 11);
    assert!(!result.is_finished());
}

#[tokio::test]
async fn test_env_vars_string_api_format_is_rejected_locally() {
    let mock_server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = StackClient::new("test-token", &mock_server.uri()).unwrap();
    let err = env_vars_string(&client, "uid-1", "api", &[]).await.unwrap_err();

    assert!(matches!(err, StackApiError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_env_vars_string_returns_contents() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stacks/uid-1/environments.json"))
        .and(query_param("environments_format", "dotenv"))
        .and(query_param("requested_types", "custom,generated"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "contents": "RAILS_ENV=production\n" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = StackClient::new("test-token", &mock_server.uri()).unwrap();
    let contents = env_vars_string(&client, "uid-1", "dotenv", &["custom", "generated"])
        .await
        .unwrap();

    assert_eq!(contents, "RAILS_ENV=production\n");
}

#[tokio::test]
async fn test_set_env_var_puts_value_and_strategy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/stacks/uid-1/environments/RAILS_ENV.json"))
        .and(body_json(json!({ "value": "staging", "apply_strategy": "immediately" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(action(3)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = StackClient::new("test-token", &mock_server.uri()).unwrap();
    let result = set_env_var(&client, "uid-1", "RAILS_ENV", "staging", "immediately")
        .await
        .unwrap();

    assert_eq!(result.id, 3);
}

#[tokio::test]
async fn test_upload_env_vars_uses_selected_method() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/stacks/uid-1/environments/bulk.json"))
        .and(body_json(json!({
            "environments_format": "dotenv",
            "contents": "A=1\n",
            "apply_strategy": "deployment"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(action(4)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/stacks/uid-1/environments/bulk.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(action(5)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = StackClient::new("test-token", &mock_server.uri()).unwrap();
    let patched = upload_env_vars(
        &client,
        "uid-1",
        "dotenv",
        "A=1\n",
        "deployment",
        UploadMode::Patch,
    )
    .await
    .unwrap();
    let replaced = upload_env_vars(
        &client,
        "uid-1",
        "dotenv",
        "A=1\n",
        "deployment",
        UploadMode::Replace,
    )
    .await
    .unwrap();

    assert_eq!(patched.id, 4);
    assert_eq!(replaced.id, 5);
}

#[tokio::test]
async fn test_redeploy_sends_params_and_user_reference() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/stacks/uid-1/deployments.json"))
        .and(query_param("user_reference", "release-7"))
        .and(body_json(json!({
            "git_ref": "v7",
            "deploy_strategy": "serial",
            "rollout_strategy": "canary",
            "canary_percentage": 20,
            "deployment_profile": "",
            "services": ["web"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "ok": true, "message": "queued", "queued": true, "async_action_id": 77 }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = StackClient::new("test-token", &mock_server.uri()).unwrap();
    let params = RedeployParams {
        git_ref: "v7".to_string(),
        deploy_strategy: "serial".to_string(),
        rollout_strategy: Some("canary".to_string()),
        canary_percentage: Some(20),
        services: vec!["web".to_string()],
        ..Default::default()
    };
    let response = redeploy_stack(&client, "uid-1", &params, Some("release-7"))
        .await
        .unwrap();

    assert!(response.ok);
    assert!(response.queued);
    assert_eq!(response.async_action_id, Some(77));
}

#[tokio::test]
async fn test_db_action_omits_missing_db_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/stacks/uid-1/actions.json"))
        .and(body_json(json!({ "command": "backup", "server_uid": "srv-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(action(8)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = StackClient::new("test-token", &mock_server.uri()).unwrap();
    let result = invoke_db_stack_action(&client, "uid-1", "srv-1", None, "backup")
        .await
        .unwrap();

    assert_eq!(result.id, 8);
}

#[tokio::test]
async fn test_invoke_stack_action_and_reboot() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/stacks/uid-1/actions.json"))
        .and(body_json(json!({ "command": "clear_caches" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(action(9)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/stacks/uid-1/reboot_servers.json"))
        .and(body_json(json!({ "strategy": "serial", "group": "web" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(action(10)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = StackClient::new("test-token", &mock_server.uri()).unwrap();
    let invoked = invoke_stack_action(&client, "uid-1", "clear_caches").await.unwrap();
    let rebooted = reboot_stack(&client, "uid-1", "serial", "web").await.unwrap();

    assert_eq!(invoked.id, 9);
    assert_eq!(rebooted.id, 10);
}

#[tokio::test]
async fn test_create_stack_flattens_target_options() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/stacks"))
        .and(body_json(json!({
            "name": "shop",
            "environment": "production",
            "service_yaml": "services: {}",
            "manifest_yaml": "",
            "cloud": "aws",
            "key_name": "default",
            "region": "eu-west-1",
            "size": "t3.small",
            "build_type": "multi"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(action(12)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = StackClient::new("test-token", &mock_server.uri()).unwrap();
    let target = TargetOptions {
        cloud: "aws".to_string(),
        key_name: "default".to_string(),
        region: "eu-west-1".to_string(),
        size: "t3.small".to_string(),
        build_type: "multi".to_string(),
    };
    let result = create_stack(&client, "shop", "production", "services: {}", "", &target)
        .await
        .unwrap();

    assert_eq!(result.id, 12);
}
