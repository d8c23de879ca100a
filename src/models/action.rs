//! Stack actions, async action handles and the wait-for-settlement poller.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use tokio::time::{sleep, Instant};

use crate::client::{segment, StackClient};
use crate::error::{Result, StackApiError};
use crate::pagination::Page;
use crate::traits::{Get, List};

/// A past or in-flight operation on a stack.
///
/// Timestamps are passed through as the server formats them.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StackAction {
    #[serde_as(as = "DefaultOnNull")]
    pub id: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub action: String,
    #[serde_as(as = "DefaultOnNull")]
    pub started_at: String,
    #[serde_as(as = "DefaultOnNull")]
    pub finished_at: String,
    #[serde_as(as = "DefaultOnNull")]
    pub finished_success: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub finished_message: String,
    #[serde_as(as = "DefaultOnNull")]
    pub metadata: HashMap<String, String>,
}

/// Handle to a server-side operation that completes after the initiating
/// request returns.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AsyncResult {
    /// Action id used to poll for completion.
    #[serde_as(as = "DefaultOnNull")]
    pub id: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub user: String,
    #[serde_as(as = "DefaultOnNull")]
    pub resource_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub resource_id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub action: String,
    #[serde_as(as = "DefaultOnNull")]
    pub started_via: String,
    pub started_at: Option<DateTime<Utc>>,
    /// Set once the action has settled.
    pub finished_at: Option<DateTime<Utc>>,
    pub finished_success: Option<bool>,
    #[serde_as(as = "DefaultOnNull")]
    pub finished_message: String,
    pub finished_result: Option<serde_json::Value>,
}

impl AsyncResult {
    /// Whether the action has settled, successfully or not.
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}

/// Terminal outcome of an async action.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericResponse {
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub ok: bool,
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub message: String,
}

impl From<&AsyncResult> for GenericResponse {
    fn from(action: &AsyncResult) -> Self {
        Self {
            ok: action.finished_success.unwrap_or(false),
            message: action.finished_message.clone(),
        }
    }
}

/// Filters for listing stack actions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActionListQuery {
    /// Only actions started with this caller-supplied reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_reference: Option<String>,
}

/// Query type for action listing (includes stack uid).
pub type ActionQuery = (String, ActionListQuery);

#[async_trait]
impl List for StackAction {
    type Query = ActionQuery; // (stack_uid, filters)

    #[tracing::instrument(skip(client))]
    async fn list_page(client: &StackClient, query: &Self::Query, page: u32) -> Result<Page<Self>> {
        #[derive(Serialize)]
        struct RequestParams<'a> {
            #[serde(flatten)]
            filters: &'a ActionListQuery,
            page: u32,
        }

        let (stack_uid, filters) = query;
        let path = format!("stacks/{}/actions.json", segment(stack_uid));
        let params = RequestParams { filters, page };

        let response = client.get_with_query(&path, &params).await?;
        let (actions, pagination) = StackClient::decode_page(response).await?;
        Ok(Page::new(actions, pagination))
    }
}

#[async_trait]
impl Get for AsyncResult {
    type Id = (String, i64); // (stack_uid, action_id)

    #[tracing::instrument(skip(client))]
    async fn get(client: &StackClient, id: Self::Id) -> Result<Self> {
        let (stack_uid, action_id) = id;
        let path = format!("stacks/{}/actions/{}.json", segment(&stack_uid), action_id);
        let response = client.get(&path).await?;
        StackClient::decode(response).await
    }
}

/// Fetch every action recorded for a stack, optionally only those started
/// with `user_reference`.
pub async fn list_stack_actions(
    client: &StackClient,
    stack_uid: &str,
    user_reference: Option<&str>,
) -> Result<Vec<StackAction>> {
    let filters = ActionListQuery {
        user_reference: user_reference.map(str::to_string),
    };
    StackAction::list_all(client, &(stack_uid.to_string(), filters)).await
}

/// Start a named action on a stack.
#[tracing::instrument(skip(client))]
pub async fn invoke_stack_action(
    client: &StackClient,
    stack_uid: &str,
    command: &str,
) -> Result<AsyncResult> {
    #[derive(Serialize)]
    struct Params<'a> {
        command: &'a str,
    }

    let path = format!("stacks/{}/actions.json", segment(stack_uid));
    let response = client.post(&path, &Params { command }).await?;
    StackClient::decode(response).await
}

/// Start a database action on one server of a stack.
///
/// `db_type` is left out of the request when `None`.
#[tracing::instrument(skip(client))]
pub async fn invoke_db_stack_action(
    client: &StackClient,
    stack_uid: &str,
    server_uid: &str,
    db_type: Option<&str>,
    command: &str,
) -> Result<AsyncResult> {
    #[derive(Serialize)]
    struct Params<'a> {
        command: &'a str,
        server_uid: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        db_type: Option<&'a str>,
    }

    let params = Params {
        command,
        server_uid,
        db_type,
    };
    let path = format!("stacks/{}/actions.json", segment(stack_uid));
    let response = client.post(&path, &params).await?;
    StackClient::decode(response).await
}

/// Poll interval and deadline for waiting on an async action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// Delay between polls. Default 2 seconds.
    pub interval: Duration,
    /// Overall deadline. Default 5 minutes.
    pub timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            timeout: Duration::from_secs(5 * 60),
        }
    }
}

/// Poll an async action until it settles or the deadline passes.
///
/// The first poll happens immediately. A settled action is returned as its
/// terminal [`GenericResponse`] whether it succeeded or failed; inspect
/// [`GenericResponse::ok`].
///
/// # Errors
///
/// Returns [`StackApiError::Timeout`] if the action is still running when
/// the next poll would fall past `wait.timeout`, or the first poll error.
#[tracing::instrument(skip(client))]
pub async fn wait_stack_async_action(
    client: &StackClient,
    stack_uid: &str,
    action_id: i64,
    wait: WaitConfig,
) -> Result<GenericResponse> {
    let started = Instant::now();
    let mut attempts = 0u32;

    loop {
        let action = AsyncResult::get(client, (stack_uid.to_string(), action_id)).await?;
        attempts += 1;

        if action.is_finished() {
            tracing::debug!(attempts, success = ?action.finished_success, "action settled");
            return Ok(GenericResponse::from(&action));
        }

        let waited = started.elapsed();
        if waited + wait.interval > wait.timeout {
            tracing::warn!(action_id, attempts, "gave up waiting for action");
            return Err(StackApiError::Timeout { action_id, waited });
        }

        tracing::debug!(attempts, "action still running");
        sleep(wait.interval).await;
    }
}
