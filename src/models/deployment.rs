//! Redeployments and server reboots.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::client::{segment, StackClient};
use crate::error::Result;
use crate::models::action::AsyncResult;

/// Server reply to a redeploy request.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RedeployResponse {
    #[serde_as(as = "DefaultOnNull")]
    pub ok: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub message: String,
    /// True when the deployment was queued behind a running one.
    #[serde_as(as = "DefaultOnNull")]
    pub queued: bool,
    pub async_action_id: Option<i64>,
}

/// Body of a redeploy request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RedeployParams {
    pub git_ref: String,
    pub deploy_strategy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollout_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canary_percentage: Option<u8>,
    pub deployment_profile: String,
    /// Restrict the deployment to these services; empty means all.
    pub services: Vec<String>,
}

/// Trigger a redeployment of a stack.
#[tracing::instrument(skip(client))]
pub async fn redeploy_stack(
    client: &StackClient,
    stack_uid: &str,
    params: &RedeployParams,
    user_reference: Option<&str>,
) -> Result<RedeployResponse> {
    #[derive(Serialize)]
    struct Query<'a> {
        #[serde(skip_serializing_if = "Option::is_none")]
        user_reference: Option<&'a str>,
    }

    let path = format!("stacks/{}/deployments.json", segment(stack_uid));
    let response = client
        .post_with_query(&path, params, &Query { user_reference })
        .await?;
    StackClient::decode(response).await
}

/// Reboot the servers of a stack.
#[tracing::instrument(skip(client))]
pub async fn reboot_stack(
    client: &StackClient,
    stack_uid: &str,
    strategy: &str,
    group: &str,
) -> Result<AsyncResult> {
    #[derive(Serialize)]
    struct Params<'a> {
        strategy: &'a str,
        group: &'a str,
    }

    let path = format!("stacks/{}/reboot_servers.json", segment(stack_uid));
    let response = client.post(&path, &Params { strategy, group }).await?;
    StackClient::decode(response).await
}
