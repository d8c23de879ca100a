//! Stack model, status vocabularies and stack-level operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::client::{segment, StackClient};
use crate::error::{Result, StackApiError};
use crate::models::action::AsyncResult;
use crate::pagination::Page;
use crate::traits::{Get, List};

/// A deployable application or environment unit.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Stack {
    /// Unique stack identifier.
    #[serde_as(as = "DefaultOnNull")]
    pub uid: String,
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    /// Source repository URL.
    #[serde_as(as = "DefaultOnNull")]
    pub git: String,
    #[serde_as(as = "DefaultOnNull")]
    pub git_branch: String,
    #[serde_as(as = "DefaultOnNull")]
    pub environment: String,
    #[serde_as(as = "DefaultOnNull")]
    pub cloud: String,
    #[serde_as(as = "DefaultOnNull")]
    pub fqdn: String,
    #[serde_as(as = "DefaultOnNull")]
    pub language: String,
    /// Framework tag; `"skycap"` selects the build status vocabulary.
    #[serde_as(as = "DefaultOnNull")]
    pub framework: String,
    /// Raw status code, see [`Stack::status`].
    #[serde(rename = "status")]
    #[serde_as(as = "DefaultOnNull")]
    pub status_code: i32,
    /// Raw health code, see [`Stack::health`].
    #[serde(rename = "health")]
    #[serde_as(as = "DefaultOnNull")]
    pub health_code: i32,
    #[serde_as(as = "DefaultOnNull")]
    pub maintenance_mode: bool,
    #[serde(rename = "has_loadbalancer")]
    #[serde_as(as = "DefaultOnNull")]
    pub has_load_balancer: bool,
    pub redeploy_hook: Option<String>,
    #[serde(rename = "last_activity_iso")]
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(rename = "updated_at_iso")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "created_at_iso")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "deploy_directory")]
    #[serde_as(as = "DefaultOnNull")]
    pub deploy_dir: String,
    #[serde_as(as = "DefaultOnNull")]
    pub backend: String,
    #[serde_as(as = "DefaultOnNull")]
    pub version: String,
    #[serde_as(as = "DefaultOnNull")]
    pub revision: String,
    #[serde_as(as = "DefaultOnNull")]
    pub namespaces: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub account_id: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub account_name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub is_cluster: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub is_inside_cluster: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub cluster_name: String,
    pub application_address: Option<String>,
    #[serde(rename = "configstore_namespace")]
    #[serde_as(as = "DefaultOnNull")]
    pub config_store_namespace: String,
}

/// Product mode of a stack, selecting which status vocabulary applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framework {
    /// Regular deployed stacks.
    Standard,
    /// Build-only stacks.
    Skycap,
}

impl Framework {
    /// Classify a wire framework tag.
    pub fn from_tag(tag: &str) -> Self {
        if tag == "skycap" {
            Self::Skycap
        } else {
            Self::Standard
        }
    }
}

/// Human-readable label for a stack status code.
///
/// Unknown codes map to the empty string.
pub const fn status_label(code: i32, framework: Framework) -> &'static str {
    match framework {
        Framework::Standard => match code {
            0 => "Pending analysis",
            1 => "Deployed successfully",
            2 => "Deployment failed",
            3 => "Analyzing",
            4 => "Analyzed",
            5 => "Queued for deployment",
            6 => "Deploying",
            7 => "Unable to analyze",
            _ => "",
        },
        Framework::Skycap => match code {
            0 => "Pending analysis",
            1 => "Built successfully",
            2 => "Build failed",
            3 => "Analyzing",
            4 => "Analyzed",
            5 => "Queued for build",
            6 => "Building",
            7 => "Unable to analyze",
            _ => "",
        },
    }
}

/// Human-readable label for a stack health code.
///
/// Unknown codes map to the empty string.
pub const fn health_label(code: i32) -> &'static str {
    match code {
        0 => "Unknown",
        1 => "Building",
        2 => "Impaired",
        3 => "Healthy",
        4 => "Failed",
        _ => "",
    }
}

impl Stack {
    pub fn framework_kind(&self) -> Framework {
        Framework::from_tag(&self.framework)
    }

    /// Status label in the vocabulary of this stack's framework.
    pub fn status(&self) -> &'static str {
        status_label(self.status_code, self.framework_kind())
    }

    pub fn health(&self) -> &'static str {
        health_label(self.health_code)
    }

    /// The primary namespace, if the stack has any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespaces.first().map(String::as_str)
    }

    /// Whether this stack answers to `name` within `environment`.
    ///
    /// Names compare case-insensitively. An empty environment on either
    /// side matches any environment.
    pub fn matches_name(&self, name: &str, environment: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
            && (environment.is_empty()
                || self.environment.is_empty()
                || self.environment == environment)
    }
}

/// Server-side filters for listing stacks.
///
/// Matching happens remotely; unset filters are left out of the query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StackListQuery {
    #[serde(rename = "filter_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "filter_environment", skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    #[serde(rename = "filter_git_repo", skip_serializing_if = "Option::is_none")]
    pub git_repo: Option<String>,

    #[serde(rename = "filter_git_branch", skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
}

/// Target infrastructure for a new stack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetOptions {
    pub cloud: String,
    pub key_name: String,
    pub region: String,
    pub size: String,
    pub build_type: String,
}

#[async_trait]
impl Get for Stack {
    type Id = String; // Stack uid

    #[tracing::instrument(skip(client))]
    async fn get(client: &StackClient, uid: String) -> Result<Self> {
        let path = format!("stacks/{}.json", segment(&uid));
        let response = client.get(&path).await?;
        StackClient::decode(response).await
    }
}

#[async_trait]
impl List for Stack {
    type Query = StackListQuery;

    #[tracing::instrument(skip(client))]
    async fn list_page(client: &StackClient, query: &Self::Query, page: u32) -> Result<Page<Self>> {
        #[derive(Serialize)]
        struct RequestParams<'a> {
            #[serde(flatten)]
            query: &'a StackListQuery,
            page: u32,
        }

        let params = RequestParams { query, page };

        let response = client.get_with_query("stacks.json", &params).await?;
        let (stacks, pagination) = StackClient::decode_page(response).await?;
        Ok(Page::new(stacks, pagination))
    }
}

// Convenience functions for working with stacks

/// Fetch every stack visible to the caller.
pub async fn list_stacks(client: &StackClient) -> Result<Vec<Stack>> {
    Stack::list_all(client, &StackListQuery::default()).await
}

/// Fetch the stacks matching the given filters, evaluated by the server.
///
/// Empty filters are sent as empty values, which the server treats as
/// "match anything".
///
/// # Example
///
/// ```ignore
/// let stacks = list_stacks_remote_filter(&client, "web", "production", "", "main").await?;
/// ```
pub async fn list_stacks_remote_filter(
    client: &StackClient,
    name: &str,
    environment: &str,
    git_repo: &str,
    git_branch: &str,
) -> Result<Vec<Stack>> {
    let query = StackListQuery {
        name: Some(name.to_string()),
        environment: Some(environment.to_string()),
        git_repo: Some(git_repo.to_string()),
        git_branch: Some(git_branch.to_string()),
    };
    Stack::list_all(client, &query).await
}

/// Fetch every stack, then keep the ones `predicate` accepts.
///
/// The predicate sees each stack once, in server order, along with the
/// caller's environment context.
pub async fn list_stacks_with_filter<F>(
    client: &StackClient,
    predicate: F,
    environment: Option<&str>,
) -> Result<Vec<Stack>>
where
    F: Fn(&Stack, Option<&str>) -> bool,
{
    let stacks = list_stacks(client).await?;
    Ok(stacks
        .into_iter()
        .filter(|stack| predicate(stack, environment))
        .collect())
}

/// Find the first stack named `name` (case-insensitive) in `environment`.
///
/// Pass an empty environment to accept any environment.
///
/// # Errors
///
/// Returns [`StackApiError::NotFound`] when no stack matches.
#[tracing::instrument(skip(client))]
pub async fn find_stack_by_name(
    client: &StackClient,
    name: &str,
    environment: &str,
) -> Result<Stack> {
    list_stacks(client)
        .await?
        .into_iter()
        .find(|stack| stack.matches_name(name, environment))
        .ok_or_else(|| StackApiError::NotFound {
            entity_type: "Stack",
            id: name.to_string(),
        })
}

/// Fetch a stack by uid.
pub async fn find_stack_by_uid(client: &StackClient, uid: &str) -> Result<Stack> {
    Stack::get(client, uid.to_string()).await
}

/// Resolve a stack by name and return its full, freshly fetched record.
pub async fn stack_info(client: &StackClient, name: &str) -> Result<Stack> {
    stack_info_with_environment(client, name, "").await
}

/// Resolve a stack by name within an environment and return its full record.
pub async fn stack_info_with_environment(
    client: &StackClient,
    name: &str,
    environment: &str,
) -> Result<Stack> {
    let stack = find_stack_by_name(client, name, environment).await?;
    find_stack_by_uid(client, &stack.uid).await
}

/// Create a new stack from service and manifest definitions.
#[tracing::instrument(skip(client, service_yaml, manifest_yaml))]
pub async fn create_stack(
    client: &StackClient,
    name: &str,
    environment: &str,
    service_yaml: &str,
    manifest_yaml: &str,
    target: &TargetOptions,
) -> Result<AsyncResult> {
    #[derive(Serialize)]
    struct Params<'a> {
        name: &'a str,
        environment: &'a str,
        service_yaml: &'a str,
        manifest_yaml: &'a str,
        #[serde(flatten)]
        target: &'a TargetOptions,
    }

    let params = Params {
        name,
        environment,
        service_yaml,
        manifest_yaml,
        target,
    };
    let response = client.post("stacks", &params).await?;
    StackClient::decode(response).await
}
