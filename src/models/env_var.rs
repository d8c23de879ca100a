//! Stack environment variables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::client::{segment, StackClient};
use crate::error::{Result, StackApiError};
use crate::models::action::AsyncResult;
use crate::pagination::Page;
use crate::traits::{List, Update};

/// Export format that has no string rendition.
const API_FORMAT: &str = "api";

/// One prior value of an environment variable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StackEnvVarHistory {
    pub value: serde_json::Value,
    #[serde(rename = "created_at_iso")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updated_at_iso")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// An environment variable scoped to a stack.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StackEnvVar {
    #[serde_as(as = "DefaultOnNull")]
    pub key: String,
    pub value: serde_json::Value,
    #[serde_as(as = "DefaultOnNull")]
    pub readonly: bool,
    #[serde(rename = "created_at_iso")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updated_at_iso")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Prior values, oldest first as sent by the server.
    #[serde_as(as = "DefaultOnNull")]
    pub history: Vec<StackEnvVarHistory>,
}

impl StackEnvVar {
    /// The value rendered as plain text: strings unquoted, everything else
    /// as JSON.
    pub fn value_string(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Body for setting a single environment variable.
#[derive(Debug, Clone, Serialize)]
pub struct EnvVarParams {
    pub value: String,
    /// Server-defined rollout policy for the change.
    pub apply_strategy: String,
}

/// Whether a bulk upload replaces the variable set or patches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadMode {
    /// Replace the stack's variables (POST).
    #[default]
    Replace,
    /// Merge into the stack's variables (PATCH).
    Patch,
}

impl UploadMode {
    fn method(self) -> Method {
        match self {
            Self::Replace => Method::POST,
            Self::Patch => Method::PATCH,
        }
    }
}

#[async_trait]
impl List for StackEnvVar {
    type Query = String; // Stack uid

    #[tracing::instrument(skip(client))]
    async fn list_page(client: &StackClient, stack_uid: &String, page: u32) -> Result<Page<Self>> {
        let path = format!("stacks/{}/environments.json", segment(stack_uid));
        let response = client.get_with_query(&path, &[("page", page)]).await?;
        let (env_vars, pagination) = StackClient::decode_page(response).await?;
        Ok(Page::new(env_vars, pagination))
    }
}

#[async_trait]
impl Update for StackEnvVar {
    type Id = (String, String); // (stack_uid, key)
    type Params = EnvVarParams;
    type Output = AsyncResult;

    #[tracing::instrument(skip(client))]
    async fn update(client: &StackClient, id: Self::Id, params: EnvVarParams) -> Result<AsyncResult> {
        let (stack_uid, key) = id;
        let path = format!(
            "stacks/{}/environments/{}.json",
            segment(&stack_uid),
            segment(&key)
        );
        let response = client.put(&path, &params).await?;
        StackClient::decode(response).await
    }
}

/// Fetch every environment variable of a stack.
pub async fn get_stack_env_vars(client: &StackClient, stack_uid: &str) -> Result<Vec<StackEnvVar>> {
    StackEnvVar::list_all(client, &stack_uid.to_string()).await
}

/// Fetch a stack's environment variables rendered in `format` (for example
/// `dotenv`, `json` or `yaml`), restricted to `requested_types`.
///
/// # Errors
///
/// Returns [`StackApiError::InvalidArgument`] without sending a request when
/// `format` is `"api"`, which has no string rendition.
#[tracing::instrument(skip(client))]
pub async fn env_vars_string(
    client: &StackClient,
    stack_uid: &str,
    format: &str,
    requested_types: &[&str],
) -> Result<String> {
    if format == API_FORMAT {
        return Err(StackApiError::InvalidArgument(
            "API format of environment variables does not return a string".to_string(),
        ));
    }

    #[derive(Serialize)]
    struct Params<'a> {
        page: u32,
        environments_format: &'a str,
        requested_types: String,
    }

    #[derive(Deserialize)]
    struct Contents {
        #[serde(default)]
        contents: String,
    }

    let params = Params {
        page: 1,
        environments_format: format,
        requested_types: requested_types.join(","),
    };
    let path = format!("stacks/{}/environments.json", segment(stack_uid));
    let response = client.get_with_query(&path, &params).await?;
    let body: Contents = StackClient::decode(response).await?;
    Ok(body.contents)
}

/// Create a new environment variable.
#[tracing::instrument(skip(client, value))]
pub async fn new_env_var(
    client: &StackClient,
    stack_uid: &str,
    key: &str,
    value: &str,
    apply_strategy: &str,
) -> Result<AsyncResult> {
    #[derive(Serialize)]
    struct Params<'a> {
        key: &'a str,
        value: &'a str,
        apply_strategy: &'a str,
    }

    let params = Params {
        key,
        value,
        apply_strategy,
    };
    let path = format!("stacks/{}/environments.json", segment(stack_uid));
    let response = client.post(&path, &params).await?;
    StackClient::decode(response).await
}

/// Change the value of an existing environment variable.
pub async fn set_env_var(
    client: &StackClient,
    stack_uid: &str,
    key: &str,
    value: &str,
    apply_strategy: &str,
) -> Result<AsyncResult> {
    let params = EnvVarParams {
        value: value.to_string(),
        apply_strategy: apply_strategy.to_string(),
    };
    StackEnvVar::update(client, (stack_uid.to_string(), key.to_string()), params).await
}

/// Upload a whole set of environment variables in `format`.
#[tracing::instrument(skip(client, contents))]
pub async fn upload_env_vars(
    client: &StackClient,
    stack_uid: &str,
    format: &str,
    contents: &str,
    apply_strategy: &str,
    mode: UploadMode,
) -> Result<AsyncResult> {
    #[derive(Serialize)]
    struct Params<'a> {
        environments_format: &'a str,
        contents: &'a str,
        apply_strategy: &'a str,
    }

    let params = Params {
        environments_format: format,
        contents,
        apply_strategy,
    };
    let path = format!("stacks/{}/environments/bulk.json", segment(stack_uid));
    let response = client.send_json(mode.method(), &path, &params).await?;
    StackClient::decode(response).await
}
