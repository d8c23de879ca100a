//! Temporary firewall leases.

use serde::{Deserialize, Serialize};

use crate::client::{segment, StackClient};
use crate::error::Result;
use crate::models::action::{wait_stack_async_action, AsyncResult, GenericResponse, WaitConfig};

/// Source address placeholder asking the server to use the caller's address.
pub const DEFAULT_FROM_IP: &str = "AUTO";
/// Lease lifetime in minutes.
pub const DEFAULT_TTL: u32 = 20;
pub const DEFAULT_PORT: u16 = 22;

/// Caller-facing lease options. `None` means "use the default".
///
/// | field        | default  |
/// |--------------|----------|
/// | `from_ip`    | `"AUTO"` |
/// | `ttl`        | `20`     |
/// | `port`       | `22`     |
/// | `server_uid` | `""` (all servers) |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaseOptions {
    pub from_ip: Option<String>,
    pub ttl: Option<u32>,
    pub port: Option<u16>,
    pub server_uid: Option<String>,
}

/// Fully resolved lease request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseParams {
    pub ttl: u32,
    pub from_ip: String,
    pub port: u16,
    pub server_id: String,
}

impl LeaseOptions {
    /// Substitute defaults for every unset option.
    pub fn resolve(&self) -> LeaseParams {
        LeaseParams {
            ttl: self.ttl.unwrap_or(DEFAULT_TTL),
            from_ip: self
                .from_ip
                .clone()
                .unwrap_or_else(|| DEFAULT_FROM_IP.to_string()),
            port: self.port.unwrap_or(DEFAULT_PORT),
            server_id: self.server_uid.clone().unwrap_or_default(),
        }
    }
}

/// Open a temporary firewall lease on a stack.
#[tracing::instrument(skip(client))]
pub async fn lease(client: &StackClient, stack_uid: &str, options: &LeaseOptions) -> Result<AsyncResult> {
    let path = format!("stacks/{}/firewalls.json", segment(stack_uid));
    let response = client.post(&path, &options.resolve()).await?;
    StackClient::decode(response).await
}

/// Open a lease and wait for it to settle with the default poll settings
/// (every 2 seconds, for up to 5 minutes).
pub async fn lease_sync(
    client: &StackClient,
    stack_uid: &str,
    options: &LeaseOptions,
) -> Result<GenericResponse> {
    lease_sync_with(client, stack_uid, options, WaitConfig::default()).await
}

/// Open a lease and wait for it to settle.
///
/// Nothing is polled if opening the lease fails.
pub async fn lease_sync_with(
    client: &StackClient,
    stack_uid: &str,
    options: &LeaseOptions,
    wait: WaitConfig,
) -> Result<GenericResponse> {
    let action = lease(client, stack_uid, options).await?;
    wait_stack_async_action(client, stack_uid, action.id, wait).await
}
