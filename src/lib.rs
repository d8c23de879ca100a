//! Stack management API client library.
//!
//! A Rust library for a platform-management REST API: stacks, their
//! settings, environment variables, backups, deployments and firewall
//! leases. Operations are defined as traits (Get, List, Update) that entity
//! types implement, plus free functions for the calls that do not fit a
//! trait.
//!
//! # Quick Start
//!
//! ```no_run
//! use stackapi::{StackClient, LeaseOptions};
//!
//! #[tokio::main]
//! async fn main() -> stackapi::Result<()> {
//!     // Create client from environment variables
//!     let client = StackClient::from_env()?;
//!
//!     // List every stack, following pagination
//!     let stacks = stackapi::list_stacks(&client).await?;
//!     println!("Found {} stacks", stacks.len());
//!
//!     // Resolve a stack by name and read its settings
//!     let stack = stackapi::find_stack_by_name(&client, "my-app", "production").await?;
//!     let settings = stackapi::get_stack_settings(&client, &stack.uid).await?;
//!     println!("{} has {} settings", stack.name, settings.len());
//!
//!     // Open SSH for 20 minutes and wait until the lease is in place
//!     let outcome = stackapi::lease_sync(&client, &stack.uid, &LeaseOptions::default()).await?;
//!     println!("Lease: {}", outcome.message);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Get`] - Fetch a single entity by ID
//! - [`List`] - Fetch server-paginated collections of entities
//! - [`Update`] - Modify an existing entity
//!
//! Mutating calls return an [`AsyncResult`] whose id can be handed to
//! [`wait_stack_async_action`].
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `STACKAPI_TOKEN` (required) - API access token
//! - `STACKAPI_URL` (optional) - Base URL (defaults to `https://app.cloud66.com/api/3`)

pub mod cli;
mod client;
mod error;
mod models;
mod output;
mod pagination;
mod traits;

// Re-export core types
pub use client::StackClient;
pub use error::{Result, StackApiError};
pub use output::PrettyPrint;
pub use pagination::{Page, Pagination};

// Re-export traits
pub use traits::{Get, List, Update, MAX_PAGES};

// Re-export models
pub use models::{
    // Stack types
    health_label,
    status_label,
    Framework,
    Stack,
    StackListQuery,
    TargetOptions,
    // Action types
    ActionListQuery,
    ActionQuery,
    AsyncResult,
    GenericResponse,
    StackAction,
    WaitConfig,
    // Setting and environment variable types
    EnvVarParams,
    StackEnvVar,
    StackEnvVarHistory,
    StackSetting,
    UploadMode,
    // Backup, deployment and firewall types
    LeaseOptions,
    LeaseParams,
    ManagedBackup,
    RedeployParams,
    RedeployResponse,
};

// Re-export convenience functions
pub use models::{
    create_stack, find_stack_by_name, find_stack_by_uid, list_stacks, list_stacks_remote_filter,
    list_stacks_with_filter, stack_info, stack_info_with_environment,
};
pub use models::{
    invoke_db_stack_action, invoke_stack_action, list_stack_actions, wait_stack_async_action,
};
pub use models::{
    env_vars_string, get_stack_env_vars, get_stack_settings, new_env_var, set_env_var,
    set_setting, setting_path_key, upload_env_vars,
};
pub use models::{get_managed_backups, lease, lease_sync, lease_sync_with, reboot_stack, redeploy_stack};
pub use models::{DEFAULT_FROM_IP, DEFAULT_PORT, DEFAULT_TTL, HIDDEN_VALUE};
