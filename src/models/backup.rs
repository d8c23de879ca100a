//! Managed database backups.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::client::{segment, StackClient};
use crate::error::Result;
use crate::pagination::Page;
use crate::traits::List;

/// A database backup taken by the platform.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagedBackup {
    #[serde_as(as = "DefaultOnNull")]
    pub id: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub server_uid: String,
    #[serde_as(as = "DefaultOnNull")]
    pub server_name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub db_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub database_name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub file_base: String,
    #[serde(rename = "backup_date_iso")]
    pub backup_date: Option<DateTime<Utc>>,
    #[serde_as(as = "DefaultOnNull")]
    pub backup_status: i32,
    #[serde_as(as = "DefaultOnNull")]
    pub backup_result: String,
    #[serde_as(as = "DefaultOnNull")]
    pub restore_status: i32,
    #[serde_as(as = "DefaultOnNull")]
    pub restore_result: String,
    #[serde_as(as = "DefaultOnNull")]
    pub verify_status: i32,
    #[serde_as(as = "DefaultOnNull")]
    pub verify_result: String,
    #[serde_as(as = "DefaultOnNull")]
    pub storage_path: String,
    #[serde_as(as = "DefaultOnNull")]
    pub skip_tables: String,
    #[serde_as(as = "DefaultOnNull")]
    pub backup_size: i64,
}

impl ManagedBackup {
    /// Whether the backup finished without error (status 1).
    pub fn succeeded(&self) -> bool {
        self.backup_status == 1
    }
}

#[async_trait]
impl List for ManagedBackup {
    type Query = String; // Stack uid

    #[tracing::instrument(skip(client))]
    async fn list_page(client: &StackClient, stack_uid: &String, page: u32) -> Result<Page<Self>> {
        let path = format!("stacks/{}/backups.json", segment(stack_uid));
        let response = client.get_with_query(&path, &[("page", page)]).await?;
        let (backups, pagination) = StackClient::decode_page(response).await?;
        Ok(Page::new(backups, pagination))
    }
}

/// Fetch every managed backup of a stack.
pub async fn get_managed_backups(client: &StackClient, stack_uid: &str) -> Result<Vec<ManagedBackup>> {
    ManagedBackup::list_all(client, &stack_uid.to_string()).await
}
