//! Update trait for modifying entities.

use async_trait::async_trait;

use crate::client::StackClient;
use crate::error::Result;

/// Update an existing entity.
///
/// Updates on this API are applied asynchronously, so implementations return
/// whatever handle the server hands back (usually an
/// [`AsyncResult`](crate::AsyncResult)) rather than the updated entity.
///
/// # Example
///
/// ```ignore
/// use stackapi::{StackClient, StackSetting, Update};
///
/// let client = StackClient::from_env()?;
/// let action = StackSetting::update(
///     &client,
///     ("stack-uid".to_string(), "db.host".to_string()),
///     "10.0.0.5".to_string(),
/// ).await?;
/// ```
#[async_trait]
pub trait Update: Sized {
    /// The ID type for this entity.
    type Id: Send;

    /// Parameters for the update.
    type Params: Send;

    /// What the server returns for the update.
    type Output;

    /// Apply the update.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn update(client: &StackClient, id: Self::Id, params: Self::Params) -> Result<Self::Output>;
}
