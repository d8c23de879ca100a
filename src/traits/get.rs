//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::StackClient;
use crate::error::Result;

/// Fetch a single entity by ID.
///
/// # Example
///
/// ```ignore
/// use stackapi::{StackClient, Stack, Get};
///
/// let client = StackClient::from_env()?;
/// let stack = Stack::get(&client, "5999b763474b0eafa5fafb64bff0ba80".to_string()).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this entity (a stack uid, or a uid plus a child id).
    type Id;

    /// Fetch the entity by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn get(client: &StackClient, id: Self::Id) -> Result<Self>;
}
