//! List trait for fetching collections of entities.

use async_trait::async_trait;

use crate::client::StackClient;
use crate::error::{Result, StackApiError};
use crate::pagination::Page;

/// Maximum pages to fetch before giving up on a cursor that never ends.
pub const MAX_PAGES: u32 = 1000;

/// List entities behind a server-paginated endpoint.
///
/// Implement this trait for entity types that can be listed. Only
/// [`List::list_page`] is required; [`List::list_all`] follows the server's
/// page cursor.
///
/// # Example
///
/// ```ignore
/// use stackapi::{StackClient, Stack, List};
///
/// let client = StackClient::from_env()?;
///
/// // Fetch a single page
/// let page = Stack::list_page(&client, &Default::default(), 1).await?;
///
/// // Fetch all pages
/// let all_stacks = Stack::list_all(&client, &Default::default()).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Query parameters selecting and filtering the collection.
    type Query: Send + Sync;

    /// Fetch one page of entities.
    ///
    /// # Arguments
    ///
    /// * `client` - The stack API client
    /// * `query` - Query parameters for filtering
    /// * `page` - Page number (1-indexed)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(client: &StackClient, query: &Self::Query, page: u32) -> Result<Page<Self>>;

    /// Fetch every entity matching the query, following the page cursor.
    ///
    /// Starts at page 1 and keeps requesting the cursor's `next` page while
    /// it is ahead of `current`. Items keep server order across pages.
    ///
    /// # Errors
    ///
    /// Returns the first request error, discarding the pages already
    /// fetched, or [`StackApiError::PaginationLimit`] if the cursor is still
    /// advancing after [`MAX_PAGES`] pages.
    async fn list_all(client: &StackClient, query: &Self::Query) -> Result<Vec<Self>> {
        let mut all_items = Vec::new();
        let mut page = 1;
        let mut fetched = 0;

        loop {
            let result = Self::list_page(client, query, page).await?;
            fetched += 1;
            tracing::debug!(page, items = result.len(), "fetched page");

            let next = result.next_page();
            all_items.extend(result.items);

            match next {
                Some(_) if fetched >= MAX_PAGES => {
                    tracing::warn!("Reached pagination limit of {} pages", MAX_PAGES);
                    return Err(StackApiError::PaginationLimit { pages: MAX_PAGES });
                }
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(all_items)
    }
}
