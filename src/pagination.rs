//! Pagination utilities for stack API responses.
//!
//! List endpoints wrap their payload in an envelope carrying a page cursor:
//!
//! ```json
//! { "response": [ ... ], "pagination": { "current": 1, "next": 2, ... } }
//! ```

use serde::{Deserialize, Serialize};

/// Response envelope shared by every endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub response: T,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Page cursor returned alongside a list response.
///
/// `next` is absent, or equal to `current`, on the last page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Previous page number, if any.
    #[serde(default)]
    pub previous: Option<u32>,
    /// Next page number, if any.
    #[serde(default)]
    pub next: Option<u32>,
    /// Current page number (1-indexed).
    #[serde(default)]
    pub current: u32,
    /// Number of items per page.
    #[serde(default)]
    pub per_page: u32,
    /// Total number of items across all pages.
    #[serde(default)]
    pub count: u64,
    /// Total number of pages.
    #[serde(default)]
    pub pages: u32,
}

impl Pagination {
    /// The page to request next, if the server advertises one beyond the
    /// current page.
    ///
    /// A cursor whose `next` does not move forward is treated as the last
    /// page.
    #[must_use]
    pub fn next_page(&self) -> Option<u32> {
        self.next.filter(|&next| self.current < next)
    }

    /// Returns true if another page follows this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.next_page().is_some()
    }
}

/// A page of results from the stack API.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page, in server order.
    pub items: Vec<T>,
    /// The cursor describing this page boundary.
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Create a new page from items and the server's cursor.
    #[must_use]
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self { items, pagination }
    }

    /// The page to request after this one, if any.
    #[must_use]
    pub fn next_page(&self) -> Option<u32> {
        self.pagination.next_page()
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
