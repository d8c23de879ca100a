//! Error types for stack API operations.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during stack API operations.
#[derive(Debug, Error)]
pub enum StackApiError {
    /// Configuration is missing or incomplete.
    #[error("stack API configuration required: {0}")]
    ConfigMissing(String),

    /// Entity not found.
    #[error("{entity_type} '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The caller asked for something the API cannot provide.
    /// Raised before any request is sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An async action did not settle before the deadline.
    #[error("Timed out after {waited:?} waiting for action {action_id}")]
    Timeout { action_id: i64, waited: Duration },

    /// Pagination did not terminate within the page limit.
    #[error("Pagination exceeded {pages} pages without reaching the last page")]
    PaginationLimit { pages: u32 },

    /// API request failed.
    #[error("Stack API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },
}

impl StackApiError {
    /// Returns true for the "no such entity" family of errors, including a
    /// 404 reported by the server.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::ApiError { status_code, .. } => *status_code == Some(404),
            _ => false,
        }
    }
}

/// Result type alias for stack API operations.
pub type Result<T> = core::result::Result<T, StackApiError>;
