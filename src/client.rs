//! Stack API client.
//!
//! Low-level HTTP client that handles authentication, raw requests and the
//! response envelope. Higher-level operations are implemented via traits and
//! functions on the model types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{Result, StackApiError};
use crate::pagination::{Envelope, Pagination};

const DEFAULT_API_URL: &str = "https://app.cloud66.com/api/3";
const USER_AGENT: &str = concat!("stackapi/", env!("CARGO_PKG_VERSION"));

/// Low-level stack API client.
///
/// Handles authentication and HTTP requests. Entity-specific operations
/// are implemented via the `Get`, `List`, and `Update` traits on model types
/// and the free functions in the models module.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use stackapi::StackClient;
///
/// # fn example() -> stackapi::Result<()> {
/// // Create from environment variables
/// let client = StackClient::from_env()?;
///
/// // Or configure manually
/// let client = StackClient::new("your-token", "https://app.cloud66.com/api/3")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct StackClient {
    http: Client,
    base_url: Arc<Url>,
    token: String,
}

impl std::fmt::Debug for StackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StackClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl StackClient {
    /// Create a client from environment variables.
    ///
    /// Uses `STACKAPI_TOKEN` for authentication and optionally `STACKAPI_URL`
    /// for the base URL (defaults to `https://app.cloud66.com/api/3`).
    ///
    /// # Errors
    ///
    /// Returns an error if `STACKAPI_TOKEN` is not set.
    pub fn from_env() -> Result<Self> {
        let token = env::var("STACKAPI_TOKEN").map_err(|_| {
            StackApiError::ConfigMissing("STACKAPI_TOKEN environment variable not set".to_string())
        })?;

        let base_url = env::var("STACKAPI_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self::new(&token, &base_url)
    }

    /// Create a new client with the provided token and base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        // Relative joins need the trailing slash
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(StackApiError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            token: token.to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Response> {
        self.execute(Method::GET, path, None::<&()>, None::<&()>).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        self.execute(Method::GET, path, None::<&()>, Some(query)).await
    }

    /// Make a PUT request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        self.execute(Method::PUT, path, Some(body), None::<&()>).await
    }

    /// Make a POST request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        self.execute(Method::POST, path, Some(body), None::<&()>).await
    }

    /// Make a POST request with JSON body and query parameters.
    #[tracing::instrument(skip(self, body, query))]
    pub async fn post_with_query<B, Q>(&self, path: &str, body: &B, query: &Q) -> Result<Response>
    where
        B: Serialize + ?Sized,
        Q: Serialize + ?Sized,
    {
        self.execute(Method::POST, path, Some(body), Some(query)).await
    }

    /// Make a request with an arbitrary method and JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Response> {
        self.execute(method, path, Some(body), None::<&()>).await
    }

    /// Decode the `response` member of an enveloped body.
    pub async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let envelope: Envelope<T> = Self::read_envelope(response).await?;
        Ok(envelope.response)
    }

    /// Decode an enveloped body together with its pagination cursor.
    ///
    /// A `null` payload decodes as the empty value, and a missing cursor as a
    /// single final page.
    pub async fn decode_page<T>(response: Response) -> Result<(T, Pagination)>
    where
        T: DeserializeOwned + Default,
    {
        let envelope: Envelope<Option<T>> = Self::read_envelope(response).await?;
        Ok((
            envelope.response.unwrap_or_default(),
            envelope.pagination.unwrap_or_default(),
        ))
    }

    async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<Envelope<T>> {
        let body = response.bytes().await.map_err(StackApiError::HttpError)?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn execute<B, Q>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: Option<&Q>,
    ) -> Result<Response>
    where
        B: Serialize + ?Sized,
        Q: Serialize + ?Sized,
    {
        let url = self.base_url.join(path)?;

        let mut request = self.http.request(method, url).bearer_auth(&self.token);
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(StackApiError::HttpError)?;

        Self::check_response(response).await
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(StackApiError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let message = Self::extract_error_message(response, status).await;
        Err(StackApiError::ApiError {
            message,
            status_code: Some(status.as_u16()),
        })
    }

    /// Extract error message from a failed response.
    async fn extract_error_message(response: Response, status: reqwest::StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            for field in ["error_description", "message", "error"] {
                if let Some(msg) = json.get(field).and_then(|m| m.as_str()) {
                    return msg.to_string();
                }
            }
        }

        if body.is_empty() {
            format!("HTTP {status}")
        } else {
            body
        }
    }
}

/// Percent-encode a single path segment (stack uid, key).
pub(crate) fn segment(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}
