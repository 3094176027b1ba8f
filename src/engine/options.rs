//! Per-call request options and the successful response wrapper.

use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use url::Url;

/// Transport settings overridden for a single call.
#[derive(Debug, Clone, Default)]
pub struct TransportOverrides {
    /// Replaces the composed `{base_url}/{api_version}` root entirely.
    pub base_url: Option<Url>,
    /// Replaces the configured per-attempt timeout.
    pub timeout: Option<Duration>,
    /// Extra headers; these replace defaults of the same name.
    pub headers: HeaderMap,
}

/// Options for one logical request.
///
/// # Example
///
/// ```
/// use payments_client::engine::RequestOptions;
///
/// let options = RequestOptions::new()
///     .with_idempotency_key("order-42")
///     .with_expand("customer");
///
/// assert_eq!(options.idempotency_key.as_deref(), Some("order-42"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Sent as `X-Idempotency-Key` on every attempt.
    pub idempotency_key: Option<String>,
    /// Related objects to inline, sent as repeated `expand[]` parameters.
    pub expand: Vec<String>,
    /// `Some(false)` disables automatic retries for this call.
    pub retryable: Option<bool>,
    /// Transport-level overrides.
    pub overrides: TransportOverrides,
}

impl RequestOptions {
    /// Options with nothing set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the idempotency key.
    #[must_use]
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Adds one field to expand.
    #[must_use]
    pub fn with_expand(mut self, field: impl Into<String>) -> Self {
        self.expand.push(field.into());
        self
    }

    /// Marks the call as retryable or not.
    #[must_use]
    pub const fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = Some(retryable);
        self
    }

    /// Sends this call to a different root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.overrides.base_url = Some(base_url);
        self
    }

    /// Uses a different per-attempt timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.overrides.timeout = Some(timeout);
        self
    }

    /// Adds a header, replacing any default of the same name.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.overrides.headers.insert(name, value);
        self
    }
}

/// A decoded 2xx response.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// Decoded body
    pub data: T,
    /// HTTP status
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Request identifier assigned by the API
    pub request_id: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Discards the metadata.
    pub fn into_data(self) -> T {
        self.data
    }

    /// Transforms the decoded body, keeping the metadata.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            data: f(self.data),
            status: self.status,
            headers: self.headers,
            request_id: self.request_id,
        }
    }
}
