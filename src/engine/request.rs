//! The request engine: request construction, dispatch, and retry loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use http::header::{ACCEPT, AUTHORIZATION, COOKIE, SET_COOKIE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::auth::{ApiKey, KeyKind};
use super::options::{ApiResponse, RequestOptions};
use super::query;
use super::retry::{AttemptFailure, RetryContext, RetryPolicy};
use crate::config::{ClientConfig, ConfigError};
use crate::error::{ApiError, ErrorType, request_id_from};
use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{HttpClient, HttpRequest, HttpResponse, ReqwestClient, TransportError};

/// Header carrying the caller's idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "x-idempotency-key";

/// Header identifying this client library.
pub const CLIENT_VERSION_HEADER: &str = "x-client-version";

/// Value of [`CLIENT_VERSION_HEADER`].
pub const CLIENT_VERSION: &str = concat!("payments-client/", env!("CARGO_PKG_VERSION"));

/// Replacement shown for sensitive header values in debug traces.
pub const REDACTED: &str = "[REDACTED]";

/// Executes authenticated API requests with retry.
///
/// One engine owns one credential and one configuration. It is `Send +
/// Sync`; share it by reference or inside an `Arc`.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation (defaults to [`ReqwestClient`])
/// - `S`: The sleeper used between retries (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```no_run
/// use payments_client::config::ClientConfig;
/// use payments_client::engine::{RequestEngine, RequestOptions};
/// use serde_json::{Value, json};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::new(Url::parse("https://api.example.com")?);
/// let engine = RequestEngine::new(config, "sk_test_123")?;
///
/// let customer = engine
///     .post::<Value>(
///         "/customers",
///         Some(json!({"email": "a@b.com"})),
///         RequestOptions::new().with_idempotency_key("signup-a@b.com"),
///     )
///     .await?;
/// println!("{}", customer.data["id"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RequestEngine<H = ReqwestClient, S = TokioSleeper> {
    client: H,
    sleeper: S,
    config: ClientConfig,
    retry_policy: RetryPolicy,
    api_key: RwLock<ApiKey>,
    debug: AtomicBool,
}

impl RequestEngine {
    /// Creates an engine backed by a default [`ReqwestClient`].
    ///
    /// # Errors
    ///
    /// Returns a `configuration_error` if the configuration or the key is
    /// invalid.
    pub fn new(config: ClientConfig, api_key: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_client(ReqwestClient::new(), config, api_key)
    }
}

impl<H> RequestEngine<H, TokioSleeper> {
    /// Creates an engine with a custom HTTP client.
    ///
    /// The configuration is validated here, once.
    ///
    /// # Errors
    ///
    /// Returns a `configuration_error` if the configuration or the key is
    /// invalid.
    pub fn with_client(
        client: H,
        config: ClientConfig,
        api_key: impl Into<String>,
    ) -> Result<Self, ApiError> {
        config.validate()?;
        let api_key = ApiKey::parse(api_key)?;

        Ok(Self {
            client,
            sleeper: TokioSleeper,
            retry_policy: RetryPolicy::from_config(&config),
            api_key: RwLock::new(api_key),
            debug: AtomicBool::new(config.debug),
            config,
        })
    }
}

impl<H, S> RequestEngine<H, S> {
    /// Sets a custom sleeper for retry delays.
    ///
    /// This is primarily useful for testing to avoid actual delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> RequestEngine<H, S2> {
        RequestEngine {
            client: self.client,
            sleeper,
            config: self.config,
            retry_policy: self.retry_policy,
            api_key: self.api_key,
            debug: self.debug,
        }
    }

    /// Replaces the retry policy derived from the configuration.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the active credential.
    #[must_use]
    pub fn api_key(&self) -> ApiKey {
        self.api_key
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns whether the active key is secret or public.
    #[must_use]
    pub fn key_kind(&self) -> KeyKind {
        self.api_key
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .kind()
    }

    /// Swaps the credential for requests built from now on.
    ///
    /// Requests already in flight keep the key they were built with.
    ///
    /// # Errors
    ///
    /// Returns a `configuration_error` if the key is empty or lacks a
    /// recognised prefix; the active key is left unchanged.
    pub fn set_api_key(&self, api_key: impl Into<String>) -> Result<(), ApiError> {
        let api_key = ApiKey::parse(api_key)?;
        *self.api_key.write().unwrap_or_else(PoisonError::into_inner) = api_key;
        Ok(())
    }

    /// Enables or disables request/response debug traces.
    pub fn set_debug(&self, enabled: bool) {
        self.debug.store(enabled, Ordering::Relaxed);
    }

    /// Returns whether debug traces are enabled.
    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    /// Composes the target URL: root, normalised path, then query.
    fn resolve_url(&self, path: &str, options: &RequestOptions) -> Result<Url, ApiError> {
        let root = options.overrides.base_url.as_ref().map_or_else(
            || self.config.api_root(),
            |url| url.as_str().trim_end_matches('/').to_string(),
        );
        let raw = if path.starts_with('/') {
            format!("{root}{path}")
        } else {
            format!("{root}/{path}")
        };

        Url::parse(&raw).map_err(|e| {
            ConfigError::InvalidUrl {
                url: raw.clone(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(CLIENT_VERSION_HEADER),
            HeaderValue::from_static(CLIENT_VERSION),
        );
        headers.insert(AUTHORIZATION, self.api_key().basic_auth_header());
        headers
    }

    /// Builds the single [`HttpRequest`] replayed on every attempt.
    fn build_request(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
        options: &RequestOptions,
    ) -> Result<HttpRequest, ApiError> {
        let has_body = sends_body(method);
        let mut url = self.resolve_url(path, options)?;
        query::append(&mut url, if has_body { None } else { body }, &options.expand);

        let timeout = options.overrides.timeout.unwrap_or(self.config.timeout);
        let mut request = HttpRequest::new(method.clone(), url).with_timeout(timeout);
        request.headers = self.default_headers();

        if let Some(body) = body.filter(|_| has_body) {
            request = request
                .with_json(body)
                .map_err(|e| ApiError::configuration(format!("Failed to encode body: {e}")))?;
        }

        if let Some(key) = &options.idempotency_key {
            let value = HeaderValue::from_str(key).map_err(|_| {
                ApiError::configuration(format!("Invalid idempotency key '{key}'"))
            })?;
            request
                .headers
                .insert(HeaderName::from_static(IDEMPOTENCY_KEY_HEADER), value);
        }

        for name in options.overrides.headers.keys() {
            request.headers.remove(name);
        }
        for (name, value) in &options.overrides.headers {
            request.headers.append(name.clone(), value.clone());
        }

        Ok(request)
    }
}

impl<H: HttpClient, S: Sleeper> RequestEngine<H, S> {
    /// Executes one logical request and decodes the 2xx body as `T`.
    ///
    /// For `POST`, `PUT` and `PATCH` the body is sent as JSON; for other
    /// methods a JSON object body is flattened into query parameters.
    /// An empty response body decodes as JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] for any non-2xx response or transport
    /// failure once retries are exhausted or not permitted, and for a 2xx
    /// body that does not decode as `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>, ApiError> {
        let request = self.build_request(&method, path, body.as_ref(), &options)?;
        let response = self.send_with_retry(request, options.retryable).await?;
        decode_response(response)
    }

    /// `GET`; `params` become query parameters.
    ///
    /// # Errors
    ///
    /// See [`RequestEngine::request`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<Value>,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.request(Method::GET, path, params, options).await
    }

    /// `POST` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`RequestEngine::request`].
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.request(Method::POST, path, body, options).await
    }

    /// `PUT` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`RequestEngine::request`].
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.request(Method::PUT, path, body, options).await
    }

    /// `PATCH` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`RequestEngine::request`].
    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.request(Method::PATCH, path, body, options).await
    }

    /// `DELETE`; `params` become query parameters.
    ///
    /// # Errors
    ///
    /// See [`RequestEngine::request`].
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<Value>,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.request(Method::DELETE, path, params, options).await
    }

    /// Dispatches `request` until it succeeds or the policy stops retrying.
    ///
    /// The last failure is the one returned.
    async fn send_with_retry(
        &self,
        request: HttpRequest,
        retryable: Option<bool>,
    ) -> Result<HttpResponse, ApiError> {
        let debug = self.is_debug();
        let has_idempotency_key = request.headers.contains_key(IDEMPOTENCY_KEY_HEADER);
        let mut retries = 0u32;

        loop {
            if debug {
                trace_request(&request, retries + 1);
            }

            let outcome = self.client.request(request.clone()).await;
            if debug {
                trace_outcome(&outcome);
            }

            let (failure, error) = match outcome {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => (
                    AttemptFailure::Status(response.status),
                    ApiError::from_response(response.status, &response.headers, &response.body),
                ),
                Err(e) => (
                    AttemptFailure::Transport(e.code()),
                    ApiError::from_transport(&e),
                ),
            };

            let ctx = RetryContext {
                method: &request.method,
                has_idempotency_key,
                retryable,
                failure,
                retries_so_far: retries,
            };
            if !self.retry_policy.should_retry(&ctx) {
                return Err(error);
            }

            retries += 1;
            let delay = self.retry_policy.delay_for_retry(retries);
            warn!(
                method = %request.method,
                url = %request.url,
                retry = retries,
                max_retries = self.retry_policy.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error_type = %error.error_type(),
                code = error.code().unwrap_or_default(),
                "Request failed, retrying"
            );
            self.sleeper.sleep(delay).await;
        }
    }
}

const fn sends_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

fn decode_response<T: DeserializeOwned>(response: HttpResponse) -> Result<ApiResponse<T>, ApiError> {
    let request_id = request_id_from(&response.headers);
    let data = response.json().map_err(|e| {
        ApiError::new(
            ErrorType::ApiError,
            format!("Failed to decode response body: {e}"),
        )
        .with_status(response.status)
        .with_request_id(request_id.clone())
    })?;

    Ok(ApiResponse {
        data,
        status: response.status,
        headers: response.headers,
        request_id,
    })
}

/// Renders headers for logging with credentials and cookies replaced by
/// [`REDACTED`].
#[must_use]
pub fn redact_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if is_sensitive(name, value) {
                REDACTED.to_string()
            } else {
                value.to_str().unwrap_or("<binary>").to_string()
            };
            (name.as_str().to_string(), shown)
        })
        .collect()
}

fn is_sensitive(name: &HeaderName, value: &HeaderValue) -> bool {
    value.is_sensitive() || *name == AUTHORIZATION || *name == COOKIE || *name == SET_COOKIE
}

fn trace_request(request: &HttpRequest, attempt: u32) {
    debug!(
        method = %request.method,
        url = %request.url,
        attempt,
        headers = ?redact_headers(&request.headers),
        body = request.body_text().unwrap_or_default(),
        "Sending request"
    );
}

fn trace_outcome(outcome: &Result<HttpResponse, TransportError>) {
    match outcome {
        Ok(response) => debug!(
            status = response.status.as_u16(),
            headers = ?redact_headers(&response.headers),
            body = response.body_text().unwrap_or_default(),
            "Received response"
        ),
        Err(e) => debug!(error = %e, code = %e.code(), "Transport failure"),
    }
}
