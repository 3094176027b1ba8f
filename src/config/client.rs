//! Long-lived client configuration.

use std::fmt;
use std::time::Duration;

use url::Url;

use super::{ConfigError, defaults};

/// Settings shared by every request an engine issues.
///
/// Built once with [`ClientConfig::new`] and the `with_*` methods, then
/// handed to the request engine, which validates it eagerly.
///
/// # Example
///
/// ```
/// use payments_client::config::ClientConfig;
/// use std::time::Duration;
/// use url::Url;
///
/// let config = ClientConfig::new(Url::parse("https://api.example.com").unwrap())
///     .with_api_version("v2")
///     .with_timeout(Duration::from_secs(10))
///     .with_max_retries(2);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.api_root(), "https://api.example.com/v2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin of the remote API
    pub base_url: Url,
    /// Version path segment appended to `base_url`
    pub api_version: String,
    /// Deadline for each attempt
    pub timeout: Duration,
    /// Automatic retries allowed per logical request
    pub max_retries: u32,
    /// Base delay for exponential backoff
    pub retry_delay: Duration,
    /// Initial state of request/response debug logging
    pub debug: bool,
}

impl ClientConfig {
    /// Creates a configuration with default values for everything but the URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_version: defaults::API_VERSION.to_string(),
            timeout: defaults::timeout(),
            max_retries: defaults::MAX_RETRIES,
            retry_delay: defaults::retry_delay(),
            debug: false,
        }
    }

    /// Sets the API version segment.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry ceiling.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the backoff base delay.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Enables or disables debug logging.
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Checks that all values are usable.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the base URL is not `http` or `https`
    /// - the API version contains `/` or whitespace
    /// - the timeout is zero or above [`defaults::MAX_TIMEOUT_MS`]
    /// - `max_retries` exceeds [`defaults::MAX_RETRIES_LIMIT`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        if self
            .api_version
            .chars()
            .any(|c| c == '/' || c.is_whitespace())
        {
            return Err(ConfigError::InvalidApiVersion(self.api_version.clone()));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.timeout > Duration::from_millis(defaults::MAX_TIMEOUT_MS) {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: format!("must be at most {}ms", defaults::MAX_TIMEOUT_MS),
            });
        }

        if self.max_retries > defaults::MAX_RETRIES_LIMIT {
            return Err(ConfigError::InvalidRetry(format!(
                "max_retries ({}) must be at most {}",
                self.max_retries,
                defaults::MAX_RETRIES_LIMIT
            )));
        }

        Ok(())
    }

    /// Returns the request root: `base_url` joined with the version segment.
    #[must_use]
    pub fn api_root(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        if self.api_version.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{}", self.api_version)
        }
    }
}

impl fmt::Display for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ClientConfig {{ root: {}, timeout: {}ms, retries: {}x/{}ms, debug: {} }}",
            self.api_root(),
            self.timeout.as_millis(),
            self.max_retries,
            self.retry_delay.as_millis(),
            self.debug,
        )
    }
}
