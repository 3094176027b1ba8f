//! Retry policy for logical requests.

use std::time::Duration;

use http::{Method, StatusCode};

use crate::config::{ClientConfig, defaults};
use crate::transport::ConnectionCode;

/// Fraction of the exponential term added as random jitter (upper bound, exclusive).
pub const JITTER_RATIO: f64 = 0.1;

/// What went wrong on a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptFailure {
    /// A response arrived with a non-2xx status.
    Status(StatusCode),
    /// No response arrived.
    Transport(ConnectionCode),
}

impl AttemptFailure {
    /// True for failures worth repeating: transient connection codes,
    /// 5xx responses, and 429.
    #[must_use]
    pub fn is_transient(self) -> bool {
        match self {
            Self::Status(status) => {
                status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
            }
            Self::Transport(code) => code.is_transient(),
        }
    }
}

/// Inputs to a single retry decision.
#[derive(Debug, Clone, Copy)]
pub struct RetryContext<'a> {
    /// Method of the logical request
    pub method: &'a Method,
    /// Whether the request carries an idempotency key header
    pub has_idempotency_key: bool,
    /// Per-call override; `Some(false)` disables retries
    pub retryable: Option<bool>,
    /// Failure of the attempt that just finished
    pub failure: AttemptFailure,
    /// Retries already performed for this logical request
    pub retries_so_far: u32,
}

/// Configuration for exponential backoff retry behavior.
///
/// # Defaults
///
/// - `max_retries`: 3
/// - `base_delay`: 1 second
/// - `max_delay`: 30 seconds
///
/// # Example
///
/// ```
/// use payments_client::engine::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new()
///     .with_max_retries(5)
///     .with_base_delay(Duration::from_millis(200));
///
/// assert!(policy.delay_for_retry(1) >= Duration::from_millis(200));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    ///
    /// Zero means only the initial attempt is made.
    pub max_retries: u32,

    /// Delay before the first retry; doubled for each later retry.
    pub base_delay: Duration,

    /// Cap applied after jitter is added.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Default maximum retries.
    pub const DEFAULT_MAX_RETRIES: u32 = defaults::MAX_RETRIES;

    /// Default base delay (1 second).
    pub const DEFAULT_BASE_DELAY: Duration = defaults::retry_delay();

    /// Default maximum delay (30 seconds).
    pub const DEFAULT_MAX_DELAY: Duration = defaults::max_backoff();

    /// Creates a new retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            base_delay: Self::DEFAULT_BASE_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
        }
    }

    /// Creates the policy described by a client configuration.
    #[must_use]
    pub const fn from_config(config: &ClientConfig) -> Self {
        Self::new()
            .with_max_retries(config.max_retries)
            .with_base_delay(config.retry_delay)
    }

    /// Sets the maximum number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the base delay.
    ///
    /// Zero delay is supported (useful for testing) but creates a tight
    /// retry loop in production.
    #[must_use]
    pub const fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the delay cap.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Returns true if another retry fits in the budget.
    #[must_use]
    pub const fn has_budget(&self, retries_so_far: u32) -> bool {
        retries_so_far < self.max_retries
    }

    /// Returns true if the method may be replayed.
    ///
    /// `GET`, `HEAD`, `OPTIONS`, `PUT` and `DELETE` are idempotent by
    /// convention. Anything else needs an idempotency key so the server can
    /// deduplicate. The API itself only requires this of `POST`; `PATCH` is
    /// held to the same rule here because a partial update is not safe to
    /// apply twice.
    #[must_use]
    pub fn is_replayable(method: &Method, has_idempotency_key: bool) -> bool {
        let idempotent = matches!(
            *method,
            Method::GET | Method::HEAD | Method::OPTIONS | Method::PUT | Method::DELETE
        );
        idempotent || has_idempotency_key
    }

    /// Decides whether the failed attempt described by `ctx` is retried.
    #[must_use]
    pub fn should_retry(&self, ctx: &RetryContext<'_>) -> bool {
        self.has_budget(ctx.retries_so_far)
            && ctx.retryable != Some(false)
            && Self::is_replayable(ctx.method, ctx.has_idempotency_key)
            && ctx.failure.is_transient()
    }

    /// Exponential term for a retry: `base_delay * 2^(retry - 1)`.
    ///
    /// `retry` is 1-based; 0 is treated as 1.
    #[must_use]
    pub fn exponential_delay(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1);
        let factor = 2u32.checked_pow(exponent).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Delay for a retry with a caller-supplied jitter sample in `[0, 1)`.
    ///
    /// The result is `min(exp + exp * JITTER_RATIO * unit, max_delay)`.
    #[must_use]
    pub fn delay_with_jitter(&self, retry: u32, unit: f64) -> Duration {
        let exp = self.exponential_delay(retry);
        let unit = if unit.is_finite() {
            unit.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let jitter = exp.mul_f64(JITTER_RATIO * unit);
        exp.saturating_add(jitter).min(self.max_delay)
    }

    /// Delay before the given retry (1-based), with random jitter.
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        self.delay_with_jitter(retry, rand::random::<f64>())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}
