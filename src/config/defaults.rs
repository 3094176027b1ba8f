//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default API version path segment.
pub const API_VERSION: &str = "v1";

/// Default per-attempt timeout in milliseconds.
pub const TIMEOUT_MS: u64 = 30_000;

/// Upper bound accepted for the per-attempt timeout, in milliseconds.
pub const MAX_TIMEOUT_MS: u64 = 600_000;

/// Default maximum number of automatic retries.
pub const MAX_RETRIES: u32 = 3;

/// Upper bound accepted for `max_retries`.
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Default base delay for exponential backoff, in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1_000;

/// Hard cap on any single backoff delay, in milliseconds.
pub const MAX_BACKOFF_MS: u64 = 30_000;

/// Default webhook timestamp tolerance in seconds.
pub const WEBHOOK_TOLERANCE_SECS: i64 = 300;

/// Default webhook signature header name.
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Default webhook timestamp header name.
pub const TIMESTAMP_HEADER: &str = "x-webhook-timestamp";

/// Default webhook signature prefix.
pub const SIGNATURE_PREFIX: &str = "v1=";

/// Default webhook signature algorithm name.
pub const SIGNATURE_ALGORITHM: &str = "sha256";

/// Default config file name written by `init`.
pub const CONFIG_FILE: &str = "payments-client.toml";

/// Default per-attempt timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_millis(TIMEOUT_MS)
}

/// Default backoff base delay as Duration.
#[must_use]
pub const fn retry_delay() -> Duration {
    Duration::from_millis(RETRY_DELAY_MS)
}

/// Backoff cap as Duration.
#[must_use]
pub const fn max_backoff() -> Duration {
    Duration::from_millis(MAX_BACKOFF_MS)
}
