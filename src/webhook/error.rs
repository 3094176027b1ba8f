//! Error types for webhook verification.

use thiserror::Error;

/// Error type for the throwing verification paths.
///
/// Each variant names a distinct condition so callers can tell "not
/// authentic" from "malformed" from "stale".
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The configured signature header is absent.
    #[error("Missing webhook signature header '{header}'")]
    MissingSignatureHeader {
        /// Header name that was looked up
        header: String,
    },

    /// The timestamp header is present but is not an integer.
    #[error("Malformed webhook timestamp '{value}'")]
    MalformedTimestamp {
        /// The raw header value
        value: String,
    },

    /// The timestamp is further from the current time than the tolerance.
    #[error("Webhook timestamp {timestamp} is outside the tolerance of {tolerance}s")]
    TimestampOutOfTolerance {
        /// Timestamp from the header, in Unix seconds
        timestamp: i64,
        /// Allowed skew in seconds
        tolerance: i64,
    },

    /// The signature does not match the payload.
    #[error("Webhook signature verification failed")]
    InvalidSignature,

    /// The payload was authentic but is not a valid event.
    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}
