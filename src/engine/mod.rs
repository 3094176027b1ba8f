//! Request engine for the payment API.
//!
//! This module provides:
//! - Credentials ([`ApiKey`], [`KeyKind`])
//! - Per-call options ([`RequestOptions`], [`TransportOverrides`])
//! - Retry policy with exponential backoff ([`RetryPolicy`])
//! - The engine itself ([`RequestEngine`]) returning [`ApiResponse`]
//!
//! # Retry safety
//!
//! Only transient failures (transient connection codes, 5xx, 429) are
//! retried, and only when replaying is safe: `GET`, `HEAD`, `OPTIONS`,
//! `PUT` and `DELETE` always, anything else only with an idempotency key.

mod auth;
mod options;
mod query;
mod request;
mod retry;

#[cfg(test)]
mod request_tests;

pub use auth::{ApiKey, KeyKind};
pub use options::{ApiResponse, RequestOptions, TransportOverrides};
pub use request::{
    CLIENT_VERSION, CLIENT_VERSION_HEADER, IDEMPOTENCY_KEY_HEADER, REDACTED, RequestEngine,
    redact_headers,
};
pub use retry::{AttemptFailure, JITTER_RATIO, RetryContext, RetryPolicy};
