//! payments-client: typed async client for a remote payment API
//!
//! A library for issuing authenticated, safely retried requests and for
//! verifying the signatures of inbound webhooks.

pub mod config;
pub mod engine;
pub mod error;
pub mod resources;
pub mod time;
pub mod transport;
pub mod webhook;

pub use config::ClientConfig;
pub use engine::{ApiKey, ApiResponse, RequestEngine, RequestOptions, RetryPolicy};
pub use error::{ApiError, ErrorType};
pub use webhook::{SignatureConfig, WebhookEvent, WebhookVerifier};
