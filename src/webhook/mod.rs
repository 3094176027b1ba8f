//! Verification of inbound webhooks.
//!
//! This module provides:
//! - HMAC signatures over the raw payload ([`verify_signature`],
//!   [`generate_test_signature`], [`SignatureConfig`])
//! - Header lookup over common header containers ([`HeaderSource`])
//! - Timestamp freshness checks ([`is_valid_timestamp`])
//! - Authenticated event parsing ([`construct_event`], [`WebhookEvent`])
//! - A reusable verifier with an injectable clock ([`WebhookVerifier`])
//!
//! A payload is only parsed after its signature has been verified.

mod error;
mod event;
mod headers;
mod signature;
mod verifier;

#[cfg(test)]
mod signature_tests;

pub use error::WebhookError;
pub use event::{EventData, EventRequest, WebhookEvent};
pub use headers::HeaderSource;
pub use signature::{
    SignatureAlgorithm, SignatureConfig, generate_test_signature, generate_test_signature_with,
    verify_signature,
};
pub use verifier::{
    WebhookVerifier, construct_event, is_fresh, is_valid_timestamp,
    verify_signature_with_timestamp,
};
