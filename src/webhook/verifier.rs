//! Timestamp freshness and event construction.

use serde::de::DeserializeOwned;
use tracing::debug;

use super::{HeaderSource, SignatureConfig, WebhookError, WebhookEvent, verify_signature};
use crate::config::defaults;
use crate::time::{Clock, SystemClock};

/// Verifies inbound webhooks against a shared secret.
///
/// The clock is injectable so freshness checks can be tested; the free
/// functions in this module use [`SystemClock`].
///
/// # Example
///
/// ```
/// use payments_client::webhook::{WebhookVerifier, generate_test_signature};
///
/// let verifier = WebhookVerifier::new("whsec_test");
/// let payload = br#"{"id":"evt_1","type":"charge.succeeded","data":{"object":{}},"created":0}"#;
/// let signature = generate_test_signature(payload, "whsec_test");
///
/// let event = verifier.construct_event::<serde_json::Value>(payload, &signature).unwrap();
/// assert_eq!(event.event_type, "charge.succeeded");
/// ```
#[derive(Debug, Clone)]
pub struct WebhookVerifier<C = SystemClock> {
    secret: String,
    config: SignatureConfig,
    clock: C,
}

impl WebhookVerifier<SystemClock> {
    /// Creates a verifier with default settings and the system clock.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            config: SignatureConfig::default(),
            clock: SystemClock,
        }
    }
}

impl<C> WebhookVerifier<C> {
    /// Sets the signature configuration.
    #[must_use]
    pub fn with_config(mut self, config: SignatureConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets a custom clock.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> WebhookVerifier<C2> {
        WebhookVerifier {
            secret: self.secret,
            config: self.config,
            clock,
        }
    }

    /// Returns the signature configuration.
    #[must_use]
    pub const fn config(&self) -> &SignatureConfig {
        &self.config
    }

    /// Checks a signature without looking at timestamps.
    #[must_use]
    pub fn verify_signature(&self, payload: impl AsRef<[u8]>, signature: &str) -> bool {
        verify_signature(payload, signature, &self.secret, &self.config)
    }

    /// Authenticates then parses `payload`.
    ///
    /// The payload is never parsed unless the signature matches.
    ///
    /// # Errors
    ///
    /// - [`WebhookError::InvalidSignature`] if the signature does not match
    /// - [`WebhookError::InvalidPayload`] if the authentic payload is not a
    ///   valid event
    pub fn construct_event<T: DeserializeOwned>(
        &self,
        payload: impl AsRef<[u8]>,
        signature: &str,
    ) -> Result<WebhookEvent<T>, WebhookError> {
        let payload = payload.as_ref();
        if !self.verify_signature(payload, signature) {
            debug!(bytes = payload.len(), "Webhook signature mismatch");
            return Err(WebhookError::InvalidSignature);
        }

        serde_json::from_slice(payload).map_err(|e| {
            debug!(error = %e, "Authentic webhook payload is not a valid event");
            WebhookError::InvalidPayload(e)
        })
    }
}

impl<C: Clock> WebhookVerifier<C> {
    /// Returns true if `timestamp` is within `tolerance` seconds of now.
    #[must_use]
    pub fn is_valid_timestamp(&self, timestamp: i64, tolerance: i64) -> bool {
        within_tolerance(self.clock.unix_seconds(), timestamp, tolerance)
    }

    /// Checks the signature header and, when present, the timestamp header.
    ///
    /// Returns `Ok(false)` for a signature mismatch.
    ///
    /// # Errors
    ///
    /// - [`WebhookError::MissingSignatureHeader`] if the signature header is absent
    /// - [`WebhookError::MalformedTimestamp`] if the timestamp is not an integer
    /// - [`WebhookError::TimestampOutOfTolerance`] if the timestamp is stale
    ///   or too far in the future
    pub fn verify_with_timestamp<H: HeaderSource + ?Sized>(
        &self,
        payload: impl AsRef<[u8]>,
        headers: &H,
    ) -> Result<bool, WebhookError> {
        let config = &self.config;
        let signature = headers.header(&config.signature_header).ok_or_else(|| {
            WebhookError::MissingSignatureHeader {
                header: config.signature_header.clone(),
            }
        })?;

        if let Some(raw) = headers.header(&config.timestamp_header) {
            let timestamp = raw
                .trim()
                .parse::<i64>()
                .map_err(|_| WebhookError::MalformedTimestamp {
                    value: raw.to_string(),
                })?;
            if !self.is_valid_timestamp(timestamp, config.tolerance) {
                debug!(timestamp, tolerance = config.tolerance, "Webhook timestamp rejected");
                return Err(WebhookError::TimestampOutOfTolerance {
                    timestamp,
                    tolerance: config.tolerance,
                });
            }
        }

        Ok(self.verify_signature(payload, signature))
    }
}

/// `|now - timestamp| <= tolerance`; a negative tolerance never matches.
const fn within_tolerance(now: i64, timestamp: i64, tolerance: i64) -> bool {
    tolerance >= 0 && now.abs_diff(timestamp) <= tolerance.unsigned_abs()
}

/// Returns true if `timestamp` (Unix seconds) is within `tolerance`
/// seconds of the system clock, in either direction.
///
/// A negative tolerance is never satisfied; zero requires the current
/// second exactly.
#[must_use]
pub fn is_valid_timestamp(timestamp: i64, tolerance: i64) -> bool {
    within_tolerance(SystemClock.unix_seconds(), timestamp, tolerance)
}

/// [`is_valid_timestamp`] with the default 300 second tolerance.
#[must_use]
pub fn is_fresh(timestamp: i64) -> bool {
    is_valid_timestamp(timestamp, defaults::WEBHOOK_TOLERANCE_SECS)
}

/// Checks the signature header and the optional timestamp header.
///
/// # Errors
///
/// See [`WebhookVerifier::verify_with_timestamp`].
pub fn verify_signature_with_timestamp<H: HeaderSource + ?Sized>(
    payload: impl AsRef<[u8]>,
    headers: &H,
    secret: &str,
    config: &SignatureConfig,
) -> Result<bool, WebhookError> {
    WebhookVerifier::new(secret)
        .with_config(config.clone())
        .verify_with_timestamp(payload, headers)
}

/// Authenticates then parses `payload` into an event.
///
/// # Errors
///
/// See [`WebhookVerifier::construct_event`].
pub fn construct_event<T: DeserializeOwned>(
    payload: impl AsRef<[u8]>,
    signature: &str,
    secret: &str,
    config: &SignatureConfig,
) -> Result<WebhookEvent<T>, WebhookError> {
    WebhookVerifier::new(secret)
        .with_config(config.clone())
        .construct_event(payload, signature)
}
