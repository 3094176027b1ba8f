//! HMAC signatures over raw webhook payloads.

use std::fmt;
use std::str::FromStr;

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use crate::config::{ConfigError, defaults};

/// Hash function used inside the HMAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureAlgorithm {
    /// HMAC-SHA256
    #[default]
    Sha256,
    /// HMAC-SHA384
    Sha384,
    /// HMAC-SHA512
    Sha512,
}

impl SignatureAlgorithm {
    /// Returns the configuration name of the algorithm.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Computes the hex-encoded HMAC of `payload` under `secret`.
    ///
    /// Any secret is a valid key, the empty one included.
    #[must_use]
    pub fn sign(self, secret: &[u8], payload: &[u8]) -> String {
        match self {
            Self::Sha256 => mac_hex::<Hmac<Sha256>>(secret, payload),
            Self::Sha384 => mac_hex::<Hmac<Sha384>>(secret, payload),
            Self::Sha512 => mac_hex::<Hmac<Sha512>>(secret, payload),
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(ConfigError::InvalidAlgorithm(s.to_string())),
        }
    }
}

fn mac_hex<M: Mac + KeyInit>(secret: &[u8], payload: &[u8]) -> String {
    let mut mac = <M as Mac>::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// How signatures are produced and where they are found.
///
/// # Defaults
///
/// - `algorithm`: HMAC-SHA256
/// - `signature_header`: `x-webhook-signature`
/// - `timestamp_header`: `x-webhook-timestamp`
/// - `tolerance`: 300 seconds
/// - `prefix`: `v1=`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureConfig {
    /// Hash function for the HMAC
    pub algorithm: SignatureAlgorithm,
    /// Header carrying the signature
    pub signature_header: String,
    /// Header carrying the Unix timestamp, if any
    pub timestamp_header: String,
    /// Allowed skew in seconds; negative values never match
    pub tolerance: i64,
    /// Prefix in front of the hex digest
    pub prefix: String,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            algorithm: SignatureAlgorithm::default(),
            signature_header: defaults::SIGNATURE_HEADER.to_string(),
            timestamp_header: defaults::TIMESTAMP_HEADER.to_string(),
            tolerance: defaults::WEBHOOK_TOLERANCE_SECS,
            prefix: defaults::SIGNATURE_PREFIX.to_string(),
        }
    }
}

impl SignatureConfig {
    /// Sets the hash function.
    #[must_use]
    pub const fn with_algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the signature header name.
    #[must_use]
    pub fn with_signature_header(mut self, name: impl Into<String>) -> Self {
        self.signature_header = name.into();
        self
    }

    /// Sets the timestamp header name.
    #[must_use]
    pub fn with_timestamp_header(mut self, name: impl Into<String>) -> Self {
        self.timestamp_header = name.into();
        self
    }

    /// Sets the timestamp tolerance in seconds.
    #[must_use]
    pub const fn with_tolerance(mut self, seconds: i64) -> Self {
        self.tolerance = seconds;
        self
    }

    /// Sets the signature prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

/// Checks `signature` against the HMAC of `payload`.
///
/// Never fails: a missing prefix or a mismatch yields `false`. The digest
/// comparison is constant-time.
///
/// # Example
///
/// ```
/// use payments_client::webhook::{SignatureConfig, generate_test_signature, verify_signature};
///
/// let payload = br#"{"id":"evt_1"}"#;
/// let signature = generate_test_signature(payload, "whsec_test");
///
/// assert!(verify_signature(payload, &signature, "whsec_test", &SignatureConfig::default()));
/// assert!(!verify_signature(payload, &signature, "whsec_other", &SignatureConfig::default()));
/// ```
#[must_use]
pub fn verify_signature(
    payload: impl AsRef<[u8]>,
    signature: &str,
    secret: &str,
    config: &SignatureConfig,
) -> bool {
    let Some(provided) = signature.trim().strip_prefix(config.prefix.as_str()) else {
        return false;
    };
    let expected = config.algorithm.sign(secret.as_bytes(), payload.as_ref());
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

/// Signs `payload` with the default algorithm and prefix.
#[must_use]
pub fn generate_test_signature(payload: impl AsRef<[u8]>, secret: &str) -> String {
    generate_test_signature_with(
        payload,
        secret,
        SignatureAlgorithm::default(),
        defaults::SIGNATURE_PREFIX,
    )
}

/// Signs `payload` as `prefix + hex(hmac)`.
///
/// The output is deterministic in all four inputs.
#[must_use]
pub fn generate_test_signature_with(
    payload: impl AsRef<[u8]>,
    secret: &str,
    algorithm: SignatureAlgorithm,
    prefix: &str,
) -> String {
    let digest = algorithm.sign(secret.as_bytes(), payload.as_ref());
    format!("{prefix}{digest}")
}
