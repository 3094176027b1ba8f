//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// API client section
    #[serde(default)]
    pub client: ClientSection,

    /// Webhook verification section
    #[serde(default)]
    pub webhook: WebhookSection,
}

/// API client configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// Origin of the remote API
    pub base_url: Option<String>,

    /// Version path segment (default: v1)
    pub api_version: Option<String>,

    /// Secret or publishable API key
    pub api_key: Option<String>,

    /// Per-attempt timeout in milliseconds
    pub timeout_ms: Option<u64>,

    /// Maximum number of automatic retries
    pub max_retries: Option<u32>,

    /// Backoff base delay in milliseconds
    pub retry_delay_ms: Option<u64>,

    /// Log redacted request/response traces
    #[serde(default)]
    pub debug: bool,
}

/// Webhook verification section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookSection {
    /// Shared signing secret
    pub secret: Option<String>,

    /// `sha256`, `sha384` or `sha512`
    pub algorithm: Option<String>,

    /// Header carrying the signature
    pub signature_header: Option<String>,

    /// Header carrying the Unix timestamp
    pub timestamp_header: Option<String>,

    /// Accepted clock skew in seconds
    pub tolerance: Option<i64>,

    /// Prefix in front of the hex digest
    pub prefix: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# payments-client configuration file

[client]
# API origin (required)
# base_url = "https://api.example.com"

# Version path segment appended to base_url (default: v1)
# api_version = "v1"

# API key, "sk_" (secret) or "pk_" (publishable) (required for `request`)
# Prefer --api-key or PAYMENTS_API_KEY over storing it here
# api_key = "sk_test_..."

# Per-attempt timeout in milliseconds (default: 30000)
# timeout_ms = 30000

# Automatic retries for transient failures (default: 3, max: 10)
# max_retries = 3

# Backoff base delay in milliseconds (default: 1000)
# retry_delay_ms = 1000

# Log redacted request/response traces
# debug = false

[webhook]
# Signing secret (required for `sign` and `verify-webhook`)
# secret = "whsec_..."

# Accepted values: "sha256", "sha384", "sha512" (default: sha256)
# algorithm = "sha256"

# signature_header = "x-webhook-signature"
# timestamp_header = "x-webhook-timestamp"

# Accepted clock skew in seconds (default: 300)
# tolerance = 300

# Prefix in front of the hex digest (default: "v1=")
# prefix = "v1="
"#
    .to_string()
}
