//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::engine::ApiKey;
use crate::webhook::{SignatureAlgorithm, SignatureConfig};

use super::cli::Cli;
use super::client::ClientConfig;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// Every value that was supplied has been parsed and range-checked.
/// Values only some subcommands need (`base_url`, the API key, the webhook
/// secret) stay optional here and are demanded through the `require_*`
/// accessors.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Client settings; `None` when no base URL was given
    pub client: Option<ClientConfig>,

    /// Parsed API key
    pub api_key: Option<ApiKey>,

    /// Webhook signature settings
    pub signature: SignatureConfig,

    /// Webhook signing secret
    pub webhook_secret: Option<String>,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let client = self
            .client
            .as_ref()
            .map_or_else(|| "none".to_string(), ToString::to_string);
        let key = self
            .api_key
            .as_ref()
            .map_or_else(|| "none".to_string(), ToString::to_string);

        write!(
            f,
            "Config {{ client: {client}, api_key: {key}, webhook: {}/{}s, webhook_secret: {} }}",
            self.signature.algorithm,
            self.signature.tolerance,
            if self.webhook_secret.is_some() {
                "set"
            } else {
                "none"
            },
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The base URL does not parse or is not `http`/`https`
    /// - The API key is malformed
    /// - Timeout or retry values are out of range
    /// - The signature algorithm is unknown
    /// - The tolerance is negative
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let client = Self::build_client(cli, toml)?;

        let api_key = cli
            .api_key
            .clone()
            .or_else(|| toml.and_then(|t| t.client.api_key.clone()))
            .map(ApiKey::parse)
            .transpose()?;

        let signature = Self::build_signature(cli, toml)?;

        let webhook_secret = cli
            .webhook_secret
            .clone()
            .or_else(|| toml.and_then(|t| t.webhook.secret.clone()))
            .filter(|s| !s.is_empty());

        Ok(Self {
            client,
            api_key,
            signature,
            webhook_secret,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    /// Returns the client settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] if no base URL was given.
    pub fn require_client(&self) -> Result<&ClientConfig, ConfigError> {
        self.client.as_ref().ok_or_else(|| {
            ConfigError::missing(
                field::BASE_URL,
                "Use --base-url or set client.base_url in config file",
            )
        })
    }

    /// Returns the API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] if no key was given.
    pub fn require_api_key(&self) -> Result<&ApiKey, ConfigError> {
        self.api_key.as_ref().ok_or_else(|| {
            ConfigError::missing(
                field::API_KEY,
                "Use --api-key, set PAYMENTS_API_KEY, or set client.api_key in config file",
            )
        })
    }

    /// Returns the webhook signing secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] if no secret was given.
    pub fn require_webhook_secret(&self) -> Result<&str, ConfigError> {
        self.webhook_secret.as_deref().ok_or_else(|| {
            ConfigError::missing(
                field::WEBHOOK_SECRET,
                "Use --webhook-secret, set PAYMENTS_WEBHOOK_SECRET, or set webhook.secret in config file",
            )
        })
    }

    fn build_client(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<ClientConfig>, ConfigError> {
        let section = toml.map(|t| &t.client);

        let Some(url_str) = cli
            .base_url
            .as_deref()
            .or_else(|| section.and_then(|s| s.base_url.as_deref()))
        else {
            return Ok(None);
        };

        let base_url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        // Priority: CLI explicit > TOML > default
        let api_version = cli
            .api_version
            .as_deref()
            .or_else(|| section.and_then(|s| s.api_version.as_deref()))
            .unwrap_or(defaults::API_VERSION);

        let timeout_ms = cli
            .timeout_ms
            .or_else(|| section.and_then(|s| s.timeout_ms))
            .unwrap_or(defaults::TIMEOUT_MS);

        let max_retries = cli
            .max_retries
            .or_else(|| section.and_then(|s| s.max_retries))
            .unwrap_or(defaults::MAX_RETRIES);

        let retry_delay_ms = cli
            .retry_delay_ms
            .or_else(|| section.and_then(|s| s.retry_delay_ms))
            .unwrap_or(defaults::RETRY_DELAY_MS);

        // Flags only enable
        let debug = cli.debug || section.is_some_and(|s| s.debug);

        let config = ClientConfig::new(base_url)
            .with_api_version(api_version)
            .with_timeout(Duration::from_millis(timeout_ms))
            .with_max_retries(max_retries)
            .with_retry_delay(Duration::from_millis(retry_delay_ms))
            .with_debug(debug);

        config.validate()?;
        Ok(Some(config))
    }

    fn build_signature(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<SignatureConfig, ConfigError> {
        let section = toml.map(|t| &t.webhook);
        let mut config = SignatureConfig::default();

        if let Some(name) = cli
            .algorithm
            .as_deref()
            .or_else(|| section.and_then(|s| s.algorithm.as_deref()))
        {
            config = config.with_algorithm(name.parse::<SignatureAlgorithm>()?);
        }

        let tolerance = cli
            .tolerance
            .or_else(|| section.and_then(|s| s.tolerance))
            .unwrap_or(defaults::WEBHOOK_TOLERANCE_SECS);

        if tolerance < 0 {
            return Err(ConfigError::InvalidDuration {
                field: "tolerance",
                reason: "must not be negative".to_string(),
            });
        }
        config = config.with_tolerance(tolerance);

        if let Some(section) = section {
            if let Some(ref header) = section.signature_header {
                config = config.with_signature_header(header.as_str());
            }
            if let Some(ref header) = section.timestamp_header {
                config = config.with_timestamp_header(header.as_str());
            }
            if let Some(ref prefix) = section.prefix {
                config = config.with_prefix(prefix.as_str());
            }
        }

        Ok(config)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
