//! Process-level glue for the binary: exit statuses, operator hints and
//! the log subscriber.

use std::process::ExitCode;

use payments_client::config::{ConfigError, field};
use payments_client::error::ErrorType;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::run::RunError;

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;

const INIT_HINT: &str = "Run 'payments-client init' to write a commented payments.toml template.";

/// How a command ended, as seen by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Exit 0.
    Success,
    /// Exit 1: the command could not be attempted as given.
    Usage,
    /// Exit 2: the API or a webhook check said no.
    Rejected,
}

impl Outcome {
    /// Classifies a failed command.
    pub const fn of(error: &RunError) -> Self {
        match error {
            RunError::Config(_) => Self::Usage,
            RunError::Api(_) | RunError::Webhook(_) | RunError::Render(_) => Self::Rejected,
        }
    }

    /// Numeric process status.
    pub const fn status(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Usage => 1,
            Self::Rejected => 2,
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        Self::from(outcome.status())
    }
}

/// Suggests a next step for a configuration problem, if one is known.
pub fn config_hint(error: &ConfigError) -> Option<&'static str> {
    match error {
        ConfigError::MissingRequired { field: name, .. } => match *name {
            field::BASE_URL | field::API_KEY | field::WEBHOOK_SECRET => Some(INIT_HINT),
            _ => None,
        },
        ConfigError::FileRead { path, .. } if path.extension().is_some_and(|e| e == "toml") => {
            Some(INIT_HINT)
        }
        ConfigError::InvalidApiKey { .. } => {
            Some("Secret keys start with 'sk_'; publishable keys start with 'pk_'.")
        }
        ConfigError::InvalidMethod(_) => Some("Supported methods: GET, POST, PUT, PATCH, DELETE."),
        ConfigError::InvalidJson { .. } => {
            Some("Pass --data as a JSON object, e.g. '{\"email\":\"a@b.com\"}'.")
        }
        _ => None,
    }
}

/// Suggests a next step for an API failure, if one is known.
pub const fn api_hint(error_type: ErrorType) -> Option<&'static str> {
    match error_type {
        ErrorType::AuthenticationError => Some("Check the key passed via --api-key or PAYMENTS_API_KEY."),
        ErrorType::RateLimitError => Some("The API is throttling this key; retry later."),
        ErrorType::IdempotencyError => {
            Some("Reuse an idempotency key only with identical request parameters.")
        }
        ErrorType::NetworkError | ErrorType::TimeoutError => {
            Some("Check connectivity to the configured base URL.")
        }
        _ => None,
    }
}

/// Writes a configuration problem and its hint to stderr.
pub fn report_config_error(error: &ConfigError) {
    eprintln!("Configuration error: {error}");
    if let Some(hint) = config_hint(error) {
        eprintln!("\n{hint}");
    }
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the level.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
