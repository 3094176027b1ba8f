//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// payments-client: command-line access to the payment API
///
/// Issues retrying, authenticated requests and signs or verifies
/// webhook payloads.
#[derive(Debug, Parser)]
#[command(name = "payments-client")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// API key ("sk_..." or "pk_...")
    #[arg(long = "api-key", env = "PAYMENTS_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// API origin, e.g. <https://api.example.com>
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Version path segment appended to the base URL
    #[arg(long = "api-version", global = true)]
    pub api_version: Option<String>,

    /// Per-attempt timeout in milliseconds
    #[arg(long = "timeout", value_name = "MS", global = true)]
    pub timeout_ms: Option<u64>,

    /// Maximum number of automatic retries
    #[arg(long = "max-retries", global = true)]
    pub max_retries: Option<u32>,

    /// Backoff base delay in milliseconds
    #[arg(long = "retry-delay", value_name = "MS", global = true)]
    pub retry_delay_ms: Option<u64>,

    /// Log redacted request/response traces
    #[arg(long, global = true)]
    pub debug: bool,

    /// Webhook signing secret
    #[arg(
        long = "webhook-secret",
        env = "PAYMENTS_WEBHOOK_SECRET",
        hide_env_values = true,
        global = true
    )]
    pub webhook_secret: Option<String>,

    /// Webhook signature algorithm: sha256, sha384 or sha512
    #[arg(long, global = true)]
    pub algorithm: Option<String>,

    /// Accepted webhook clock skew in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub tolerance: Option<i64>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for payments-client
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = crate::config::defaults::CONFIG_FILE)]
        output: PathBuf,
    },

    /// Issue one logical request and print the response
    Request {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE)
        method: String,

        /// Path below the API root, e.g. /customers
        path: String,

        /// JSON parameters: the body for POST/PUT/PATCH, the query otherwise
        #[arg(long, short)]
        data: Option<String>,

        /// Idempotency key; makes POST and PATCH retryable
        #[arg(long = "idempotency-key")]
        idempotency_key: Option<String>,

        /// Field to expand in the response (can be specified multiple times)
        #[arg(long = "expand", value_name = "FIELD")]
        expand: Vec<String>,

        /// Disable automatic retries for this request
        #[arg(long = "no-retry")]
        no_retry: bool,
    },

    /// Print the webhook signature for a payload file
    Sign {
        /// File holding the raw payload
        #[arg(long)]
        payload: PathBuf,
    },

    /// Verify a signed webhook payload and print the event
    VerifyWebhook {
        /// File holding the raw payload
        #[arg(long)]
        payload: PathBuf,

        /// Value of the signature header
        #[arg(long)]
        signature: String,

        /// Value of the timestamp header, in Unix seconds
        #[arg(long)]
        timestamp: Option<String>,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }

    /// Returns true if the command talks to the API.
    #[must_use]
    pub const fn needs_client(&self) -> bool {
        matches!(self.command, Command::Request { .. })
    }
}
