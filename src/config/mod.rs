//! Configuration layer for payments-client.
//!
//! This module provides:
//! - Client settings for the request engine ([`ClientConfig`])
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//!    (the API key and webhook secret may also come from `PAYMENTS_API_KEY`
//!    and `PAYMENTS_WEBHOOK_SECRET`)
//! 2. **TOML config file** - Values from the `[client]` and `[webhook]` sections
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! The `--debug` flag uses OR semantics: set in either source, it is on.
//!
//! Webhook header names and the signature prefix are TOML-only.

mod cli;
pub mod client;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod cli_tests;

pub use cli::{Cli, Command};
pub use client::ClientConfig;
pub use error::{ConfigError, field};
pub use toml::{ClientSection, TomlConfig, WebhookSection, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
