//! Subcommand execution.
//!
//! Each subcommand is split into a thin I/O shell and a pure core that
//! takes already-loaded inputs and returns the text to print, so the cores
//! can be driven by tests with mock clients and clocks.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use http::Method;
use serde_json::Value;
use thiserror::Error;

use payments_client::config::{Command, ConfigError, ValidatedConfig};
use payments_client::engine::{RequestEngine, RequestOptions};
use payments_client::error::ApiError;
use payments_client::time::{Clock, Sleeper};
use payments_client::transport::HttpClient;
use payments_client::webhook::{
    SignatureConfig, WebhookError, WebhookEvent, WebhookVerifier, generate_test_signature_with,
};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for subcommand failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Inputs were missing or malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The API request failed.
    #[error("API request failed: {0}")]
    Api(#[from] ApiError),

    /// Webhook signing or verification failed.
    #[error("Webhook verification failed: {0}")]
    Webhook(#[from] WebhookError),

    /// The response could not be rendered.
    #[error("Failed to render response: {0}")]
    Render(#[source] serde_json::Error),
}

/// Arguments of the `request` subcommand.
#[derive(Debug, Clone, Default)]
pub struct RequestArgs {
    pub method: String,
    pub path: String,
    pub data: Option<String>,
    pub idempotency_key: Option<String>,
    pub expand: Vec<String>,
    pub no_retry: bool,
}

/// Executes a non-`init` subcommand and returns its output.
///
/// # Errors
///
/// Returns [`RunError::Config`] for missing or invalid inputs and the
/// other variants for failures while talking to the API or verifying.
pub async fn execute(command: Command, config: ValidatedConfig) -> Result<String, RunError> {
    match command {
        Command::Init { .. } => Ok(String::new()),
        Command::Request {
            method,
            path,
            data,
            idempotency_key,
            expand,
            no_retry,
        } => {
            let client = config.require_client()?.clone();
            let key = config.require_api_key()?;
            let engine = RequestEngine::new(client, key.expose())?;
            let args = RequestArgs {
                method,
                path,
                data,
                idempotency_key,
                expand,
                no_retry,
            };
            send_request(&engine, args).await
        }
        Command::Sign { payload } => {
            let secret = config.require_webhook_secret()?;
            let payload = read_payload(&payload)?;
            Ok(sign_payload(&payload, secret, &config.signature))
        }
        Command::VerifyWebhook {
            payload,
            signature,
            timestamp,
        } => {
            let secret = config.require_webhook_secret()?;
            let payload = read_payload(&payload)?;
            let verifier = WebhookVerifier::new(secret).with_config(config.signature.clone());
            verify_payload(&verifier, &payload, &signature, timestamp.as_deref())
        }
    }
}

/// Issues one logical request and renders the response body.
///
/// # Errors
///
/// Returns [`RunError::Config`] for an unknown method or invalid `--data`,
/// and [`RunError::Api`] for anything the engine reports.
pub async fn send_request<H: HttpClient, S: Sleeper>(
    engine: &RequestEngine<H, S>,
    args: RequestArgs,
) -> Result<String, RunError> {
    let method = parse_method(&args.method)?;

    let body = args
        .data
        .as_deref()
        .map(|raw| {
            serde_json::from_str::<Value>(raw)
                .map_err(|source| ConfigError::InvalidJson {
                    field: "data",
                    source,
                })
        })
        .transpose()?;

    let mut options = RequestOptions::new();
    if let Some(key) = args.idempotency_key {
        options = options.with_idempotency_key(key);
    }
    for field in args.expand {
        options = options.with_expand(field);
    }
    if args.no_retry {
        options = options.with_retryable(false);
    }

    let response = engine
        .request::<Value>(method, &args.path, body, options)
        .await?;

    if let Some(ref id) = response.request_id {
        tracing::info!(request_id = %id, status = response.status.as_u16(), "Request completed");
    }

    serde_json::to_string_pretty(&response.data).map_err(RunError::Render)
}

/// Renders the signature for `payload`.
#[must_use]
pub fn sign_payload(payload: &[u8], secret: &str, config: &SignatureConfig) -> String {
    generate_test_signature_with(payload, secret, config.algorithm, &config.prefix)
}

/// Verifies `payload` and renders a summary of the event.
///
/// # Errors
///
/// Returns [`RunError::Webhook`] if the timestamp is stale or malformed,
/// the signature does not match, or the payload is not an event.
pub fn verify_payload<C: Clock>(
    verifier: &WebhookVerifier<C>,
    payload: &[u8],
    signature: &str,
    timestamp: Option<&str>,
) -> Result<String, RunError> {
    let config = verifier.config();
    let mut headers = vec![(config.signature_header.as_str(), signature)];
    if let Some(timestamp) = timestamp {
        headers.push((config.timestamp_header.as_str(), timestamp));
    }

    if !verifier.verify_with_timestamp(payload, headers.as_slice())? {
        return Err(WebhookError::InvalidSignature.into());
    }

    let event: WebhookEvent = verifier.construct_event(payload, signature)?;
    Ok(format!(
        "Verified event {} ({}), livemode: {}",
        event.id, event.event_type, event.livemode
    ))
}

/// Renders every populated field of an API error, one per line.
#[must_use]
pub fn render_api_error(error: &ApiError) -> String {
    let mut out = format!("{}: {}", error.error_type(), error.message());

    let fields = [
        ("code", error.code()),
        ("param", error.param()),
        ("decline_code", error.decline_code()),
        ("charge", error.charge_id()),
        ("request_id", error.request_id()),
        ("doc_url", error.doc_url()),
    ];
    if let Some(status) = error.status() {
        let _ = write!(out, "\n  status: {}", status.as_u16());
    }
    for (name, value) in fields {
        if let Some(value) = value {
            let _ = write!(out, "\n  {name}: {value}");
        }
    }

    out
}

fn parse_method(raw: &str) -> Result<Method, ConfigError> {
    match raw.to_ascii_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "PATCH" => Ok(Method::PATCH),
        "DELETE" => Ok(Method::DELETE),
        _ => Err(ConfigError::InvalidMethod(raw.to_string())),
    }
}

fn read_payload(path: &Path) -> Result<Vec<u8>, ConfigError> {
    std::fs::read(path).map_err(|source| ConfigError::FileRead {
        path: PathBuf::from(path),
        source,
    })
}
