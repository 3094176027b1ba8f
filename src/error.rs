//! Structured errors surfaced by the request engine.
//!
//! Every failure of a logical request, whether an HTTP error status or a
//! transport fault, is normalized into one [`ApiError`] carrying a closed
//! [`ErrorType`] tag plus whatever detail the remote API supplied.

use std::fmt;
use std::str::FromStr;

use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::ConfigError;
use crate::transport::{ConnectionCode, TransportError};

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

/// Closed set of error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Server-side failure or an unrecognised status.
    ApiError,
    /// Missing or invalid API key.
    AuthenticationError,
    /// The card was declined or could not be charged.
    CardError,
    /// An idempotency key was reused with different parameters.
    IdempotencyError,
    /// Malformed request or invalid parameters.
    InvalidRequestError,
    /// Too many requests.
    RateLimitError,
    /// Request was well-formed but semantically rejected.
    ValidationError,
    /// The key lacks permission for the resource.
    PermissionError,
    /// Connection-level failure.
    NetworkError,
    /// The resource does not exist.
    NotFoundError,
    /// The attempt exceeded its deadline.
    TimeoutError,
    /// Client-side misconfiguration.
    ConfigurationError,
}

impl ErrorType {
    /// All error types, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::ApiError,
        Self::AuthenticationError,
        Self::CardError,
        Self::IdempotencyError,
        Self::InvalidRequestError,
        Self::RateLimitError,
        Self::ValidationError,
        Self::PermissionError,
        Self::NetworkError,
        Self::NotFoundError,
        Self::TimeoutError,
        Self::ConfigurationError,
    ];

    /// Returns the wire tag for this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApiError => "api_error",
            Self::AuthenticationError => "authentication_error",
            Self::CardError => "card_error",
            Self::IdempotencyError => "idempotency_error",
            Self::InvalidRequestError => "invalid_request_error",
            Self::RateLimitError => "rate_limit_error",
            Self::ValidationError => "validation_error",
            Self::PermissionError => "permission_error",
            Self::NetworkError => "network_error",
            Self::NotFoundError => "not_found_error",
            Self::TimeoutError => "timeout_error",
            Self::ConfigurationError => "configuration_error",
        }
    }

    /// Derives the type from an HTTP status.
    #[must_use]
    pub const fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            400 => Self::InvalidRequestError,
            401 => Self::AuthenticationError,
            403 => Self::PermissionError,
            404 => Self::NotFoundError,
            409 => Self::IdempotencyError,
            422 => Self::ValidationError,
            429 => Self::RateLimitError,
            _ => Self::ApiError,
        }
    }

    /// Derives the type from a connection failure code.
    #[must_use]
    pub const fn from_connection_code(code: ConnectionCode) -> Self {
        match code {
            ConnectionCode::TimedOut => Self::TimeoutError,
            ConnectionCode::DnsLookup
            | ConnectionCode::ConnectionReset
            | ConnectionCode::ConnectionRefused
            | ConnectionCode::BrokenPipe
            | ConnectionCode::Other => Self::NetworkError,
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a tag is outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error type '{0}'")]
pub struct UnknownErrorType(pub String);

impl FromStr for ErrorType {
    type Err = UnknownErrorType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownErrorType(s.to_string()))
    }
}

/// Normalized, immutable representation of a failed request.
///
/// Callers branch on [`ApiError::error_type`] or the `is_*` predicates
/// instead of matching on messages.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
    error_type: ErrorType,
    code: Option<String>,
    status: Option<StatusCode>,
    request_id: Option<String>,
    param: Option<String>,
    doc_url: Option<String>,
    decline_code: Option<String>,
    charge_id: Option<String>,
    headers: Option<HeaderMap>,
}

impl ApiError {
    /// Creates an error with only a type and message.
    pub fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type,
            code: None,
            status: None,
            request_id: None,
            param: None,
            doc_url: None,
            decline_code: None,
            charge_id: None,
            headers: None,
        }
    }

    /// Creates a `configuration_error`.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorType::ConfigurationError, message)
    }

    /// Builds the error for a non-2xx response.
    ///
    /// The body may be `{"error": {...}}`, a flat object, a JSON string or
    /// plain text. Anything unusable yields `HTTP <status> Error`. A `type`
    /// from the body wins over the status-derived type when it is known.
    #[must_use]
    pub fn from_response(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Self {
        let detail = parse_error_body(body);
        let error_type = detail
            .error_type
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or_else(|| ErrorType::from_status(status));
        let message = detail
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP {} Error", status.as_u16()));

        Self {
            message,
            error_type,
            code: detail.code,
            status: Some(status),
            request_id: request_id_from(headers),
            param: detail.param,
            doc_url: detail.doc_url,
            decline_code: detail.decline_code,
            charge_id: detail.charge_id,
            headers: Some(headers.clone()),
        }
    }

    /// Builds the error for a transport failure.
    #[must_use]
    pub fn from_transport(error: &TransportError) -> Self {
        let code = error.code();
        let mut api_error = Self::new(ErrorType::from_connection_code(code), error.to_string());
        api_error.code = Some(code.as_str().to_string());
        api_error
    }

    /// Attaches a machine-readable code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attaches the HTTP status.
    #[must_use]
    pub const fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches the request identifier.
    #[must_use]
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Error category.
    #[must_use]
    pub const fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// Machine-readable code, from the API body or the transport.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// HTTP status, when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Request identifier assigned by the API.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Name of the offending parameter.
    #[must_use]
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }

    /// Link to documentation about this error.
    #[must_use]
    pub fn doc_url(&self) -> Option<&str> {
        self.doc_url.as_deref()
    }

    /// Issuer decline code for card errors.
    #[must_use]
    pub fn decline_code(&self) -> Option<&str> {
        self.decline_code.as_deref()
    }

    /// Charge associated with a card error.
    #[must_use]
    pub fn charge_id(&self) -> Option<&str> {
        self.charge_id.as_deref()
    }

    /// Response headers, when a response was received.
    #[must_use]
    pub const fn headers(&self) -> Option<&HeaderMap> {
        self.headers.as_ref()
    }

    /// True for failures that may succeed if repeated.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self.error_type,
            ErrorType::ApiError
                | ErrorType::NetworkError
                | ErrorType::TimeoutError
                | ErrorType::RateLimitError
        )
    }

    /// True when the API key was rejected.
    #[must_use]
    pub const fn is_authentication_error(&self) -> bool {
        matches!(self.error_type, ErrorType::AuthenticationError)
    }

    /// True when the request parameters were rejected.
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(
            self.error_type,
            ErrorType::ValidationError | ErrorType::InvalidRequestError
        )
    }

    /// True when the API throttled the request.
    #[must_use]
    pub const fn is_rate_limit_error(&self) -> bool {
        matches!(self.error_type, ErrorType::RateLimitError)
    }
}

impl From<ConfigError> for ApiError {
    fn from(e: ConfigError) -> Self {
        Self::configuration(e.to_string())
    }
}

/// Extracts the request id, accepting either header spelling.
pub(crate) fn request_id_from(headers: &HeaderMap) -> Option<String> {
    ["x-request-id", "request-id"]
        .into_iter()
        .find_map(|name| headers.get(name))
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Fields an error body may carry.
///
/// Numbers and booleans are accepted as text so that one oddly typed field
/// does not discard the rest of the body.
#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(default, deserialize_with = "lenient_text")]
    message: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    error_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    code: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    param: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    doc_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    decline_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    charge_id: Option<String>,
}

/// Reads a scalar as text; null, arrays and objects read as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// The accepted error body shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorEnvelope {
    Nested { error: ErrorDetail },
    Text(String),
    Flat(ErrorDetail),
}

/// Parses an error body in any of the accepted shapes.
fn parse_error_body(body: &[u8]) -> ErrorDetail {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope::Nested { error }) => error,
        Ok(ErrorEnvelope::Flat(detail)) => detail,
        Ok(ErrorEnvelope::Text(message)) => ErrorDetail {
            message: Some(message),
            ..ErrorDetail::default()
        },
        // Non-JSON text becomes the message; broken JSON does not.
        Err(_) => ErrorDetail {
            message: std::str::from_utf8(body)
                .ok()
                .map(str::trim)
                .filter(|t| !t.is_empty() && !t.starts_with('{') && !t.starts_with('['))
                .map(ToString::to_string),
            ..ErrorDetail::default()
        },
    }
}
