//! Error types for transport operations.

use std::fmt;

use thiserror::Error;

/// Connection-level failure classification.
///
/// Mirrors the socket error codes a transport can observe. The request
/// engine uses it both to decide whether a failure is retryable and to
/// pick the error type reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionCode {
    /// Host name could not be resolved.
    DnsLookup,
    /// Peer reset the connection.
    ConnectionReset,
    /// The attempt exceeded its deadline.
    TimedOut,
    /// Peer refused the connection.
    ConnectionRefused,
    /// Write to a closed connection.
    BrokenPipe,
    /// Anything the transport could not classify.
    Other,
}

impl ConnectionCode {
    /// Returns true for codes that are transient and safe to retry.
    ///
    /// Broken pipes and unclassified failures are not retried.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(
            self,
            Self::DnsLookup | Self::ConnectionReset | Self::TimedOut | Self::ConnectionRefused
        )
    }

    /// Returns the conventional socket error name for this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DnsLookup => "ENOTFOUND",
            Self::ConnectionReset => "ECONNRESET",
            Self::TimedOut => "ETIMEDOUT",
            Self::ConnectionRefused => "ECONNREFUSED",
            Self::BrokenPipe => "EPIPE",
            Self::Other => "EUNKNOWN",
        }
    }

    /// Classifies an I/O error kind.
    #[must_use]
    pub const fn from_io_kind(kind: std::io::ErrorKind) -> Self {
        match kind {
            std::io::ErrorKind::ConnectionRefused => Self::ConnectionRefused,
            std::io::ErrorKind::ConnectionReset | std::io::ErrorKind::ConnectionAborted => {
                Self::ConnectionReset
            }
            std::io::ErrorKind::TimedOut => Self::TimedOut,
            std::io::ErrorKind::BrokenPipe => Self::BrokenPipe,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for ConnectionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for transport operations.
///
/// Describes what went wrong on the wire without dictating recovery
/// strategy; the request engine decides whether to retry.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, refused and reset
    /// connections, and other network-level errors.
    #[error("Connection error ({code}): {source}")]
    Connection {
        /// Classified failure code
        code: ConnectionCode,
        /// Underlying transport error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Request timed out.
    ///
    /// The server did not respond within the configured timeout period.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl TransportError {
    /// Creates a connection error with the given classification.
    pub fn connection(
        code: ConnectionCode,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Connection {
            code,
            source: source.into(),
        }
    }

    /// Returns the connection code describing this failure.
    #[must_use]
    pub const fn code(&self) -> ConnectionCode {
        match self {
            Self::Connection { code, .. } => *code,
            Self::Timeout => ConnectionCode::TimedOut,
            Self::InvalidUrl(_) => ConnectionCode::Other,
        }
    }
}
