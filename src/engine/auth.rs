//! API key credential.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use http::HeaderValue;

use crate::config::ConfigError;

/// Class of an API key, derived from its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Full-access server-side key (`sk_`).
    Secret,
    /// Restricted key safe to embed in clients (`pk_`).
    Public,
}

impl KeyKind {
    /// Prefix carried by keys of this kind.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Secret => ApiKey::SECRET_PREFIX,
            Self::Public => ApiKey::PUBLIC_PREFIX,
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secret => f.write_str("secret"),
            Self::Public => f.write_str("public"),
        }
    }
}

/// A validated API key.
///
/// `Debug` and `Display` mask everything except the prefix and the last
/// four characters.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    key: String,
    kind: KeyKind,
}

impl ApiKey {
    /// Prefix of secret keys.
    pub const SECRET_PREFIX: &'static str = "sk_";

    /// Prefix of public keys.
    pub const PUBLIC_PREFIX: &'static str = "pk_";

    /// Validates and wraps a key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiKey`] if the key is empty, contains
    /// whitespace or control characters, or lacks a recognised prefix.
    pub fn parse(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();

        if key.is_empty() {
            return Err(ConfigError::InvalidApiKey {
                reason: "must not be empty",
            });
        }

        if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ConfigError::InvalidApiKey {
                reason: "must not contain whitespace",
            });
        }

        let kind = if key.starts_with(Self::SECRET_PREFIX) {
            KeyKind::Secret
        } else if key.starts_with(Self::PUBLIC_PREFIX) {
            KeyKind::Public
        } else {
            return Err(ConfigError::InvalidApiKey {
                reason: "must start with 'sk_' or 'pk_'",
            });
        };

        Ok(Self { key, kind })
    }

    /// The raw key.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.key
    }

    /// Whether this is a secret or public key.
    #[must_use]
    pub const fn kind(&self) -> KeyKind {
        self.kind
    }

    /// `Authorization` header value: Basic auth with the key as username
    /// and an empty password.
    ///
    /// The returned value is marked sensitive.
    #[must_use]
    pub fn basic_auth_header(&self) -> HeaderValue {
        let encoded = STANDARD.encode(format!("{}:", self.key));
        // Base64 output is always a valid header value.
        let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
            .unwrap_or_else(|_| HeaderValue::from_static("Basic"));
        value.set_sensitive(true);
        value
    }

    fn masked(&self) -> String {
        let tail: String = self
            .key
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        if self.key.len() <= self.kind.prefix().len() + 4 {
            format!("{}****", self.kind.prefix())
        } else {
            format!("{}****{tail}", self.kind.prefix())
        }
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.masked()).finish()
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}
