//! Error types for the AIDA client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the AIDA client crates.
///
/// Transport failures keep enough structure (network vs. timeout vs. HTTP
/// status) for the retry wrapper to classify them.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AidaError {
    /// Missing or unusable configuration (blocked before any remote call)
    #[error("Configuration error: {0}")]
    Config(String),

    /// User-supplied value rejected by validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Connection-level failure (DNS, refused, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// The call did not complete within its time budget
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The transport answered with a non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The remote procedure reported a failure
    #[error("Server error: {0}")]
    Server(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// IO error (configuration files)
    #[error("IO error: {message}")]
    Io { message: String },
}

impl AidaError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::Server(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a failed call is worth sending again.
    ///
    /// Returns true for:
    /// - network-class errors
    /// - errors whose message mentions `timeout`
    /// - HTTP statuses in `[500, 600)`
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Http { status, .. } if (500..600).contains(status) => true,
            other => other.detail().contains("timeout"),
        }
    }

    /// The message without the variant prefix, for user-facing alerts.
    pub fn detail(&self) -> String {
        match self {
            Self::Config(m)
            | Self::Validation(m)
            | Self::Network(m)
            | Self::Timeout(m)
            | Self::Server(m) => m.clone(),
            Self::Http { message, .. } | Self::Io { message } => message.clone(),
            Self::Serialization { message, .. } => message.clone(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for AidaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for AidaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for AidaError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for AidaError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, AidaError>`.
pub type Result<T> = std::result::Result<T, AidaError>;
