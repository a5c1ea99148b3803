//! Error types for julesync
//!
//! This module defines all error types used throughout the crate,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for julesync operations
///
/// Network and API failures are kept distinct so callers can decide whether a
/// retry is worthwhile: a `Network` error means no response was received at
/// all, while `Api` carries the status of a response that arrived but was not
/// successful.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The request never produced a response (DNS, connect, timeout, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code returned by the server
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// No API key is configured
    #[error("Not authenticated: no API key configured")]
    NotAuthenticated,

    /// An operation was invoked in a state that does not allow it
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key-value store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SyncError {
    /// Returns `true` for failures where no response was received.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Returns the HTTP status for [`SyncError::Api`] errors.
    pub fn api_status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Finds the [`SyncError`] carried by a propagated error, if any.
///
/// # Examples
///
/// ```
/// use julesync::error::{classify, SyncError};
///
/// let err: anyhow::Error = SyncError::NotAuthenticated.into();
/// assert!(matches!(classify(&err), Some(SyncError::NotAuthenticated)));
/// ```
pub fn classify(err: &anyhow::Error) -> Option<&SyncError> {
    err.chain().find_map(|cause| cause.downcast_ref::<SyncError>())
}

/// Result type alias for julesync operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_network_error_display() {
        let error = SyncError::Network("connection refused".to_string());
        assert_eq!(error.to_string(), "Network error: connection refused");
        assert!(error.is_network());
    }

    #[test]
    fn test_api_error_display() {
        let error = SyncError::Api {
            status: 404,
            message: "session not found".to_string(),
        };
        assert_eq!(error.to_string(), "API error (HTTP 404): session not found");
        assert_eq!(error.api_status(), Some(404));
        assert!(!error.is_network());
    }

    #[test]
    fn test_not_authenticated_display() {
        let error = SyncError::NotAuthenticated;
        assert!(error.to_string().contains("no API key"));
        assert_eq!(error.api_status(), None);
    }

    #[test]
    fn test_config_error_display() {
        let error = SyncError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_storage_error_display() {
        let error = SyncError::Storage("flush failed".to_string());
        assert_eq!(error.to_string(), "Storage error: flush failed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: SyncError = io_error.into();
        assert!(matches!(error, SyncError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: SyncError = json_error.into();
        assert!(matches!(error, SyncError::Serialization(_)));
    }

    #[test]
    fn test_classify_finds_error_behind_context() {
        let result: std::result::Result<(), SyncError> = Err(SyncError::Api {
            status: 500,
            message: "boom".to_string(),
        });
        let err = result.context("deleting session").unwrap_err();
        assert_eq!(classify(&err).and_then(SyncError::api_status), Some(500));
    }

    #[test]
    fn test_classify_returns_none_for_foreign_errors() {
        let err = anyhow::anyhow!("something else");
        assert!(classify(&err).is_none());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncError>();
    }
}
