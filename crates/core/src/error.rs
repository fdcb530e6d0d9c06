//! Error types for the campus assistant.
//!
//! This module defines a unified error enum covering all error categories in
//! the application: caller input, configuration, vector storage, and remote
//! provider failures.

use thiserror::Error;

/// Unified error type for the campus assistant.
///
/// All functions in the application return `Result<T, AppError>`.
/// We never panic: errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (missing credentials, bad config file).
    /// Fatal at startup; the pipeline is never constructed with one pending.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bad caller input (empty query, malformed document record).
    /// Surfaced immediately, never retried.
    #[error("Invalid input: {0}")]
    Input(String),

    /// Vector index errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Embedding or completion provider errors
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors from the vector index backend.
///
/// Distinguishes "not connected/initialized" from "provider rejected the
/// request" so indexing callers can tell misuse from remote failure.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing index has not been created or connected yet.
    #[error("vector index not connected: {0}")]
    NotConnected(String),

    /// The index provider rejected an otherwise well-formed request.
    #[error("vector index rejected request: {0}")]
    Rejected(String),

    /// A batch within a bulk upsert failed. Names the offending record
    /// range so the caller knows exactly what was not stored.
    #[error("upsert batch failed for records {start}..{end}: {message}")]
    BatchFailed {
        start: usize,
        end: usize,
        message: String,
    },
}

/// Errors from the embedding or completion providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider returned HTTP 429.
    #[error("provider rate limited the request")]
    RateLimited,

    /// Credentials were rejected (HTTP 401/403).
    #[error("provider authentication failed: {0}")]
    Auth(String),

    /// The request did not complete within the transport timeout.
    #[error("provider request timed out")]
    Timeout,

    /// Any other provider-side failure.
    #[error("provider error: {0}")]
    Other(String),
}

impl ProviderError {
    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Timeout)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_provider_errors() {
        assert!(ProviderError::RateLimited.is_transient());
        assert!(ProviderError::Timeout.is_transient());
        assert!(!ProviderError::Auth("bad key".to_string()).is_transient());
        assert!(!ProviderError::Other("boom".to_string()).is_transient());
    }

    #[test]
    fn test_batch_failed_names_range() {
        let err = StorageError::BatchFailed {
            start: 100,
            end: 200,
            message: "payload too large".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("100..200"));
        assert!(text.contains("payload too large"));
    }

    #[test]
    fn test_app_error_wraps_storage() {
        let err: AppError = StorageError::NotConnected("call ensure_index first".to_string()).into();
        assert!(matches!(err, AppError::Storage(StorageError::NotConnected(_))));
    }
}
