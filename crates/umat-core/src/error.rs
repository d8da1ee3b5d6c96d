//! Error types for the admin toolkit
//!
//! [`AdminError`] aggregates the errors of the location and permission crates
//! together with configuration and telemetry failures.

use std::path::PathBuf;
use umat_location::{LocationResolutionError, SourceError};
use umat_permission::PermissionError;

/// Main admin toolkit error type
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// Configuration value rejected
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read
    #[error("cannot read config {}: {source}", path.display())]
    ConfigIo {
        /// File that was requested
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`AdminConfig`](crate::AdminConfig)
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// HTTP client could not be built
    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Location source failed
    #[error("location source error: {0}")]
    Source(#[from] SourceError),

    /// Reverse location resolution failed
    #[error("location resolution error: {0}")]
    Resolution(#[from] LocationResolutionError),

    /// Permission text could not be parsed
    #[error("permission error: {0}")]
    Permission(#[from] PermissionError),

    /// Tracing subscriber could not be installed
    #[error("telemetry error: {0}")]
    Telemetry(String),
}

impl AdminError {
    /// Create configuration error
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if the failed operation may succeed when retried
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Source(source) => source.is_retryable(),
            Self::Resolution(LocationResolutionError::LookupFailed { source, .. }) => {
                source.is_retryable()
            }
            _ => false,
        }
    }
}

/// Result type for admin toolkit operations
pub type AdminResult<T> = Result<T, AdminError>;
