//! Error types for location lookups
//!
//! - [`SourceError`]: a single call to a [`LocationSource`](crate::LocationSource) failed
//! - [`LocationResolutionError`]: reverse resolution of a leaf aborted

use crate::level::LocationLevel;
use crate::node::LocationId;

/// Errors raised by a location source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Request could not be sent or the body could not be read
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("unexpected status {status} from {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Payload did not have the expected shape
    #[error("malformed {level} payload: {message}")]
    Decode {
        /// Level being decoded
        level: LocationLevel,
        /// What was wrong
        message: String,
    },

    /// Point lookup found nothing
    #[error("{level} '{id}' not found")]
    NotFound {
        /// Level looked up
        level: LocationLevel,
        /// Identifier looked up
        id: LocationId,
    },

    /// Node below the province tier came back without a parent reference
    #[error("{level} '{id}' has no parent reference")]
    MissingParent {
        /// Level of the orphan node
        level: LocationLevel,
        /// Identifier of the orphan node
        id: LocationId,
    },

    /// Base URL cannot be used to build endpoint URLs
    #[error("invalid base url: {0}")]
    InvalidUrl(String),

    /// Source is temporarily unable to answer
    #[error("location source unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    /// Create status error
    pub fn status(status: u16, url: impl Into<String>) -> Self {
        Self::Status {
            status,
            url: url.into(),
        }
    }

    /// Create decode error
    pub fn decode(level: LocationLevel, message: impl Into<String>) -> Self {
        Self::Decode {
            level,
            message: message.into(),
        }
    }

    /// Check if retrying the same call could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Unavailable(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Decode { .. }
            | Self::NotFound { .. }
            | Self::MissingParent { .. }
            | Self::InvalidUrl(_) => false,
        }
    }
}

/// Reverse resolution of a locality aborted
///
/// Carries the level whose lookup failed. No partial chain accompanies it.
#[derive(Debug, thiserror::Error)]
pub enum LocationResolutionError {
    /// A point lookup along the chain failed
    #[error("{level} lookup failed: {source}")]
    LookupFailed {
        /// Level whose lookup failed
        level: LocationLevel,
        /// Underlying source error
        #[source]
        source: SourceError,
    },
}

impl LocationResolutionError {
    /// Create lookup failure for level
    pub fn lookup_failed(level: LocationLevel, source: SourceError) -> Self {
        Self::LookupFailed { level, source }
    }

    /// Level whose lookup failed
    #[inline]
    #[must_use]
    pub fn level(&self) -> LocationLevel {
        match self {
            Self::LookupFailed { level, .. } => *level,
        }
    }
}

/// Result type alias for source calls
pub type SourceResult<T> = Result<T, SourceError>;
