//! Error types for permission vocabulary parsing
//!
//! The codec itself is lenient and never fails; these errors surface only when
//! a caller parses a single scope or action token explicitly.

/// Errors while parsing permission vocabulary from text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    /// Action token outside the closed vocabulary
    #[error("unknown action: '{0}'")]
    UnknownAction(String),

    /// Scope token other than `nasional` / `wilayah`
    #[error("unknown scope: '{0}'")]
    UnknownScope(String),

    /// Flat entry with no recognised `_<action>` suffix or an empty module
    #[error("malformed permission entry: '{0}'")]
    MalformedEntry(String),
}

/// Result type alias for permission parsing
pub type PermissionResult<T> = Result<T, PermissionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PermissionError::UnknownAction("approve".to_string());
        assert_eq!(err.to_string(), "unknown action: 'approve'");

        let err = PermissionError::UnknownScope("global".to_string());
        assert_eq!(err.to_string(), "unknown scope: 'global'");
    }
}
