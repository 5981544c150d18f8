//! Error types for backend operations.

use thiserror::Error;

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Errors that can occur while talking to the hosted backend.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected response: {0}")]
    Protocol(String),
}

impl BackendError {
    /// Check if this is an access denied error.
    #[inline]
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        match self {
            BackendError::Unauthorized(_) => true,
            BackendError::Status { status, .. } => crate::types::is_access_denied_status(*status),
            _ => false,
        }
    }

    /// Status code carried by the error, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_denied_status() {
        let err = BackendError::Status {
            status: 403,
            message: "forbidden".into(),
        };
        assert!(err.is_access_denied());
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn test_http_error_has_no_status() {
        let err = BackendError::Http("connection refused".into());
        assert!(!err.is_access_denied());
        assert_eq!(err.status(), None);
    }
}
