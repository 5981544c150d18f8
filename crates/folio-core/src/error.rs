//! Error types for the data-access layer.

use folio_http::BackendError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FolioError>;

/// Input rejected before any network call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("Image is {size} bytes; the limit is {max} bytes")]
    ImageTooLarge { size: u64, max: u64 },

    #[error("File type {content_type} is not an image")]
    NotAnImage { content_type: String },

    #[error("Image file is empty")]
    EmptyImage,

    #[error("A project needs an image")]
    MissingImage,

    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    #[error("Email and password are required")]
    MissingCredentials,
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FolioError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("{what} {id} not found")]
    NotFound { what: &'static str, id: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Malformed row: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FolioError {
    /// Text safe to show the admin. Backend detail stays in the logs.
    pub fn user_message(&self) -> String {
        match self {
            FolioError::Validation(e) => e.to_string(),
            FolioError::NotFound { .. } => self.to_string(),
            FolioError::InvalidCredentials => {
                "Invalid credentials. Check your email and password.".to_string()
            }
            FolioError::Io(e) => format!("Could not read file: {}", e),
            FolioError::Backend(_) | FolioError::Decode(_) => {
                "The request failed. Please try again.".to_string()
            }
        }
    }

    #[inline]
    pub fn is_validation(&self) -> bool {
        matches!(self, FolioError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_shown_verbatim() {
        let err = FolioError::from(ValidationError::ImageTooLarge {
            size: 6 * 1024 * 1024,
            max: 5 * 1024 * 1024,
        });
        assert!(err.is_validation());
        assert_eq!(
            err.user_message(),
            "Image is 6291456 bytes; the limit is 5242880 bytes"
        );
    }

    #[test]
    fn test_backend_detail_is_hidden() {
        let err = FolioError::from(BackendError::Status {
            status: 500,
            message: "relation \"projects\" does not exist".into(),
        });
        assert!(!err.user_message().contains("relation"));
        assert!(err.to_string().contains("relation"));
    }
}
