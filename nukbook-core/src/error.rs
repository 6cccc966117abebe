//! Error types for nukBook Core

use thiserror::Error;

/// Result type alias using NukbookError
pub type Result<T> = std::result::Result<T, NukbookError>;

/// Sentinel message used when an authenticated call is attempted without a token
pub const NO_TOKEN: &str = "NO_TOKEN";

/// Top-level error type for all nukBook client operations
#[derive(Debug, Error)]
pub enum NukbookError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{}", NO_TOKEN)]
    MissingToken,

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a failure should be treated by a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// 401 or no token: the session is gone
    Unauthenticated,
    /// 403: logged in but not allowed
    Forbidden,
    /// 404
    NotFound,
    /// Everything else
    Other,
}

impl NukbookError {
    /// HTTP status, when the failure came from the API
    pub fn status(&self) -> Option<u16> {
        match self {
            NukbookError::Api(e) => Some(e.status),
            _ => None,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            NukbookError::MissingToken => ErrorClass::Unauthenticated,
            NukbookError::Api(e) => e.class(),
            _ => ErrorClass::Other,
        }
    }
}

/// A non-2xx answer from the API
///
/// The message already carries the method, path, status and whatever detail
/// the server sent, e.g. `POST /shelves/3/books/9 failed: 404 Book not found`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Build the error for a failed request, appending the server detail if any
    pub fn for_request(method: &str, path: &str, status: u16, detail: &str) -> Self {
        let message = if detail.is_empty() {
            format!("{} {} failed: {}", method, path, status)
        } else {
            format!("{} {} failed: {} {}", method, path, status, detail)
        };
        Self::new(status, message)
    }

    pub fn class(&self) -> ErrorClass {
        match self.status {
            401 => ErrorClass::Unauthenticated,
            403 => ErrorClass::Forbidden,
            404 => ErrorClass::NotFound,
            _ => ErrorClass::Other,
        }
    }
}

/// Errors that occur in the persistent key/value storage
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_message_with_detail() {
        let err = ApiError::for_request("GET", "/books/9", 404, "Book not found");
        assert_eq!(err.to_string(), "GET /books/9 failed: 404 Book not found");
        assert_eq!(err.class(), ErrorClass::NotFound);
    }

    #[test]
    fn test_request_message_without_detail() {
        let err = ApiError::for_request("DELETE", "/shelves/1", 500, "");
        assert_eq!(err.to_string(), "DELETE /shelves/1 failed: 500");
    }

    #[test]
    fn test_missing_token_is_unauthenticated() {
        let err = NukbookError::MissingToken;
        assert_eq!(err.to_string(), "NO_TOKEN");
        assert_eq!(err.class(), ErrorClass::Unauthenticated);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_forbidden_class() {
        let err: NukbookError = ApiError::new(403, "nope").into();
        assert_eq!(err.class(), ErrorClass::Forbidden);
        assert_eq!(err.status(), Some(403));
    }
}
