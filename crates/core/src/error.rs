//! Error types for docbridge
//!
//! Every failure that reaches a caller is an [`Error`] carrying exactly one
//! member of the closed [`ErrorCode`] enumeration, a human-readable message and,
//! for store failures, the original failure description as its cause.
//!
//! Callers may branch on [`Error::code`]. The cause is kept for logs and
//! diagnostics only.
//!
//! | Category | Codes |
//! |----------|-------|
//! | Registry | `UnknownConnection`, `DuplicateConnection`, `ConnectionFailed` |
//! | Caller | `InvalidArgument`, `PermissionDenied`, `UnsupportedValueType` |
//! | Store | `Timeout` .. `InvalidCredentials`, `GenericStoreError` |
//! | Fallback | `Unclassified` |

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::failure::StoreFailure;

/// Result type alias for docbridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Closed set of stable failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Failure that matched no known category
    Unclassified,
    /// A cluster handle could not be established
    ConnectionFailed,
    /// Bad argument supplied by the caller or rejected by the store
    InvalidArgument,
    /// Caller lacks the role or group required for the operation
    PermissionDenied,
    /// Connection identifier is not registered
    UnknownConnection,
    /// Connection identifier is already registered
    DuplicateConnection,
    /// Value has no JSON representation
    UnsupportedValueType,
    /// Known store failure not otherwise classified
    GenericStoreError,
    /// Request or connect timed out
    Timeout,
    /// Store client is applying backpressure
    Backpressure,
    /// Request was cancelled before completion
    RequestCancelled,
    /// Store reported a temporary failure
    TemporaryFailure,
    /// Store server ran out of memory
    ServerOutOfMemory,
    /// Design document or view does not exist
    ViewNotFound,
    /// Document already exists
    DocumentAlreadyExists,
    /// Document does not exist
    DocumentNotFound,
    /// Request exceeded the store's size limit
    RequestTooLarge,
    /// Payload could not be encoded or decoded
    TranscodingError,
    /// Store rejected the supplied credentials
    InvalidCredentials,
}

impl ErrorCode {
    /// Every code, in stable-code order.
    pub const ALL: [ErrorCode; 19] = [
        ErrorCode::Unclassified,
        ErrorCode::ConnectionFailed,
        ErrorCode::InvalidArgument,
        ErrorCode::PermissionDenied,
        ErrorCode::UnknownConnection,
        ErrorCode::DuplicateConnection,
        ErrorCode::UnsupportedValueType,
        ErrorCode::GenericStoreError,
        ErrorCode::Timeout,
        ErrorCode::Backpressure,
        ErrorCode::RequestCancelled,
        ErrorCode::TemporaryFailure,
        ErrorCode::ServerOutOfMemory,
        ErrorCode::ViewNotFound,
        ErrorCode::DocumentAlreadyExists,
        ErrorCode::DocumentNotFound,
        ErrorCode::RequestTooLarge,
        ErrorCode::TranscodingError,
        ErrorCode::InvalidCredentials,
    ];

    /// The stable string code callers and logs refer to.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unclassified => "DOCB0000",
            ErrorCode::ConnectionFailed => "DOCB0001",
            ErrorCode::InvalidArgument => "DOCB0002",
            ErrorCode::PermissionDenied => "DOCB0003",
            ErrorCode::UnknownConnection => "DOCB0004",
            ErrorCode::DuplicateConnection => "DOCB0005",
            ErrorCode::UnsupportedValueType => "DOCB0006",
            ErrorCode::GenericStoreError => "DOCB0010",
            ErrorCode::Timeout => "DOCB0011",
            ErrorCode::Backpressure => "DOCB0012",
            ErrorCode::RequestCancelled => "DOCB0013",
            ErrorCode::TemporaryFailure => "DOCB0014",
            ErrorCode::ServerOutOfMemory => "DOCB0015",
            ErrorCode::ViewNotFound => "DOCB0016",
            ErrorCode::DocumentAlreadyExists => "DOCB0017",
            ErrorCode::DocumentNotFound => "DOCB0018",
            ErrorCode::RequestTooLarge => "DOCB0019",
            ErrorCode::TranscodingError => "DOCB0020",
            ErrorCode::InvalidCredentials => "DOCB0021",
        }
    }

    /// Short description of the category.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::Unclassified => "Unclassified error",
            ErrorCode::ConnectionFailed => "Unable to connect to cluster",
            ErrorCode::InvalidArgument => "Invalid argument",
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::UnknownConnection => "Unknown connection",
            ErrorCode::DuplicateConnection => "Connection already registered",
            ErrorCode::UnsupportedValueType => "Unsupported value type",
            ErrorCode::GenericStoreError => "Store error",
            ErrorCode::Timeout => "Timeout",
            ErrorCode::Backpressure => "Backpressure",
            ErrorCode::RequestCancelled => "Request cancelled",
            ErrorCode::TemporaryFailure => "Temporary failure",
            ErrorCode::ServerOutOfMemory => "Server out of memory",
            ErrorCode::ViewNotFound => "View does not exist",
            ErrorCode::DocumentAlreadyExists => "Document already exists",
            ErrorCode::DocumentNotFound => "Document does not exist",
            ErrorCode::RequestTooLarge => "Request too big",
            ErrorCode::TranscodingError => "Transcoding error",
            ErrorCode::InvalidCredentials => "Invalid credentials",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure carrying one stable [`ErrorCode`].
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{code}: {message}")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[source]
    cause: Option<StoreFailure>,
}

impl Error {
    /// Create an error without a cause
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Error {
            code,
            message: message.into(),
            cause: None,
        }
    }

    /// Create an error that keeps the original store failure as its cause
    pub fn with_cause(code: ErrorCode, message: impl Into<String>, cause: StoreFailure) -> Self {
        Error {
            code,
            message: message.into(),
            cause: Some(cause),
        }
    }

    /// The stable code
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The original failure, if any
    pub fn cause(&self) -> Option<&StoreFailure> {
        self.cause.as_ref()
    }

    /// Create an InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::new(ErrorCode::InvalidArgument, message)
    }

    /// Create an UnknownConnection error for `id`
    pub fn unknown_connection(id: &str) -> Self {
        Error::new(
            ErrorCode::UnknownConnection,
            format!("Unknown connection '{}'", id),
        )
    }

    /// Create a DuplicateConnection error for `id`
    pub fn duplicate_connection(id: &str) -> Self {
        Error::new(
            ErrorCode::DuplicateConnection,
            format!("Connection '{}' is already registered", id),
        )
    }

    /// Create a ConnectionFailed error for `id` caused by `failure`
    pub fn connection_failed(id: &str, failure: StoreFailure) -> Self {
        let message = format!("Unable to connect to '{}': {}", id, failure.message);
        Error::with_cause(ErrorCode::ConnectionFailed, message, failure)
    }

    /// Create an UnsupportedValueType error
    pub fn unsupported_value(message: impl Into<String>) -> Self {
        Error::new(ErrorCode::UnsupportedValueType, message)
    }

    /// Create a PermissionDenied error
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Error::new(ErrorCode::PermissionDenied, message)
    }

    /// Create a DocumentNotFound error for document `id`
    pub fn document_not_found(id: &str) -> Self {
        Error::new(
            ErrorCode::DocumentNotFound,
            format!("Document '{}' does not exist", id),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::FailureKind;
    use std::collections::HashSet;
    use std::error::Error as StdError;

    #[test]
    fn test_stable_codes_are_unique() {
        let codes: HashSet<&str> = ErrorCode::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(codes.len(), ErrorCode::ALL.len());
    }

    #[test]
    fn test_error_display_includes_code_and_message() {
        let err = Error::unknown_connection("c9");
        let msg = err.to_string();
        assert!(msg.starts_with("DOCB0004"));
        assert!(msg.contains("c9"));
    }

    #[test]
    fn test_error_without_cause_has_no_source() {
        let err = Error::invalid_argument("limit must be positive");
        assert!(err.cause().is_none());
        assert!(err.source().is_none());
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert_eq!(err.message(), "limit must be positive");
    }

    #[test]
    fn test_connection_failed_keeps_cause() {
        let failure = StoreFailure::new(FailureKind::Connection, "connection refused");
        let err = Error::connection_failed("c1", failure.clone());

        assert_eq!(err.code(), ErrorCode::ConnectionFailed);
        assert!(err.message().contains("connection refused"));
        assert_eq!(err.cause(), Some(&failure));
        let source = err.source().unwrap();
        assert!(source.to_string().contains("connection refused"));
    }

    #[test]
    fn test_error_pattern_matching() {
        let err = Error::document_not_found("doc-1");
        match err.code() {
            ErrorCode::DocumentNotFound => {}
            other => panic!("Wrong code {:?}", other),
        }
    }
}
