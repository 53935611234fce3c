//! Failure descriptions raised by the external store client.
//!
//! The store client reports failures as a type tag plus a message. Known tags
//! are listed in [`FailureKind`]; anything else travels as
//! [`FailureKind::Other`] with its original tag so it can still be logged.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Type tag of a store client failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// Client rejected an argument
    InvalidArgument,
    /// Seed nodes unreachable or connection dropped
    Connection,
    /// Operation timed out
    Timeout,
    /// Client request queue is full
    Backpressure,
    /// Request was cancelled
    RequestCancelled,
    /// Server asked the client to retry later
    TemporaryFailure,
    /// Server is out of memory
    OutOfMemory,
    /// Design document or view does not exist
    ViewNotFound,
    /// Document id is already taken
    DocumentExists,
    /// Document id does not exist
    DocumentNotFound,
    /// Request is larger than the server accepts
    RequestTooBig,
    /// Encoding or decoding failed
    Transcoding,
    /// Bucket or cluster credentials rejected
    InvalidPassword,
    /// Any other failure raised by the store client itself
    Store,
    /// Failure from outside the store client, tagged with its origin
    Other(String),
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidArgument => f.write_str("invalid-argument"),
            FailureKind::Connection => f.write_str("connection"),
            FailureKind::Timeout => f.write_str("timeout"),
            FailureKind::Backpressure => f.write_str("backpressure"),
            FailureKind::RequestCancelled => f.write_str("request-cancelled"),
            FailureKind::TemporaryFailure => f.write_str("temporary-failure"),
            FailureKind::OutOfMemory => f.write_str("out-of-memory"),
            FailureKind::ViewNotFound => f.write_str("view-not-found"),
            FailureKind::DocumentExists => f.write_str("document-exists"),
            FailureKind::DocumentNotFound => f.write_str("document-not-found"),
            FailureKind::RequestTooBig => f.write_str("request-too-big"),
            FailureKind::Transcoding => f.write_str("transcoding"),
            FailureKind::InvalidPassword => f.write_str("invalid-password"),
            FailureKind::Store => f.write_str("store"),
            FailureKind::Other(tag) => write!(f, "other({})", tag),
        }
    }
}

/// A failure reported by the store client: type tag plus message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{kind}: {message}")]
pub struct StoreFailure {
    /// What kind of failure this is
    pub kind: FailureKind,
    /// Message as reported by the client
    pub message: String,
}

impl StoreFailure {
    /// Create a failure description
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        StoreFailure {
            kind,
            message: message.into(),
        }
    }

    /// Create a failure of an unrecognized kind
    pub fn other(tag: impl Into<String>, message: impl Into<String>) -> Self {
        StoreFailure::new(FailureKind::Other(tag.into()), message)
    }
}

impl From<serde_json::Error> for StoreFailure {
    fn from(e: serde_json::Error) -> Self {
        StoreFailure::new(FailureKind::Transcoding, e.to_string())
    }
}

impl From<std::io::Error> for StoreFailure {
    fn from(e: std::io::Error) -> Self {
        StoreFailure::other("io", e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display() {
        let failure = StoreFailure::new(FailureKind::Timeout, "no response after 2500ms");
        assert_eq!(failure.to_string(), "timeout: no response after 2500ms");

        let failure = StoreFailure::other("NullPointer", "boom");
        assert_eq!(failure.to_string(), "other(NullPointer): boom");
    }

    #[test]
    fn test_from_json_error_is_transcoding() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let failure: StoreFailure = err.into();
        assert_eq!(failure.kind, FailureKind::Transcoding);
    }

    #[test]
    fn test_from_io_error_is_other() {
        let err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let failure: StoreFailure = err.into();
        assert_eq!(failure.kind, FailureKind::Other("io".to_string()));
        assert_eq!(failure.message, "pipe closed");
    }
}
