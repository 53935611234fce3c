//! Translation of store client failures into stable error codes.
//!
//! [`translate`] is the single place where the open set of client failures
//! becomes the closed [`ErrorCode`] set. Handlers route every failure through
//! it; nothing downstream inspects [`FailureKind`] again.
//!
//! Classification is checked most specific first:
//!
//! 1. Already translated errors pass through unchanged
//! 2. Known failure kinds map to their own code
//! 3. Everything else becomes `Unclassified`

use tracing::error;

use crate::error::{Error, ErrorCode};
use crate::failure::{FailureKind, StoreFailure};

/// Anything a handler may need to translate.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// A failure that already carries a stable code
    Translated(Error),
    /// A failure reported by the store client
    Store(StoreFailure),
}

impl From<Error> for Failure {
    fn from(e: Error) -> Self {
        Failure::Translated(e)
    }
}

impl From<StoreFailure> for Failure {
    fn from(f: StoreFailure) -> Self {
        Failure::Store(f)
    }
}

impl From<serde_json::Error> for Failure {
    fn from(e: serde_json::Error) -> Self {
        Failure::Store(e.into())
    }
}

impl From<std::io::Error> for Failure {
    fn from(e: std::io::Error) -> Self {
        Failure::Store(e.into())
    }
}

/// Translate a failure raised while running `context`.
///
/// Always yields an error; callers return it as `Err`. The original failure is
/// logged at error level whatever its category.
pub fn translate(context: &str, failure: impl Into<Failure>) -> Error {
    match failure.into() {
        Failure::Translated(err) => {
            error!(
                target: "docbridge::translate",
                context,
                code = %err.code(),
                cause = ?err.cause(),
                "{}",
                err.message()
            );
            err
        }
        Failure::Store(failure) => {
            error!(
                target: "docbridge::translate",
                context,
                kind = %failure.kind,
                "{}",
                failure.message
            );
            classify(failure)
        }
    }
}

/// Stable code for a store failure kind.
pub fn code_for(kind: &FailureKind) -> ErrorCode {
    match kind {
        FailureKind::InvalidArgument => ErrorCode::InvalidArgument,
        FailureKind::Connection => ErrorCode::ConnectionFailed,
        FailureKind::Timeout => ErrorCode::Timeout,
        FailureKind::Backpressure => ErrorCode::Backpressure,
        FailureKind::RequestCancelled => ErrorCode::RequestCancelled,
        FailureKind::TemporaryFailure => ErrorCode::TemporaryFailure,
        FailureKind::OutOfMemory => ErrorCode::ServerOutOfMemory,
        FailureKind::ViewNotFound => ErrorCode::ViewNotFound,
        FailureKind::DocumentExists => ErrorCode::DocumentAlreadyExists,
        FailureKind::DocumentNotFound => ErrorCode::DocumentNotFound,
        FailureKind::RequestTooBig => ErrorCode::RequestTooLarge,
        FailureKind::Transcoding => ErrorCode::TranscodingError,
        FailureKind::InvalidPassword => ErrorCode::InvalidCredentials,
        FailureKind::Store => ErrorCode::GenericStoreError,
        FailureKind::Other(_) => ErrorCode::Unclassified,
    }
}

fn classify(failure: StoreFailure) -> Error {
    let code = code_for(&failure.kind);
    match failure.kind {
        // caller-facing messages, the cause adds nothing
        FailureKind::InvalidArgument | FailureKind::InvalidPassword => {
            Error::new(code, failure.message)
        }
        _ => {
            let message = failure.message.clone();
            Error::with_cause(code, message, failure)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(kind: FailureKind) -> StoreFailure {
        StoreFailure::new(kind, "client said no")
    }

    #[test]
    fn test_known_kinds_map_to_their_codes() {
        let cases = [
            (FailureKind::InvalidArgument, ErrorCode::InvalidArgument),
            (FailureKind::Connection, ErrorCode::ConnectionFailed),
            (FailureKind::Timeout, ErrorCode::Timeout),
            (FailureKind::Backpressure, ErrorCode::Backpressure),
            (FailureKind::RequestCancelled, ErrorCode::RequestCancelled),
            (FailureKind::TemporaryFailure, ErrorCode::TemporaryFailure),
            (FailureKind::OutOfMemory, ErrorCode::ServerOutOfMemory),
            (FailureKind::ViewNotFound, ErrorCode::ViewNotFound),
            (FailureKind::DocumentExists, ErrorCode::DocumentAlreadyExists),
            (FailureKind::DocumentNotFound, ErrorCode::DocumentNotFound),
            (FailureKind::RequestTooBig, ErrorCode::RequestTooLarge),
            (FailureKind::Transcoding, ErrorCode::TranscodingError),
            (FailureKind::InvalidPassword, ErrorCode::InvalidCredentials),
            (FailureKind::Store, ErrorCode::GenericStoreError),
        ];
        for (kind, code) in cases {
            let err = translate("get", store(kind.clone()));
            assert_eq!(err.code(), code, "kind {:?}", kind);
            assert_eq!(err.message(), "client said no");
        }
    }

    #[test]
    fn test_unrecognized_kind_is_unclassified() {
        let err = translate("query", StoreFailure::other("NullPointerException", "npe"));
        assert_eq!(err.code(), ErrorCode::Unclassified);
        assert_eq!(
            err.cause().map(|c| c.kind.clone()),
            Some(FailureKind::Other("NullPointerException".to_string()))
        );
    }

    #[test]
    fn test_translating_twice_does_not_rewrap() {
        let first = translate("upsert", store(FailureKind::DocumentExists));
        let second = translate("upsert", first.clone());
        assert_eq!(second, first);
        assert_eq!(second.code(), ErrorCode::DocumentAlreadyExists);
    }

    #[test]
    fn test_registry_errors_pass_through() {
        let err = translate("get", Error::unknown_connection("nope"));
        assert_eq!(err.code(), ErrorCode::UnknownConnection);
    }

    #[test]
    fn test_cause_kept_for_store_failures() {
        let err = translate("get", store(FailureKind::Timeout));
        assert_eq!(err.cause().map(|c| &c.kind), Some(&FailureKind::Timeout));
    }

    #[test]
    fn test_password_failure_drops_cause() {
        let err = translate("open-bucket", store(FailureKind::InvalidPassword));
        assert!(err.cause().is_none());
    }

    #[test]
    fn test_io_and_json_conversions() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        assert_eq!(translate("read", io).code(), ErrorCode::Unclassified);

        let json = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        assert_eq!(translate("decode", json).code(), ErrorCode::TranscodingError);
    }
}
