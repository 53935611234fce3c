//! Command enum defining every docbridge operation.
//!
//! Commands are self-contained and serializable: every parameter an
//! operation needs is in its variant.

use serde::{Deserialize, Serialize};

use docbridge_core::Value;

/// A self-contained, serializable operation.
///
/// | Category | Commands |
/// |----------|----------|
/// | Document | `Get`, `Upsert`, `Insert` |
/// | View | `Query`, `UpsertDesignDocument`, `InsertDesignDocument` |
/// | Cluster | `ListBuckets`, `RemoveBucket` |
/// | Registry | `ListConnections`, `ConnectionReport` |
///
/// # Bucket field
///
/// A missing or blank `bucket` means the connection's default bucket. The
/// configured password for the resolved bucket is used to open it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    // ==================== Document ====================
    /// Fetch a document.
    /// Returns: `Output::Document`
    Get {
        connection: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bucket: Option<String>,
        id: String,
    },

    /// Insert or replace a document. `content` must be a map.
    /// Returns: `Output::Document` with the stored content
    Upsert {
        connection: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bucket: Option<String>,
        id: String,
        content: Value,
    },

    /// Insert a document that must not exist. `content` must be a map.
    /// Returns: `Output::Document` with the stored content
    Insert {
        connection: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bucket: Option<String>,
        id: String,
        content: Value,
    },

    // ==================== View ====================
    /// Query a view. `params` is a map of view query options.
    /// Returns: `Output::Documents`, one per row with a document
    Query {
        connection: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bucket: Option<String>,
        design: String,
        view: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        params: Option<Value>,
    },

    /// Insert or replace a design document. `views` uses the store layout
    /// `{"views": {"<name>": {"map": ..., "reduce": ...}}}`.
    /// Returns: `Output::MaybeDocument`
    UpsertDesignDocument {
        connection: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bucket: Option<String>,
        name: String,
        views: Value,
    },

    /// Insert a design document that must not exist.
    /// Returns: `Output::MaybeDocument`
    InsertDesignDocument {
        connection: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bucket: Option<String>,
        name: String,
        views: Value,
    },

    // ==================== Cluster ====================
    /// List bucket names using administrator credentials.
    /// Returns: `Output::Names`
    ListBuckets {
        connection: String,
        username: String,
        password: String,
    },

    /// Remove a bucket using administrator credentials.
    /// Returns: `Output::Bool`, false when the bucket did not exist
    RemoveBucket {
        connection: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bucket: Option<String>,
        username: String,
        password: String,
    },

    // ==================== Registry ====================
    /// Registered connection ids.
    /// Returns: `Output::Names`
    ListConnections,

    /// Status of every registered connection.
    /// Returns: `Output::Report`
    ConnectionReport,
}

impl Command {
    /// Variant name, used in logs and access errors
    pub fn name(&self) -> &'static str {
        match self {
            Command::Get { .. } => "Get",
            Command::Upsert { .. } => "Upsert",
            Command::Insert { .. } => "Insert",
            Command::Query { .. } => "Query",
            Command::UpsertDesignDocument { .. } => "UpsertDesignDocument",
            Command::InsertDesignDocument { .. } => "InsertDesignDocument",
            Command::ListBuckets { .. } => "ListBuckets",
            Command::RemoveBucket { .. } => "RemoveBucket",
            Command::ListConnections => "ListConnections",
            Command::ConnectionReport => "ConnectionReport",
        }
    }

    /// Connection the command targets, if it targets one
    pub fn connection(&self) -> Option<&str> {
        match self {
            Command::Get { connection, .. }
            | Command::Upsert { connection, .. }
            | Command::Insert { connection, .. }
            | Command::Query { connection, .. }
            | Command::UpsertDesignDocument { connection, .. }
            | Command::InsertDesignDocument { connection, .. }
            | Command::ListBuckets { connection, .. }
            | Command::RemoveBucket { connection, .. } => Some(connection),
            Command::ListConnections | Command::ConnectionReport => None,
        }
    }
}
