//! Command handlers organized by category.
//!
//! | Module | Commands |
//! |--------|----------|
//! | `document` | Get, Upsert, Insert |
//! | `view` | Query |
//! | `design` | UpsertDesignDocument, InsertDesignDocument |
//! | `bucket` | ListBuckets, RemoveBucket |
//! | `connection` | ListConnections, ConnectionReport |
//!
//! Connection-scoped handlers validate the connection id before any store
//! work, and every failure is routed through `translate`.

pub mod bucket;
pub mod connection;
pub mod design;
pub mod document;
pub mod view;

use std::sync::Arc;

use docbridge_core::translate;
use docbridge_engine::{Bucket, ConnectionRegistry};

use crate::Result;

/// Check that `connection` is registered.
pub(crate) fn validate(
    registry: &ConnectionRegistry,
    context: &str,
    connection: &str,
) -> Result<()> {
    registry
        .validate(connection)
        .map_err(|e| translate(context, e))
}

/// Bucket name to open: the connection's default when none or blank.
pub(crate) fn resolve_bucket(
    registry: &ConnectionRegistry,
    context: &str,
    connection: &str,
    bucket: Option<&str>,
) -> Result<String> {
    match bucket.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => registry
            .default_bucket(connection)
            .map_err(|e| translate(context, e)),
    }
}

/// Open the requested bucket of a validated connection with its configured
/// password.
pub(crate) fn open_bucket(
    registry: &ConnectionRegistry,
    context: &str,
    connection: &str,
    bucket: Option<&str>,
) -> Result<Arc<dyn Bucket>> {
    let name = resolve_bucket(registry, context, connection, bucket)?;
    let password = registry
        .bucket_password(connection, Some(&name))
        .map_err(|e| translate(context, e))?;
    let cluster = registry
        .get(connection)
        .map_err(|e| translate(context, e))?;
    cluster
        .open_bucket(&name, password.as_deref())
        .map_err(|f| translate(context, f))
}
