//! Cluster management handlers.

use docbridge_core::translate;
use docbridge_engine::ConnectionRegistry;

use super::{resolve_bucket, validate};
use crate::{Output, Result};

/// Handle ListBuckets command.
pub fn list_buckets(
    registry: &ConnectionRegistry,
    connection: &str,
    username: &str,
    password: &str,
) -> Result<Output> {
    validate(registry, "list-buckets", connection)?;
    let cluster = registry
        .get(connection)
        .map_err(|e| translate("list-buckets", e))?;
    let names = cluster
        .cluster_manager(username, password)
        .and_then(|manager| manager.bucket_names())
        .map_err(|f| translate("list-buckets", f))?;
    Ok(Output::Names(names))
}

/// Handle RemoveBucket command.
pub fn remove_bucket(
    registry: &ConnectionRegistry,
    connection: &str,
    bucket: Option<&str>,
    username: &str,
    password: &str,
) -> Result<Output> {
    validate(registry, "remove-bucket", connection)?;
    let name = resolve_bucket(registry, "remove-bucket", connection, bucket)?;
    let cluster = registry
        .get(connection)
        .map_err(|e| translate("remove-bucket", e))?;
    let removed = cluster
        .cluster_manager(username, password)
        .and_then(|manager| manager.remove_bucket(&name))
        .map_err(|f| translate("remove-bucket", f))?;
    Ok(Output::Bool(removed))
}
