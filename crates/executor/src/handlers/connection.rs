//! Registry command handlers.

use docbridge_engine::ConnectionRegistry;

use crate::{Output, Result};

/// Handle ListConnections command.
pub fn list_connections(registry: &ConnectionRegistry) -> Result<Output> {
    Ok(Output::Names(registry.list()))
}

/// Handle ConnectionReport command.
pub fn connection_report(registry: &ConnectionRegistry) -> Result<Output> {
    Ok(Output::Report(registry.report()))
}
