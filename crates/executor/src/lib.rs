//! # docbridge Executor
//!
//! The public API for docbridge: named document-store cluster connections
//! for a host query engine.
//!
//! It provides:
//! - [`Executor`] - access check and dispatch of every [`Command`]
//! - [`DocBridge`] - typed calls on behalf of one caller
//! - [`Value`] - the host's structured value
//!
//! ## Quick Start
//!
//! ```text
//! use docbridge_executor::{DocBridge, Principal};
//!
//! let path = Path::new("docbridge.toml");
//! let bridge = DocBridge::open(path, connector, Principal::admin("admin"))?;
//! let doc = bridge.get("c1", None, "beer-1")?;
//! ```
//!
//! ## Failures
//!
//! Every error carries one stable [`ErrorCode`]; callers may branch on it.

#![warn(missing_docs)]

mod access;
mod bridge;
mod command;
mod executor;
mod output;

// Handler modules
mod handlers;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API - Everything users need is re-exported here
// =============================================================================

pub use access::{require_access, Principal, Subject, ACCESS_GROUP};
pub use bridge::DocBridge;
pub use command::Command;
pub use executor::Executor;
pub use output::Output;

pub use docbridge_core::{Error, ErrorCode, Result, Value, ValueMap};
pub use docbridge_engine::{
    ConnectionConfig, ConnectionRegistry, ConnectionReport, ConnectionState, ConnectionStatus,
    MemoryConnector, RegistryConfig,
};
