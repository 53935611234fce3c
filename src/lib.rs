//! docbridge - named document-store cluster connections for a host query engine
//!
//! docbridge keeps a registry of named cluster connections, converts the
//! host's structured values to and from the store's JSON documents, and
//! reports every failure as one of a closed set of stable error codes.
//!
//! # Quick Start
//!
//! ```ignore
//! use docbridge::{DocBridge, MemoryConnector, Principal};
//!
//! let bridge = DocBridge::open(
//!     Path::new("docbridge.toml"),
//!     Arc::new(MemoryConnector::new()),
//!     Principal::admin("admin"),
//! )?;
//!
//! let doc = bridge.get("c1", None, "beer-1")?;
//! ```
//!
//! # Architecture
//!
//! All operations go through the [`Executor`], which checks access and
//! dispatches [`Command`]s. [`DocBridge`] wraps it with typed calls.
//! Connections live in the [`ConnectionRegistry`], created once by the
//! embedder and shut down explicitly or on drop.

// Re-export the public API from docbridge-executor
pub use docbridge_executor::*;
