//! Connection engine for docbridge
//!
//! This crate owns everything with state:
//! - ConnectionRegistry: named cluster connections with lazy connect
//! - RegistryConfig: connection configuration from `docbridge.toml`
//! - store: the traits an external store client implements
//! - ViewQueryOptions: typed view query options
//! - ConnectionReport: diagnostic status tree
//! - MemoryConnector: in-process store backend

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod connection;
pub mod memory;
pub mod registry;
pub mod report;
pub mod store;
pub mod view;

pub use config::{ConnectionConfig, RegistryConfig, CONFIG_FILE_NAME, DEFAULT_BUCKET};
pub use connection::ClusterHandle;
pub use memory::MemoryConnector;
pub use registry::ConnectionRegistry;
pub use report::{ConnectionReport, ConnectionState, ConnectionStatus, ReportBuilder};
pub use store::{
    Bucket, Cluster, ClusterConnector, ClusterManager, DesignDocument, JsonDocument, StoreResult,
    ViewDefinition, ViewRow,
};
pub use view::{ViewQuery, ViewQueryOptions};
