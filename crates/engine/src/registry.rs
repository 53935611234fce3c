//! Connection registry
//!
//! Single source of truth for which named cluster connections exist and
//! whether they are connected. The embedding environment creates one
//! registry, registers its connections during initialization and passes the
//! registry to every handler.
//!
//! Handles are created lazily: the first [`ConnectionRegistry::get`] for an id
//! connects and caches the handle for the life of the registry. A failed
//! connect caches nothing, so every later call tries again.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use docbridge_core::{Error, ErrorCode, Result};

use crate::config::{ConnectionConfig, RegistryConfig};
use crate::connection::{ClusterConnection, ClusterHandle};
use crate::report::ConnectionReport;
use crate::store::ClusterConnector;

struct RegistryState {
    connections: BTreeMap<String, Arc<ClusterConnection>>,
    shut_down: bool,
}

/// Table of named cluster connections.
pub struct ConnectionRegistry {
    connector: Arc<dyn ClusterConnector>,
    state: RwLock<RegistryState>,
}

impl ConnectionRegistry {
    /// Create an empty registry that connects through `connector`.
    pub fn new(connector: Arc<dyn ClusterConnector>) -> Self {
        ConnectionRegistry {
            connector,
            state: RwLock::new(RegistryState {
                connections: BTreeMap::new(),
                shut_down: false,
            }),
        }
    }

    /// Create a registry and register every configured connection.
    ///
    /// # Errors
    ///
    /// The first registration error, see [`ConnectionRegistry::register`].
    pub fn from_config(
        config: &RegistryConfig,
        connector: Arc<dyn ClusterConnector>,
    ) -> Result<Self> {
        let registry = Self::new(connector);
        for connection in &config.connections {
            registry.register(connection.clone())?;
        }
        Ok(registry)
    }

    /// Register a connection. It stays idle until first use.
    ///
    /// # Errors
    ///
    /// - `DuplicateConnection` if the id is taken; the existing record is untouched
    /// - `InvalidArgument` for an invalid entry or after shutdown
    pub fn register(&self, config: ConnectionConfig) -> Result<()> {
        config.validate()?;

        let mut state = self.state.write();
        if state.shut_down {
            return Err(Error::invalid_argument(format!(
                "Cannot register '{}': registry is shut down",
                config.id
            )));
        }
        if state.connections.contains_key(&config.id) {
            return Err(Error::duplicate_connection(&config.id));
        }

        info!(
            target: "docbridge::registry",
            connection = %config.id,
            seeds = ?config.seeds,
            default_bucket = %config.default_bucket_name(),
            "Registered connection"
        );
        let id = config.id.clone();
        state
            .connections
            .insert(id, Arc::new(ClusterConnection::new(config)));
        Ok(())
    }

    /// Check that `id` is registered. Never connects.
    ///
    /// # Errors
    ///
    /// `UnknownConnection` if `id` is not registered.
    pub fn validate(&self, id: &str) -> Result<()> {
        self.record(id).map(|_| ())
    }

    /// The live handle for `id`, connecting on first use.
    ///
    /// Concurrent first uses of one id produce a single handle.
    ///
    /// # Errors
    ///
    /// - `UnknownConnection` if `id` is not registered
    /// - `ConnectionFailed` if connecting fails (the record stays idle) or
    ///   the registry is shut down
    pub fn get(&self, id: &str) -> Result<ClusterHandle> {
        let record = {
            let state = self.state.read();
            if state.shut_down {
                return Err(Error::new(
                    ErrorCode::ConnectionFailed,
                    format!("Cannot use '{}': registry is shut down", id),
                ));
            }
            state
                .connections
                .get(id)
                .cloned()
                .ok_or_else(|| Error::unknown_connection(id))?
        };
        record.get_or_connect(self.connector.as_ref())
    }

    /// Configured password for `bucket` of connection `id`; the default
    /// bucket when `bucket` is `None`.
    ///
    /// `Ok(None)` means no password is configured and the bucket is opened
    /// without authentication.
    ///
    /// # Errors
    ///
    /// `UnknownConnection` if `id` is not registered.
    pub fn bucket_password(&self, id: &str, bucket: Option<&str>) -> Result<Option<String>> {
        let record = self.record(id)?;
        Ok(record.config().bucket_password(bucket).map(str::to_string))
    }

    /// Name of the default bucket of connection `id`.
    pub fn default_bucket(&self, id: &str) -> Result<String> {
        let record = self.record(id)?;
        Ok(record.config().default_bucket_name().to_string())
    }

    /// Whether connection `id` currently holds a live handle.
    pub fn is_connected(&self, id: &str) -> Result<bool> {
        Ok(self.record(id)?.current().is_some())
    }

    /// Registered connection ids, sorted.
    pub fn list(&self) -> Vec<String> {
        self.state.read().connections.keys().cloned().collect()
    }

    /// Status of every connection, ordered by id.
    ///
    /// Does not wait for connects in progress; those report as idle.
    pub fn report(&self) -> ConnectionReport {
        let state = self.state.read();
        ConnectionReport {
            connections: state.connections.values().map(|c| c.status()).collect(),
        }
    }

    /// Disconnect every live handle.
    ///
    /// Idempotent. Disconnect failures are logged, not returned. Afterwards
    /// `get` fails with `ConnectionFailed` and `register` is rejected.
    pub fn shutdown(&self) {
        let records: Vec<Arc<ClusterConnection>> = {
            let mut state = self.state.write();
            if state.shut_down {
                return;
            }
            state.shut_down = true;
            state.connections.values().cloned().collect()
        };

        let mut closed = 0usize;
        for record in records {
            if let Some(handle) = record.close() {
                closed += 1;
                if let Err(failure) = handle.disconnect() {
                    warn!(
                        target: "docbridge::registry",
                        connection = %record.id(),
                        error = %failure,
                        "Disconnect failed"
                    );
                } else {
                    debug!(
                        target: "docbridge::registry",
                        connection = %record.id(),
                        "Disconnected"
                    );
                }
            }
        }
        info!(target: "docbridge::registry", closed, "Connection registry shut down");
    }

    /// Whether [`ConnectionRegistry::shutdown`] has run.
    pub fn is_shut_down(&self) -> bool {
        self.state.read().shut_down
    }

    fn record(&self, id: &str) -> Result<Arc<ClusterConnection>> {
        self.state
            .read()
            .connections
            .get(id)
            .cloned()
            .ok_or_else(|| Error::unknown_connection(id))
    }
}

impl fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("ConnectionRegistry")
            .field("connections", &state.connections.keys().collect::<Vec<_>>())
            .field("shut_down", &state.shut_down)
            .finish()
    }
}

impl Drop for ConnectionRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}
