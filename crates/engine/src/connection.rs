//! Cluster connection records and their live handles.

use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tracing::{info, warn};

use docbridge_core::{Error, ErrorCode, Result};

use crate::config::ConnectionConfig;
use crate::report::{ConnectionState, ConnectionStatus};
use crate::store::{Cluster, ClusterConnector};

/// A shared live cluster session.
///
/// Clones refer to the same session. Two handles are equal only when they
/// are the same session.
#[derive(Clone)]
pub struct ClusterHandle(Arc<dyn Cluster>);

impl ClusterHandle {
    /// Wrap a session
    pub fn new(cluster: Arc<dyn Cluster>) -> Self {
        ClusterHandle(cluster)
    }

    /// Whether both handles refer to the same session
    pub fn same_session(&self, other: &ClusterHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ClusterHandle {
    fn eq(&self, other: &Self) -> bool {
        self.same_session(other)
    }
}

impl Eq for ClusterHandle {}

impl Deref for ClusterHandle {
    type Target = dyn Cluster;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl fmt::Debug for ClusterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClusterHandle({:p})", Arc::as_ptr(&self.0) as *const ())
    }
}

/// One registered connection: its configuration and lazily created handle.
///
/// The handle slot is read without blocking. Connecting and closing take the
/// connect lock, so only one connect attempt per record runs at a time and
/// a closed record never connects again.
pub(crate) struct ClusterConnection {
    config: ConnectionConfig,
    handle: RwLock<Option<ClusterHandle>>,
    /// Guards connect attempts; `true` once closed
    connect_lock: Mutex<bool>,
}

impl ClusterConnection {
    pub(crate) fn new(config: ConnectionConfig) -> Self {
        ClusterConnection {
            config,
            handle: RwLock::new(None),
            connect_lock: Mutex::new(false),
        }
    }

    pub(crate) fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub(crate) fn id(&self) -> &str {
        &self.config.id
    }

    /// The cached handle, if connected
    pub(crate) fn current(&self) -> Option<ClusterHandle> {
        self.handle.read().clone()
    }

    /// The cached handle, connecting first if there is none.
    ///
    /// A failed attempt caches nothing; the next call tries again.
    pub(crate) fn get_or_connect(&self, connector: &dyn ClusterConnector) -> Result<ClusterHandle> {
        if let Some(handle) = self.current() {
            return Ok(handle);
        }

        let closed = self.connect_lock.lock();
        if *closed {
            return Err(Error::new(
                ErrorCode::ConnectionFailed,
                format!("Connection '{}' is closed", self.id()),
            ));
        }
        // another caller may have connected while we waited
        if let Some(handle) = self.current() {
            return Ok(handle);
        }

        info!(
            target: "docbridge::registry",
            connection = %self.id(),
            seeds = ?self.config.seeds,
            "Connecting to cluster"
        );
        match connector.connect(&self.config.seeds) {
            Ok(cluster) => {
                let handle = ClusterHandle::new(cluster);
                *self.handle.write() = Some(handle.clone());
                Ok(handle)
            }
            Err(failure) => {
                warn!(
                    target: "docbridge::registry",
                    connection = %self.id(),
                    error = %failure,
                    "Connect failed"
                );
                Err(Error::connection_failed(self.id(), failure))
            }
        }
    }

    /// Mark closed and hand back the live handle, if any.
    ///
    /// Waits for an in-flight connect so its handle is not leaked.
    pub(crate) fn close(&self) -> Option<ClusterHandle> {
        let mut closed = self.connect_lock.lock();
        *closed = true;
        self.handle.write().take()
    }

    pub(crate) fn status(&self) -> ConnectionStatus {
        let state = if self.handle.read().is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Idle
        };
        ConnectionStatus {
            id: self.config.id.clone(),
            seeds: self.config.seeds.clone(),
            default_bucket: self.config.default_bucket_name().to_string(),
            state,
        }
    }
}
