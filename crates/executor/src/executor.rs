//! The Executor - single entry point for host operations.
//!
//! The Executor is a stateless dispatcher: it checks access, routes each
//! command to its handler and returns the handler's output. All state lives
//! in the connection registry.

use std::sync::Arc;
use tracing::debug;

use docbridge_engine::ConnectionRegistry;

use crate::access::{require_access, Subject, ACCESS_GROUP};
use crate::handlers;
use crate::{Command, Output, Result};

/// The command executor.
///
/// # Thread Safety
///
/// Executor is `Send + Sync` and can be shared across request threads.
///
/// # Example
///
/// ```text
/// let executor = Executor::new(registry);
/// let output = executor.execute(&Principal::admin("admin"), Command::ListConnections)?;
/// ```
pub struct Executor {
    registry: Arc<ConnectionRegistry>,
    access_group: String,
}

impl Executor {
    /// Create an executor over a registry, using the default access group.
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            registry,
            access_group: ACCESS_GROUP.to_string(),
        }
    }

    /// Use a different access group
    pub fn with_access_group(mut self, group: impl Into<String>) -> Self {
        self.access_group = group.into();
        self
    }

    /// The registry this executor dispatches to
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Execute a single command on behalf of `subject`.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` when the subject is neither an admin nor in the
    /// access group; otherwise whatever the handler reports, always with a
    /// stable code.
    pub fn execute(&self, subject: &dyn Subject, cmd: Command) -> Result<Output> {
        require_access(subject, &self.access_group, cmd.name())?;
        debug!(
            target: "docbridge::executor",
            command = cmd.name(),
            connection = ?cmd.connection(),
            user = %subject.name(),
            "Executing"
        );

        let registry = &self.registry;
        match cmd {
            // Document
            Command::Get {
                connection,
                bucket,
                id,
            } => handlers::document::get(registry, &connection, bucket.as_deref(), &id),
            Command::Upsert {
                connection,
                bucket,
                id,
                content,
            } => {
                handlers::document::upsert(registry, &connection, bucket.as_deref(), &id, &content)
            }
            Command::Insert {
                connection,
                bucket,
                id,
                content,
            } => {
                handlers::document::insert(registry, &connection, bucket.as_deref(), &id, &content)
            }

            // View
            Command::Query {
                connection,
                bucket,
                design,
                view,
                params,
            } => handlers::view::query(
                registry,
                &connection,
                bucket.as_deref(),
                &design,
                &view,
                params.as_ref(),
            ),
            Command::UpsertDesignDocument {
                connection,
                bucket,
                name,
                views,
            } => handlers::design::upsert_design_document(
                registry,
                &connection,
                bucket.as_deref(),
                &name,
                &views,
            ),
            Command::InsertDesignDocument {
                connection,
                bucket,
                name,
                views,
            } => handlers::design::insert_design_document(
                registry,
                &connection,
                bucket.as_deref(),
                &name,
                &views,
            ),

            // Cluster
            Command::ListBuckets {
                connection,
                username,
                password,
            } => handlers::bucket::list_buckets(registry, &connection, &username, &password),
            Command::RemoveBucket {
                connection,
                bucket,
                username,
                password,
            } => handlers::bucket::remove_bucket(
                registry,
                &connection,
                bucket.as_deref(),
                &username,
                &password,
            ),

            // Registry
            Command::ListConnections => handlers::connection::list_connections(registry),
            Command::ConnectionReport => handlers::connection::connection_report(registry),
        }
    }

    /// Execute commands in order, one result per command.
    pub fn execute_many(&self, subject: &dyn Subject, cmds: Vec<Command>) -> Vec<Result<Output>> {
        cmds.into_iter()
            .map(|cmd| self.execute(subject, cmd))
            .collect()
    }
}
