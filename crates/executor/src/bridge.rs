//! Typed convenience API over the executor.
//!
//! [`DocBridge`] binds an executor to one caller and unwraps each command's
//! output into the type it always produces.

use std::path::Path;
use std::sync::Arc;

use docbridge_core::{Error, ErrorCode, Value};
use docbridge_engine::{ClusterConnector, ConnectionRegistry, ConnectionReport, RegistryConfig};

use crate::access::Principal;
use crate::{Command, Executor, Output, Result};

/// An executor acting on behalf of one caller.
pub struct DocBridge {
    executor: Executor,
    subject: Principal,
}

fn unexpected(command: &str) -> Error {
    Error::new(
        ErrorCode::Unclassified,
        format!("Unexpected output for {}", command),
    )
}

impl DocBridge {
    /// Act as `subject` against `registry`
    pub fn new(registry: Arc<ConnectionRegistry>, subject: Principal) -> Self {
        DocBridge {
            executor: Executor::new(registry),
            subject,
        }
    }

    /// Load connections from a config file and act as `subject`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let bridge = DocBridge::open(
    ///     Path::new("docbridge.toml"),
    ///     Arc::new(MemoryConnector::new()),
    ///     Principal::admin("admin"),
    /// )?;
    /// let doc = bridge.get("c1", None, "beer-1")?;
    /// ```
    pub fn open(
        config_path: &Path,
        connector: Arc<dyn ClusterConnector>,
        subject: Principal,
    ) -> Result<Self> {
        let config = RegistryConfig::from_file(config_path)?;
        let registry = ConnectionRegistry::from_config(&config, connector)?;
        Ok(Self::new(Arc::new(registry), subject))
    }

    /// The underlying executor
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// The caller commands run as
    pub fn subject(&self) -> &Principal {
        &self.subject
    }

    fn run(&self, cmd: Command) -> Result<Output> {
        self.executor.execute(&self.subject, cmd)
    }

    /// Fetch a document's content.
    pub fn get(&self, connection: &str, bucket: Option<&str>, id: &str) -> Result<Value> {
        match self.run(Command::Get {
            connection: connection.to_string(),
            bucket: bucket.map(str::to_string),
            id: id.to_string(),
        })? {
            Output::Document(doc) => Ok(doc),
            _ => Err(unexpected("Get")),
        }
    }

    /// Insert or replace a document; returns the stored content.
    pub fn upsert(
        &self,
        connection: &str,
        bucket: Option<&str>,
        id: &str,
        content: impl Into<Value>,
    ) -> Result<Value> {
        match self.run(Command::Upsert {
            connection: connection.to_string(),
            bucket: bucket.map(str::to_string),
            id: id.to_string(),
            content: content.into(),
        })? {
            Output::Document(doc) => Ok(doc),
            _ => Err(unexpected("Upsert")),
        }
    }

    /// Insert a new document; returns the stored content.
    pub fn insert(
        &self,
        connection: &str,
        bucket: Option<&str>,
        id: &str,
        content: impl Into<Value>,
    ) -> Result<Value> {
        match self.run(Command::Insert {
            connection: connection.to_string(),
            bucket: bucket.map(str::to_string),
            id: id.to_string(),
            content: content.into(),
        })? {
            Output::Document(doc) => Ok(doc),
            _ => Err(unexpected("Insert")),
        }
    }

    /// Query a view; returns row documents in row order.
    pub fn query(
        &self,
        connection: &str,
        bucket: Option<&str>,
        design: &str,
        view: &str,
        params: Option<Value>,
    ) -> Result<Vec<Value>> {
        match self.run(Command::Query {
            connection: connection.to_string(),
            bucket: bucket.map(str::to_string),
            design: design.to_string(),
            view: view.to_string(),
            params,
        })? {
            Output::Documents(docs) => Ok(docs),
            _ => Err(unexpected("Query")),
        }
    }

    /// Insert or replace a design document.
    pub fn upsert_design_document(
        &self,
        connection: &str,
        bucket: Option<&str>,
        name: &str,
        views: Value,
    ) -> Result<Option<Value>> {
        match self.run(Command::UpsertDesignDocument {
            connection: connection.to_string(),
            bucket: bucket.map(str::to_string),
            name: name.to_string(),
            views,
        })? {
            Output::MaybeDocument(doc) => Ok(doc),
            _ => Err(unexpected("UpsertDesignDocument")),
        }
    }

    /// Insert a new design document; returns it as stored.
    pub fn insert_design_document(
        &self,
        connection: &str,
        bucket: Option<&str>,
        name: &str,
        views: Value,
    ) -> Result<Option<Value>> {
        match self.run(Command::InsertDesignDocument {
            connection: connection.to_string(),
            bucket: bucket.map(str::to_string),
            name: name.to_string(),
            views,
        })? {
            Output::MaybeDocument(doc) => Ok(doc),
            _ => Err(unexpected("InsertDesignDocument")),
        }
    }

    /// Bucket names, using administrator credentials.
    pub fn list_buckets(
        &self,
        connection: &str,
        username: &str,
        password: &str,
    ) -> Result<Vec<String>> {
        match self.run(Command::ListBuckets {
            connection: connection.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })? {
            Output::Names(names) => Ok(names),
            _ => Err(unexpected("ListBuckets")),
        }
    }

    /// Remove a bucket (the connection's default when `bucket` is `None`),
    /// using administrator credentials. Returns whether it existed.
    pub fn remove_bucket(
        &self,
        connection: &str,
        bucket: Option<&str>,
        username: &str,
        password: &str,
    ) -> Result<bool> {
        match self.run(Command::RemoveBucket {
            connection: connection.to_string(),
            bucket: bucket.map(str::to_string),
            username: username.to_string(),
            password: password.to_string(),
        })? {
            Output::Bool(removed) => Ok(removed),
            _ => Err(unexpected("RemoveBucket")),
        }
    }

    /// Registered connection ids.
    pub fn list_connections(&self) -> Result<Vec<String>> {
        match self.run(Command::ListConnections)? {
            Output::Names(names) => Ok(names),
            _ => Err(unexpected("ListConnections")),
        }
    }

    /// Status of every registered connection.
    pub fn connection_report(&self) -> Result<ConnectionReport> {
        match self.run(Command::ConnectionReport)? {
            Output::Report(report) => Ok(report),
            _ => Err(unexpected("ConnectionReport")),
        }
    }
}
