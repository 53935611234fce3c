//! Boundary to the external document store client.
//!
//! The registry and the handlers only ever talk to the store through these
//! traits. A real deployment wraps its network client; tests and embedders
//! use [`crate::memory::MemoryConnector`].
//!
//! All failures crossing this boundary are [`StoreFailure`] descriptions and
//! are turned into stable codes by `docbridge_core::translate`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use docbridge_core::{FailureKind, JsonMap, JsonValue, StoreFailure};

use crate::view::ViewQuery;

/// Result of a call into the store client
pub type StoreResult<T> = std::result::Result<T, StoreFailure>;

/// Establishes cluster sessions from seed addresses.
pub trait ClusterConnector: Send + Sync {
    /// Connect to the cluster reachable through `seeds`.
    fn connect(&self, seeds: &[String]) -> StoreResult<Arc<dyn Cluster>>;
}

/// A live cluster session.
pub trait Cluster: Send + Sync {
    /// Open a bucket. `None` opens it without authentication.
    fn open_bucket(&self, name: &str, password: Option<&str>) -> StoreResult<Arc<dyn Bucket>>;

    /// Authenticate as a cluster administrator.
    fn cluster_manager(&self, username: &str, password: &str)
        -> StoreResult<Arc<dyn ClusterManager>>;

    /// Close the session. Handles opened from it become unusable.
    fn disconnect(&self) -> StoreResult<()>;
}

/// Document and view operations on one bucket.
pub trait Bucket: Send + Sync {
    /// Bucket name
    fn name(&self) -> &str;

    /// Fetch a document, `None` when the id does not exist.
    fn get(&self, id: &str) -> StoreResult<Option<JsonDocument>>;

    /// Insert or replace a document.
    fn upsert(&self, document: JsonDocument) -> StoreResult<JsonDocument>;

    /// Insert a document that must not exist yet.
    fn insert(&self, document: JsonDocument) -> StoreResult<JsonDocument>;

    /// Run a view query.
    fn query(&self, query: &ViewQuery) -> StoreResult<Vec<ViewRow>>;

    /// Insert or replace a design document.
    fn upsert_design_document(&self, design: DesignDocument) -> StoreResult<DesignDocument>;

    /// Insert a design document. `None` when the store stored nothing.
    fn insert_design_document(&self, design: DesignDocument)
        -> StoreResult<Option<DesignDocument>>;
}

/// Administrative cluster operations.
pub trait ClusterManager: Send + Sync {
    /// Names of all buckets in the cluster.
    fn bucket_names(&self) -> StoreResult<Vec<String>>;

    /// Remove a bucket. `false` when it did not exist.
    fn remove_bucket(&self, name: &str) -> StoreResult<bool>;
}

/// A JSON document stored under an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonDocument {
    /// Document id
    pub id: String,
    /// Document body
    pub content: JsonMap,
    /// Compare-and-swap token, 0 before the document is stored
    pub cas: u64,
}

impl JsonDocument {
    /// A document that has not been stored yet.
    pub fn new(id: impl Into<String>, content: JsonMap) -> Self {
        JsonDocument {
            id: id.into(),
            content,
            cas: 0,
        }
    }
}

/// One row of a view result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow {
    /// Id of the emitting document
    pub id: String,
    /// Emitted key
    pub key: JsonValue,
    /// Emitted value
    pub value: JsonValue,
    /// The emitting document, when the store could load it
    pub document: Option<JsonDocument>,
}

/// A named map/reduce view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDefinition {
    /// View name
    pub name: String,
    /// Map function source
    pub map: String,
    /// Optional reduce function source
    pub reduce: Option<String>,
}

/// A design document: a named set of views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignDocument {
    /// Design document name
    pub name: String,
    /// Views in definition order
    pub views: Vec<ViewDefinition>,
}

impl DesignDocument {
    /// Build a design document from the store's JSON layout:
    ///
    /// ```json
    /// {"views": {"by_name": {"map": "function (doc) {...}", "reduce": "_count"}}}
    /// ```
    ///
    /// # Errors
    ///
    /// `InvalidArgument` failure when `views` is missing or not an object,
    /// or a view lacks a string `map`.
    pub fn from_json(name: impl Into<String>, json: &JsonMap) -> StoreResult<Self> {
        let name = name.into();
        let views = match json.get("views") {
            Some(JsonValue::Object(views)) => views,
            Some(other) => {
                return Err(invalid(format!(
                    "Design document '{}': views must be an object, got {}",
                    name, other
                )))
            }
            None => {
                return Err(invalid(format!(
                    "Design document '{}' has no views",
                    name
                )))
            }
        };

        let mut definitions = Vec::with_capacity(views.len());
        for (view_name, body) in views {
            let body = body.as_object().ok_or_else(|| {
                invalid(format!("View '{}' must be an object", view_name))
            })?;
            let map = body
                .get("map")
                .and_then(JsonValue::as_str)
                .ok_or_else(|| invalid(format!("View '{}' has no map function", view_name)))?;
            let reduce = match body.get("reduce") {
                None | Some(JsonValue::Null) => None,
                Some(JsonValue::String(s)) => Some(s.clone()),
                Some(_) => {
                    return Err(invalid(format!(
                        "View '{}' has a non-string reduce function",
                        view_name
                    )))
                }
            };
            definitions.push(ViewDefinition {
                name: view_name.clone(),
                map: map.to_string(),
                reduce,
            });
        }

        Ok(DesignDocument {
            name,
            views: definitions,
        })
    }

    /// Render in the store's JSON layout.
    pub fn to_json(&self) -> JsonMap {
        let mut views = JsonMap::new();
        for view in &self.views {
            let mut body = JsonMap::new();
            body.insert("map".to_string(), JsonValue::String(view.map.clone()));
            if let Some(reduce) = &view.reduce {
                body.insert("reduce".to_string(), JsonValue::String(reduce.clone()));
            }
            views.insert(view.name.clone(), JsonValue::Object(body));
        }
        let mut out = JsonMap::new();
        out.insert("views".to_string(), JsonValue::Object(views));
        out
    }
}

fn invalid(message: String) -> StoreFailure {
    StoreFailure::new(FailureKind::InvalidArgument, message)
}
