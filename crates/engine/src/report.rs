//! Diagnostic connection report.
//!
//! The host renders the report as a document tree through [`ReportBuilder`]:
//!
//! ```text
//! connections
//! └── connection id="c1" state="idle" default-bucket="default"
//!     ├── seed  "db1:8091"
//!     └── seed  "db2:8091"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use docbridge_core::{Value, ValueMap};

/// Whether a connection currently holds a live handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// Registered, not connected (never used, or the last connect failed)
    Idle,
    /// Holding a live cluster handle
    Connected,
}

impl ConnectionState {
    /// Lowercase name used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connected => "connected",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of one registered connection. Carries no credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    /// Connection identifier
    pub id: String,
    /// Seed addresses
    pub seeds: Vec<String>,
    /// Bucket used when callers name none
    pub default_bucket: String,
    /// Current state
    pub state: ConnectionState,
}

/// Host capability for emitting a tree-shaped document.
pub trait ReportBuilder {
    /// Open an element; attributes follow until the first child or text.
    fn start_element(&mut self, name: &str);
    /// Add an attribute to the element just opened
    fn attribute(&mut self, name: &str, value: &str);
    /// Add text content to the open element
    fn text(&mut self, text: &str);
    /// Close the most recently opened element
    fn end_element(&mut self);
}

/// Point-in-time status of every registered connection, ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionReport {
    /// One entry per registered connection
    pub connections: Vec<ConnectionStatus>,
}

impl ConnectionReport {
    /// Status of `id`, if registered when the report was taken
    pub fn get(&self, id: &str) -> Option<&ConnectionStatus> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// Emit the report tree.
    pub fn emit(&self, builder: &mut dyn ReportBuilder) {
        builder.start_element("connections");
        for status in &self.connections {
            builder.start_element("connection");
            builder.attribute("id", &status.id);
            builder.attribute("state", status.state.as_str());
            builder.attribute("default-bucket", &status.default_bucket);
            for seed in &status.seeds {
                builder.start_element("seed");
                builder.text(seed);
                builder.end_element();
            }
            builder.end_element();
        }
        builder.end_element();
    }

    /// The report tree as a value:
    /// `{"connections": [{"id", "state", "default-bucket", "seed": [...]}]}`.
    pub fn to_value(&self) -> Value {
        let connections = self
            .connections
            .iter()
            .map(|status| {
                let mut entry = ValueMap::with_capacity(4);
                entry.insert("id", Value::from(status.id.as_str()));
                entry.insert("state", Value::from(status.state.as_str()));
                entry.insert("default-bucket", Value::from(status.default_bucket.as_str()));
                entry.insert(
                    "seed",
                    Value::Array(status.seeds.iter().map(|s| Value::from(s.as_str())).collect()),
                );
                Value::Map(entry)
            })
            .collect();
        Value::map([("connections", Value::Array(connections))])
    }
}
