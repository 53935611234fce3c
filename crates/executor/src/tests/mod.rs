//! Test modules for the executor crate.

mod access;
mod cluster;

use std::sync::Arc;

use serde_json::json;

use docbridge_core::{JsonMap, JsonValue};
use docbridge_engine::{ConnectionConfig, ConnectionRegistry, MemoryConnector};

use crate::{Executor, Principal};

/// Registry with connection `c1` (default bucket `default`, password `pw`),
/// plus an open `travel` bucket, over an in-memory store.
pub(crate) struct Fixture {
    pub connector: Arc<MemoryConnector>,
    pub executor: Executor,
}

pub(crate) fn fixture() -> Fixture {
    let connector = Arc::new(MemoryConnector::new());
    connector.add_bucket("default", Some("pw"));
    connector.add_bucket("travel", None);
    connector.set_admin("Administrator", "password");

    let registry = ConnectionRegistry::new(connector.clone());
    registry
        .register(
            ConnectionConfig::new("c1", ["host:8091"]).with_default_bucket("default", Some("pw")),
        )
        .unwrap();

    Fixture {
        connector,
        executor: Executor::new(Arc::new(registry)),
    }
}

pub(crate) fn admin() -> Principal {
    Principal::admin("admin")
}

pub(crate) fn object(value: JsonValue) -> JsonMap {
    match value {
        JsonValue::Object(obj) => obj,
        other => panic!("not an object: {}", other),
    }
}

pub(crate) fn sample_document() -> JsonMap {
    object(json!({"a": 1, "b": [true, null, "x"]}))
}
