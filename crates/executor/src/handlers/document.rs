//! Document command handlers.

use docbridge_core::{object_to_map, to_json_object, translate, Error, Value};
use docbridge_engine::{ConnectionRegistry, JsonDocument};

use super::{open_bucket, validate};
use crate::{Output, Result};

/// Handle Get command.
pub fn get(
    registry: &ConnectionRegistry,
    connection: &str,
    bucket: Option<&str>,
    id: &str,
) -> Result<Output> {
    validate(registry, "get", connection)?;
    let bucket = open_bucket(registry, "get", connection, bucket)?;
    match bucket.get(id).map_err(|f| translate("get", f))? {
        Some(document) => Ok(Output::Document(Value::Map(object_to_map(&document.content)))),
        None => Err(translate("get", Error::document_not_found(id))),
    }
}

/// Handle Upsert command.
pub fn upsert(
    registry: &ConnectionRegistry,
    connection: &str,
    bucket: Option<&str>,
    id: &str,
    content: &Value,
) -> Result<Output> {
    write(registry, WriteMode::Upsert, connection, bucket, id, content)
}

/// Handle Insert command.
pub fn insert(
    registry: &ConnectionRegistry,
    connection: &str,
    bucket: Option<&str>,
    id: &str,
    content: &Value,
) -> Result<Output> {
    write(registry, WriteMode::Insert, connection, bucket, id, content)
}

#[derive(Clone, Copy)]
enum WriteMode {
    Upsert,
    Insert,
}

fn write(
    registry: &ConnectionRegistry,
    mode: WriteMode,
    connection: &str,
    bucket: Option<&str>,
    id: &str,
    content: &Value,
) -> Result<Output> {
    let context = match mode {
        WriteMode::Upsert => "upsert",
        WriteMode::Insert => "insert",
    };
    validate(registry, context, connection)?;
    // convert before touching the store
    let content = to_json_object(content).map_err(|e| translate(context, e))?;
    let bucket = open_bucket(registry, context, connection, bucket)?;

    let document = JsonDocument::new(id, content);
    let stored = match mode {
        WriteMode::Upsert => bucket.upsert(document),
        WriteMode::Insert => bucket.insert(document),
    }
    .map_err(|f| translate(context, f))?;
    Ok(Output::Document(Value::Map(object_to_map(&stored.content))))
}
