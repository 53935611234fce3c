//! Design document handlers.

use docbridge_core::{object_to_map, to_json_object, translate, Value};
use docbridge_engine::{ConnectionRegistry, DesignDocument};

use super::{open_bucket, validate};
use crate::{Output, Result};

/// Handle UpsertDesignDocument command.
pub fn upsert_design_document(
    registry: &ConnectionRegistry,
    connection: &str,
    bucket: Option<&str>,
    name: &str,
    views: &Value,
) -> Result<Output> {
    const CONTEXT: &str = "upsert-design-document";
    let design = build(registry, CONTEXT, connection, name, views)?;
    let bucket = open_bucket(registry, CONTEXT, connection, bucket)?;
    let stored = bucket
        .upsert_design_document(design)
        .map_err(|f| translate(CONTEXT, f))?;
    Ok(Output::MaybeDocument(Some(render(&stored))))
}

/// Handle InsertDesignDocument command.
pub fn insert_design_document(
    registry: &ConnectionRegistry,
    connection: &str,
    bucket: Option<&str>,
    name: &str,
    views: &Value,
) -> Result<Output> {
    const CONTEXT: &str = "insert-design-document";
    let design = build(registry, CONTEXT, connection, name, views)?;
    let bucket = open_bucket(registry, CONTEXT, connection, bucket)?;
    let stored = bucket
        .insert_design_document(design)
        .map_err(|f| translate(CONTEXT, f))?;
    Ok(Output::MaybeDocument(stored.as_ref().map(render)))
}

fn build(
    registry: &ConnectionRegistry,
    context: &str,
    connection: &str,
    name: &str,
    views: &Value,
) -> Result<DesignDocument> {
    validate(registry, context, connection)?;
    let json = to_json_object(views).map_err(|e| translate(context, e))?;
    DesignDocument::from_json(name, &json).map_err(|f| translate(context, f))
}

fn render(design: &DesignDocument) -> Value {
    Value::Map(object_to_map(&design.to_json()))
}
