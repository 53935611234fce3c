//! View query handler.

use tracing::debug;

use docbridge_core::{object_to_map, translate, Value};
use docbridge_engine::{ConnectionRegistry, ViewQuery, ViewQueryOptions};

use super::{open_bucket, validate};
use crate::{Output, Result};

/// Handle Query command.
///
/// Returns the emitting document of every row, in row order. Rows whose
/// document the store could not load are skipped.
pub fn query(
    registry: &ConnectionRegistry,
    connection: &str,
    bucket: Option<&str>,
    design: &str,
    view: &str,
    params: Option<&Value>,
) -> Result<Output> {
    validate(registry, "query", connection)?;
    let options = match params {
        Some(params) => ViewQueryOptions::from_value(params).map_err(|e| translate("query", e))?,
        None => ViewQueryOptions::default(),
    };
    let query = ViewQuery::new(design, view).with_options(options);

    let bucket = open_bucket(registry, "query", connection, bucket)?;
    let rows = bucket.query(&query).map_err(|f| translate("query", f))?;

    let mut documents = Vec::with_capacity(rows.len());
    for row in rows {
        match row.document {
            Some(document) => documents.push(Value::Map(object_to_map(&document.content))),
            None => debug!(
                target: "docbridge::executor",
                design,
                view,
                row = %row.id,
                "Row has no document, skipped"
            ),
        }
    }
    Ok(Output::Documents(documents))
}
