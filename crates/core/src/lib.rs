//! Core types for docbridge
//!
//! This crate defines the pieces every other crate builds on:
//! - Value: structured value exchanged with the host query engine
//! - json: lossless conversion between Value and the store's JSON model
//! - Error / ErrorCode: closed set of stable failure codes
//! - StoreFailure: tagged description of a store client failure
//! - translate: the single mapping from store failures to stable codes

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod failure;
pub mod json;
pub mod translate;
pub mod value;

pub use error::{Error, ErrorCode, Result};
pub use failure::{FailureKind, StoreFailure};
pub use json::{
    object_to_map, parse_structured, to_json, to_json_object, to_json_string, to_structured,
    JsonMap,
};
pub use translate::{translate, Failure};
pub use value::{Value, ValueMap};

/// JSON value as used by the store client.
pub use serde_json::Value as JsonValue;
