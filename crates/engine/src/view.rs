//! View query options.
//!
//! Callers pass query options as a map value. Each recognized option has its
//! own typed field; any other key is rejected so typos never silently change
//! a query.

use serde::{Deserialize, Serialize};

use docbridge_core::{to_json_string, Error, Result, Value, ValueMap};

/// Typed view query options. `None` means "store default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewQueryOptions {
    /// Return rows in descending key order
    pub descending: Option<bool>,
    /// Group reduce results by key
    pub group: Option<bool>,
    /// Run the reduce function
    pub reduce: Option<bool>,
    /// Query the development version of the design document
    pub development: Option<bool>,
    /// Include rows matching `endkey`
    pub inclusive_end: Option<bool>,
    /// Ask the store for debug output
    pub debug: Option<bool>,
    /// Maximum number of rows
    pub limit: Option<u32>,
    /// Key prefix length used for grouping
    pub group_level: Option<u32>,
    /// Rows to skip before returning results
    pub skip: Option<u32>,
    /// Exact key to match
    pub key: Option<String>,
    /// First key of the range
    pub startkey: Option<String>,
    /// Last key of the range
    pub endkey: Option<String>,
    /// First document id within `startkey`
    pub startkey_docid: Option<String>,
    /// Last document id within `endkey`
    pub endkey_docid: Option<String>,
}

impl ViewQueryOptions {
    /// Parse options from a map value. `Null` yields the defaults.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the value is not a map, a key is not a
    /// recognized option, or a value has the wrong type.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Map(map) => Self::from_map(map),
            other => Err(Error::invalid_argument(format!(
                "Query parameters must be a Map, got {}",
                other.type_name()
            ))),
        }
    }

    /// Parse options from map entries, in entry order.
    pub fn from_map(map: &ValueMap) -> Result<Self> {
        let mut options = Self::default();
        for (key, value) in map.iter() {
            match key {
                "descending" => options.descending = bool_option(key, value)?,
                "group" => options.group = bool_option(key, value)?,
                "reduce" => options.reduce = bool_option(key, value)?,
                "development" => options.development = bool_option(key, value)?,
                "inclusive_end" => options.inclusive_end = bool_option(key, value)?,
                "debug" => options.debug = bool_option(key, value)?,
                "limit" => options.limit = count_option(key, value)?,
                "group_level" => options.group_level = count_option(key, value)?,
                "skip" => options.skip = count_option(key, value)?,
                "key" => options.key = key_option(value)?,
                "startkey" => options.startkey = key_option(value)?,
                "endkey" => options.endkey = key_option(value)?,
                "startkey_docid" => options.startkey_docid = key_option(value)?,
                "endkey_docid" => options.endkey_docid = key_option(value)?,
                unknown => {
                    return Err(Error::invalid_argument(format!(
                        "{} is not a valid parameter.",
                        unknown
                    )))
                }
            }
        }
        Ok(options)
    }

    /// Render set options as store query parameters.
    ///
    /// `development` selects the design document namespace and is not a
    /// query parameter; see [`ViewQuery::design_path`].
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        let flags = [
            ("descending", self.descending),
            ("group", self.group),
            ("reduce", self.reduce),
            ("inclusive_end", self.inclusive_end),
            ("debug", self.debug),
        ];
        for (name, flag) in flags {
            if let Some(flag) = flag {
                params.push((name, flag.to_string()));
            }
        }
        let counts = [
            ("limit", self.limit),
            ("group_level", self.group_level),
            ("skip", self.skip),
        ];
        for (name, count) in counts {
            if let Some(count) = count {
                params.push((name, count.to_string()));
            }
        }
        let keys = [
            ("key", &self.key),
            ("startkey", &self.startkey),
            ("endkey", &self.endkey),
            ("startkey_docid", &self.startkey_docid),
            ("endkey_docid", &self.endkey_docid),
        ];
        for (name, key) in keys {
            if let Some(key) = key {
                params.push((name, key.clone()));
            }
        }
        params
    }
}

fn bool_option(key: &str, value: &Value) -> Result<Option<bool>> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(*b)),
        other => Err(Error::invalid_argument(format!(
            "Map item '{}' is not a Boolean value ({})",
            key,
            describe(other)
        ))),
    }
}

fn count_option(key: &str, value: &Value) -> Result<Option<u32>> {
    match value {
        Value::Null => Ok(None),
        Value::Int(i) => u32::try_from(*i).map(Some).map_err(|_| {
            Error::invalid_argument(format!(
                "Map item '{}' must be a non-negative Integer ({})",
                key, i
            ))
        }),
        other => Err(Error::invalid_argument(format!(
            "Map item '{}' is not a Integer value ({})",
            key,
            describe(other)
        ))),
    }
}

fn key_option(value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        other => to_json_string(other).map(Some),
    }
}

fn describe(value: &Value) -> String {
    to_json_string(value).unwrap_or_else(|_| value.type_name().to_string())
}

/// A query against one view of one design document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewQuery {
    /// Design document name
    pub design: String,
    /// View name
    pub view: String,
    /// Query options
    pub options: ViewQueryOptions,
}

impl ViewQuery {
    /// Query `view` of `design` with default options.
    pub fn new(design: impl Into<String>, view: impl Into<String>) -> Self {
        ViewQuery {
            design: design.into(),
            view: view.into(),
            options: ViewQueryOptions::default(),
        }
    }

    /// Replace the options
    pub fn with_options(mut self, options: ViewQueryOptions) -> Self {
        self.options = options;
        self
    }

    /// Path of the queried design document, in the development namespace
    /// when `development` is set.
    pub fn design_path(&self) -> String {
        if self.options.development == Some(true) {
            format!("_design/dev_{}", self.design)
        } else {
            format!("_design/{}", self.design)
        }
    }
}
