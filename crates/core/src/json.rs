//! Conversion between [`Value`] and the store's JSON document model.
//!
//! | Value | JSON |
//! |-------|------|
//! | Null / Bool / String | null / boolean / string |
//! | Int | integer number |
//! | Float | number (finite only) |
//! | Array | array |
//! | Map | object, same field order |
//! | Bytes, DateTime | rejected with `UnsupportedValueType` |
//!
//! Reading JSON is total. Integers that fit `i64` become `Int`; larger
//! integers and every fractional or exponent number become `Float`.

use serde_json::Value as JsonValue;

use crate::error::{Error, ErrorCode, Result};
use crate::failure::StoreFailure;
use crate::value::{Value, ValueMap};

/// JSON object as used by the store client.
pub type JsonMap = serde_json::Map<String, JsonValue>;

/// Convert a value to JSON.
///
/// Fails with `UnsupportedValueType` if any node has no JSON form. The whole
/// tree is checked before anything is returned.
pub fn to_json(value: &Value) -> Result<JsonValue> {
    convert_value(value).map_err(|rejected| rejected.into_error())
}

/// Convert a map value to a JSON object.
///
/// Document and design-document payloads must be maps.
pub fn to_json_object(value: &Value) -> Result<JsonMap> {
    match to_json(value)? {
        JsonValue::Object(obj) => Ok(obj),
        _ => Err(Error::invalid_argument(format!(
            "Expected a Map payload, got {}",
            value.type_name()
        ))),
    }
}

/// Convert a value to JSON text.
pub fn to_json_string(value: &Value) -> Result<String> {
    let json = to_json(value)?;
    serde_json::to_string(&json).map_err(|e| {
        Error::with_cause(
            ErrorCode::TranscodingError,
            e.to_string(),
            StoreFailure::from(e),
        )
    })
}

/// Convert JSON to a value. Never fails.
pub fn to_structured(json: &JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                // u64 above i64::MAX or a float; finite by construction
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(items) => Value::Array(items.iter().map(to_structured).collect()),
        JsonValue::Object(obj) => Value::Map(object_to_map(obj)),
    }
}

/// Convert a JSON object to an ordered map.
pub fn object_to_map(obj: &JsonMap) -> ValueMap {
    let mut map = ValueMap::with_capacity(obj.len());
    for (k, v) in obj {
        map.insert(k.clone(), to_structured(v));
    }
    map
}

/// Parse JSON text into a value.
///
/// Malformed text is a `TranscodingError`.
pub fn parse_structured(text: &str) -> Result<Value> {
    let json: JsonValue = serde_json::from_str(text).map_err(|e| {
        Error::with_cause(
            ErrorCode::TranscodingError,
            format!("Malformed JSON: {}", e),
            StoreFailure::from(e),
        )
    })?;
    Ok(to_structured(&json))
}

// =============================================================================
// Value -> JSON
// =============================================================================

/// A node that has no JSON form, with the path leading to it.
///
/// Path segments are collected innermost first while the recursion unwinds.
struct Rejected {
    type_name: &'static str,
    reason: Option<&'static str>,
    segments: Vec<Segment>,
}

enum Segment {
    Key(String),
    Index(usize),
}

impl Rejected {
    fn new(type_name: &'static str) -> Self {
        Rejected {
            type_name,
            reason: None,
            segments: Vec::new(),
        }
    }

    fn at(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    fn path(&self) -> String {
        let mut path = String::from("$");
        for segment in self.segments.iter().rev() {
            match segment {
                Segment::Key(k) => {
                    path.push('.');
                    path.push_str(k);
                }
                Segment::Index(i) => {
                    path.push('[');
                    path.push_str(&i.to_string());
                    path.push(']');
                }
            }
        }
        path
    }

    fn into_error(self) -> Error {
        let detail = match self.reason {
            Some(reason) => format!("{} ({})", self.type_name, reason),
            None => self.type_name.to_string(),
        };
        Error::unsupported_value(format!(
            "Value of type {} at {} cannot be converted to JSON",
            detail,
            self.path()
        ))
    }
}

fn convert_value(value: &Value) -> std::result::Result<JsonValue, Rejected> {
    match value {
        Value::Null => Ok(JsonValue::Null),
        Value::Bool(b) => Ok(JsonValue::Bool(*b)),
        Value::Int(i) => Ok(JsonValue::Number((*i).into())),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .ok_or(Rejected {
                reason: Some("non-finite"),
                ..Rejected::new("Float")
            }),
        Value::String(s) => Ok(JsonValue::String(s.clone())),
        Value::Bytes(_) | Value::DateTime(_) => Err(Rejected::new(value.type_name())),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                out.push(convert_value(item).map_err(|r| r.at(Segment::Index(idx)))?);
            }
            Ok(JsonValue::Array(out))
        }
        Value::Map(map) => {
            let mut out = JsonMap::with_capacity(map.len());
            for (k, v) in map.iter() {
                let json = convert_value(v).map_err(|r| r.at(Segment::Key(k.to_string())))?;
                out.insert(k.to_string(), json);
            }
            Ok(JsonValue::Object(out))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_scalars_to_json() {
        assert_eq!(to_json(&Value::Null).unwrap(), JsonValue::Null);
        assert_eq!(to_json(&Value::Bool(false)).unwrap(), json!(false));
        assert_eq!(to_json(&Value::Int(-42)).unwrap(), json!(-42));
        assert_eq!(to_json(&Value::Float(2.5)).unwrap(), json!(2.5));
        assert_eq!(to_json(&Value::from("x")).unwrap(), json!("x"));
    }

    #[test]
    fn test_document_to_structured_preserves_order() {
        let json: JsonValue = serde_json::from_str(r#"{"a":1,"b":[true,null,"x"]}"#).unwrap();
        let value = to_structured(&json);

        let map = value.as_map().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&Value::Int(1)));
        assert_eq!(
            map.get("b"),
            Some(&Value::Array(vec![
                Value::Bool(true),
                Value::Null,
                Value::String("x".into()),
            ]))
        );
    }

    #[test]
    fn test_map_to_json_preserves_order() {
        let value = Value::map([
            ("zulu", Value::Int(1)),
            ("alpha", Value::Int(2)),
            ("mike", Value::Int(3)),
        ]);
        let text = to_json_string(&value).unwrap();
        assert_eq!(text, r#"{"zulu":1,"alpha":2,"mike":3}"#);
    }

    #[test]
    fn test_round_trip_text_is_identical() {
        let text = concat!(
            r#"{"_id":"beer","views":{"by_name":{"map":"function(d){}"}},"#,
            r#""n":[1,-2,3.5,{"k":null}]}"#
        );
        let value = parse_structured(text).unwrap();
        assert_eq!(to_json_string(&value).unwrap(), text);
    }

    #[test]
    fn test_large_unsigned_becomes_float() {
        let json: JsonValue = serde_json::from_str("18446744073709551615").unwrap();
        assert!(matches!(to_structured(&json), Value::Float(_)));
    }

    #[test]
    fn test_integer_valued_float_stays_float() {
        let json = to_json(&Value::Float(3.0)).unwrap();
        assert_eq!(to_structured(&json), Value::Float(3.0));
    }

    #[test]
    fn test_exponent_number_is_float() {
        let value = parse_structured("1e2").unwrap();
        assert_eq!(value, Value::Float(100.0));
    }

    #[test]
    fn test_bytes_rejected_with_path() {
        let value = Value::map([
            ("a", Value::Int(1)),
            (
                "b",
                Value::Array(vec![Value::Null, Value::Null, Value::Bytes(vec![1, 2])]),
            ),
        ]);
        let err = to_json(&value).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnsupportedValueType);
        assert!(err.message().contains("Bytes"));
        assert!(err.message().contains("$.b[2]"), "{}", err.message());
    }

    #[test]
    fn test_datetime_rejected() {
        let value = Value::Array(vec![Value::DateTime(Utc::now())]);
        let err = to_json(&value).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnsupportedValueType);
        assert!(err.message().contains("DateTime"));
    }

    #[test]
    fn test_non_finite_float_rejected() {
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = to_json(&Value::Float(f)).unwrap_err();
            assert_eq!(err.code(), ErrorCode::UnsupportedValueType);
            assert!(err.message().contains("non-finite"));
        }
    }

    #[test]
    fn test_to_json_object_requires_map() {
        let err = to_json_object(&Value::Array(vec![])).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);

        let obj = to_json_object(&Value::map([("k", Value::Int(1))])).unwrap();
        assert_eq!(obj.get("k"), Some(&json!(1)));
    }

    #[test]
    fn test_malformed_text_is_transcoding_error() {
        let err = parse_structured("{\"a\":").unwrap_err();
        assert_eq!(err.code(), ErrorCode::TranscodingError);
        assert!(err.cause().is_some());
    }

    #[test]
    fn test_deep_nesting() {
        let mut value = Value::Int(0);
        for i in 0..100 {
            value = if i % 2 == 0 {
                Value::Array(vec![value])
            } else {
                Value::map([("n", value)])
            };
        }
        let json = to_json(&value).unwrap();
        assert_eq!(to_structured(&json), value);
    }

    fn arb_json() -> impl Strategy<Value = JsonValue> {
        let leaf = prop_oneof![
            Just(JsonValue::Null),
            any::<bool>().prop_map(JsonValue::Bool),
            any::<i64>().prop_map(|i| json!(i)),
            (-1.0e12f64..1.0e12f64).prop_map(|f| json!(f)),
            "[a-z0-9 ]{0,12}".prop_map(JsonValue::String),
        ];
        leaf.prop_recursive(4, 48, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(JsonValue::Array),
                prop::collection::vec(("[a-z]{1,6}", inner), 0..6).prop_map(|pairs| {
                    let mut obj = JsonMap::new();
                    for (k, v) in pairs {
                        obj.insert(k, v);
                    }
                    JsonValue::Object(obj)
                }),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_json_round_trip(json in arb_json()) {
            let value = to_structured(&json);
            let back = to_json(&value).unwrap();
            prop_assert_eq!(
                serde_json::to_string(&back).unwrap(),
                serde_json::to_string(&json).unwrap()
            );
        }
    }
}
