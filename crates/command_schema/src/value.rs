//! Typed value model for command documents
//!
//! [`Value`] is the validated, typed representation of JSON-like data flowing
//! through command parameters, progress, and results. It is pure data:
//! validation lives in the schema descriptors, not here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A typed JSON-like value. Immutable once constructed; equality is structural.
///
/// There is no null variant: the command wire model has no notion of null, so
/// converting a JSON null fails with a type mismatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value
    Bool(bool),
    /// 64-bit integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Ordered array of values
    Array(Vec<Value>),
    /// Mapping of property name to value
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// An object with no properties.
    pub fn empty_object() -> Self {
        Value::Object(BTreeMap::new())
    }

    /// Get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 (also converts from int)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get as string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as array reference
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get as object fields reference
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get a field from an object
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|fields| fields.get(key))
    }

    /// Kind name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Convert a structured document into a typed value.
    ///
    /// Fails with `TypeMismatch` on JSON null, which has no representation in
    /// the command value model.
    pub fn from_json(doc: &serde_json::Value) -> Result<Self, SchemaError> {
        match doc {
            serde_json::Value::Null => Err(SchemaError::type_mismatch("value", "null")),
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Float(f))
                } else {
                    Err(SchemaError::OutOfRange {
                        message: format!("number {} is not representable", n),
                    })
                }
            }
            serde_json::Value::String(s) => Ok(Value::String(s.clone())),
            serde_json::Value::Array(items) => Ok(Value::Array(
                items.iter().map(Value::from_json).collect::<Result<_, _>>()?,
            )),
            serde_json::Value::Object(fields) => Ok(Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), Value::from_json(v)?)))
                    .collect::<Result<_, SchemaError>>()?,
            )),
        }
    }

    /// Convert an object document into its field map.
    ///
    /// Fails with `JsonObjectExpected` when the document is not an object.
    pub fn object_from_json(doc: &serde_json::Value) -> Result<BTreeMap<String, Value>, SchemaError> {
        match Value::from_json(doc)? {
            Value::Object(fields) => Ok(fields),
            _ => Err(SchemaError::JsonObjectExpected),
        }
    }

    /// Convert back to the structured document representation.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Serialize an object field map as a structured document.
pub fn fields_to_json(fields: &BTreeMap<String, Value>) -> serde_json::Value {
    Value::Object(fields.clone()).to_json()
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Value::Object(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn primitive_accessors() {
        assert_eq!(Value::from(42).as_i64(), Some(42));
        assert_eq!(Value::from(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from("hello").as_str(), Some("hello"));
    }

    #[test]
    fn int_widens_to_f64_but_not_the_reverse() {
        assert_eq!(Value::from(42).as_f64(), Some(42.0));
        assert_eq!(Value::from(42.0).as_i64(), None);
    }

    #[test]
    fn equality_is_structural() {
        let a = Value::from_json(&json!({"a": [1, 2], "b": "x"})).unwrap();
        let b = Value::from_json(&json!({"b": "x", "a": [1, 2]})).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Value::from_json(&json!({"a": [1, 3], "b": "x"})).unwrap());
    }

    #[test]
    fn json_round_trip() {
        let doc = json!({
            "height": 53,
            "ratio": 0.5,
            "label": "up",
            "flags": [true, false],
            "nested": {"x": 1}
        });
        let value = Value::from_json(&doc).unwrap();
        assert_eq!(value.to_json(), doc);
        assert_eq!(value.get("height").and_then(Value::as_i64), Some(53));
        assert_eq!(value.get("nested").and_then(|n| n.get("x")).and_then(Value::as_i64), Some(1));
    }

    #[test]
    fn null_has_no_representation() {
        let err = Value::from_json(&json!(null)).unwrap_err();
        assert_eq!(err.code(), "type_mismatch");

        let err = Value::from_json(&json!({"a": null})).unwrap_err();
        assert_eq!(err.code(), "type_mismatch");
    }

    #[test]
    fn object_from_json_requires_an_object() {
        assert!(Value::object_from_json(&json!({"a": 1})).is_ok());
        let err = Value::object_from_json(&json!("hello")).unwrap_err();
        assert_eq!(err.code(), "json_object_expected");
    }
}
