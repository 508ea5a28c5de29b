//! Request parameters: an insertion-ordered mapping of names to scalars.
//!
//! # Design
//! Only strings, integers and booleans can be encoded, so `ParameterValue`
//! is a closed enum and typed callers cannot build anything else. Dynamic
//! input (a `serde_json::Value`, or a JSON string coming through the FFI)
//! goes through `Parameters::from_json`, which rejects non-scalar values at
//! the point they are set rather than coercing them later.
//!
//! Entries are kept in a `Vec` so multi-key output follows insertion order
//! and is reproducible across runs.

use std::borrow::Cow;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::error::RequestError;

/// A scalar parameter value.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum ParameterValue {
    String(String),
    Int(i64),
    Bool(bool),
}

impl ParameterValue {
    /// String form used for query and form encoding. Booleans become `1`/`0`.
    pub fn to_query_string(&self) -> Cow<'_, str> {
        match self {
            ParameterValue::String(s) => Cow::Borrowed(s),
            ParameterValue::Int(i) => Cow::Owned(i.to_string()),
            ParameterValue::Bool(true) => Cow::Borrowed("1"),
            ParameterValue::Bool(false) => Cow::Borrowed("0"),
        }
    }
}

impl From<&str> for ParameterValue {
    fn from(s: &str) -> Self {
        ParameterValue::String(s.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(s: String) -> Self {
        ParameterValue::String(s)
    }
}

impl From<bool> for ParameterValue {
    fn from(b: bool) -> Self {
        ParameterValue::Bool(b)
    }
}

macro_rules! int_parameter_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParameterValue {
                fn from(i: $t) -> Self {
                    ParameterValue::Int(i64::from(i))
                }
            }
        )*
    };
}

int_parameter_value!(i8, i16, i32, i64, u8, u16, u32);

/// Name of a JSON value's kind, for error messages.
fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Insertion-ordered parameter mapping with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    entries: Vec<(String, ParameterValue)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParameterValue>,
    ) -> Option<ParameterValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParameterValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParameterValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build parameters from a JSON object, rejecting any value that is not
    /// a string, an `i64`-range integer or a boolean.
    pub fn from_json(value: Value) -> Result<Self, RequestError> {
        let object = match value {
            Value::Object(map) => map,
            other => {
                return Err(RequestError::ParametersNotObject {
                    kind: json_kind(&other),
                })
            }
        };

        let mut params = Parameters::new();
        for (key, value) in object {
            let scalar = match &value {
                Value::String(s) => ParameterValue::String(s.clone()),
                Value::Bool(b) => ParameterValue::Bool(*b),
                Value::Number(n) => match n.as_i64() {
                    Some(i) => ParameterValue::Int(i),
                    None => {
                        return Err(RequestError::UnsupportedParameter {
                            key,
                            kind: json_kind(&value),
                        })
                    }
                },
                _ => {
                    return Err(RequestError::UnsupportedParameter {
                        key,
                        kind: json_kind(&value),
                    })
                }
            };
            params.insert(key, scalar);
        }
        Ok(params)
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<ParameterValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Parameters
where
    K: Into<String>,
    V: Into<ParameterValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl TryFrom<Value> for Parameters {
    type Error = RequestError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Parameters::from_json(value)
    }
}

// Serialized as a JSON object in insertion order.
impl Serialize for Parameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_query_strings() {
        assert_eq!(ParameterValue::from(500).to_query_string(), "500");
        assert_eq!(ParameterValue::from(-7i64).to_query_string(), "-7");
        assert_eq!(ParameterValue::from(true).to_query_string(), "1");
        assert_eq!(ParameterValue::from(false).to_query_string(), "0");
        assert_eq!(ParameterValue::from("a b").to_query_string(), "a b");
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut params = Parameters::from([("a", "1"), ("b", "2")]);
        let old = params.insert("a", "3");
        assert_eq!(old, Some(ParameterValue::from("1")));
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(params.get("a"), Some(&ParameterValue::from("3")));
    }

    #[test]
    fn remove_drops_entry() {
        let mut params = Parameters::from([("a", 1), ("b", 2)]);
        assert_eq!(params.remove("a"), Some(ParameterValue::Int(1)));
        assert_eq!(params.remove("a"), None);
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn from_json_accepts_scalars() {
        let params = Parameters::from_json(json!({
            "foo": "bar",
            "number": 42,
            "flag": true,
        }))
        .unwrap();
        assert_eq!(params.get("foo"), Some(&ParameterValue::from("bar")));
        assert_eq!(params.get("number"), Some(&ParameterValue::Int(42)));
        assert_eq!(params.get("flag"), Some(&ParameterValue::Bool(true)));
    }

    #[test]
    fn from_json_rejects_nested_values() {
        let err = Parameters::from_json(json!({"nested": {"a": 1}})).unwrap_err();
        assert!(matches!(
            err,
            RequestError::UnsupportedParameter { ref key, kind: "object" } if key == "nested"
        ));

        let err = Parameters::from_json(json!({"list": [1, 2]})).unwrap_err();
        assert!(matches!(err, RequestError::UnsupportedParameter { kind: "array", .. }));

        let err = Parameters::from_json(json!({"none": null})).unwrap_err();
        assert!(matches!(err, RequestError::UnsupportedParameter { kind: "null", .. }));
    }

    #[test]
    fn from_json_rejects_floats_and_huge_integers() {
        let err = Parameters::from_json(json!({"ratio": 2.5})).unwrap_err();
        assert!(matches!(err, RequestError::UnsupportedParameter { kind: "float", .. }));

        let err = Parameters::from_json(json!({"big": u64::MAX})).unwrap_err();
        assert!(matches!(err, RequestError::UnsupportedParameter { kind: "integer", .. }));
    }

    #[test]
    fn from_json_requires_object() {
        let err = Parameters::from_json(json!(["a"])).unwrap_err();
        assert!(matches!(err, RequestError::ParametersNotObject { kind: "array" }));
    }

    #[test]
    fn serializes_as_ordered_object() {
        let params = Parameters::from([
            ("z", ParameterValue::from("last")),
            ("a", ParameterValue::from(1)),
            ("m", ParameterValue::from(false)),
        ]);
        assert_eq!(
            serde_json::to_string(&params).unwrap(),
            r#"{"z":"last","a":1,"m":false}"#
        );
    }
}
