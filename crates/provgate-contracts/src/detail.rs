//! Structured detail values carried by audit entries and evidence bundles.
//!
//! `DetailValue` is a closed union: every value it can hold has exactly one
//! canonical encoding (see [`crate::canonical`]), so hashing and signing never
//! depend on what a caller happened to stuff into a payload.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An ordered mapping of detail values.  `BTreeMap` keeps keys sorted, which
/// the canonical encoding relies on.
pub type Details = BTreeMap<String, DetailValue>;

/// A plain, serializable value.
///
/// Deserialization is untagged: JSON integers become `Int`, or `UInt` above
/// `i64::MAX`; any other JSON number becomes `Float`.  Variant order matters
/// for that rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    List(Vec<DetailValue>),
    Map(Details),
}

impl DetailValue {
    /// Build a `Map` from key/value pairs.
    pub fn map<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<DetailValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        DetailValue::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Short type name, used in parse error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            DetailValue::Null => "null",
            DetailValue::Bool(_) => "bool",
            DetailValue::Int(_) | DetailValue::UInt(_) => "integer",
            DetailValue::Float(_) => "float",
            DetailValue::Str(_) => "string",
            DetailValue::List(_) => "list",
            DetailValue::Map(_) => "mapping",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DetailValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DetailValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DetailValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Details> {
        match self {
            DetailValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Look up `key` when this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&DetailValue> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// True for an empty mapping, list, or string, or for `Null`.
    pub fn is_empty(&self) -> bool {
        match self {
            DetailValue::Null => true,
            DetailValue::Str(s) => s.is_empty(),
            DetailValue::List(items) => items.is_empty(),
            DetailValue::Map(m) => m.is_empty(),
            DetailValue::Bool(_)
            | DetailValue::Int(_)
            | DetailValue::UInt(_)
            | DetailValue::Float(_) => false,
        }
    }
}

impl From<bool> for DetailValue {
    fn from(v: bool) -> Self {
        DetailValue::Bool(v)
    }
}

impl From<i64> for DetailValue {
    fn from(v: i64) -> Self {
        DetailValue::Int(v)
    }
}

impl From<i32> for DetailValue {
    fn from(v: i32) -> Self {
        DetailValue::Int(i64::from(v))
    }
}

impl From<u64> for DetailValue {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => DetailValue::Int(i),
            Err(_) => DetailValue::UInt(v),
        }
    }
}

impl From<f64> for DetailValue {
    fn from(v: f64) -> Self {
        DetailValue::Float(v)
    }
}

impl From<&str> for DetailValue {
    fn from(v: &str) -> Self {
        DetailValue::Str(v.to_string())
    }
}

impl From<String> for DetailValue {
    fn from(v: String) -> Self {
        DetailValue::Str(v)
    }
}

impl<T: Into<DetailValue>> From<Option<T>> for DetailValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(DetailValue::Null)
    }
}

impl From<Vec<DetailValue>> for DetailValue {
    fn from(v: Vec<DetailValue>) -> Self {
        DetailValue::List(v)
    }
}

impl From<Details> for DetailValue {
    fn from(v: Details) -> Self {
        DetailValue::Map(v)
    }
}

impl From<serde_json::Value> for DetailValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;
        match v {
            Value::Null => DetailValue::Null,
            Value::Bool(b) => DetailValue::Bool(b),
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => DetailValue::Int(i),
                (None, Some(u)) => DetailValue::UInt(u),
                (None, None) => DetailValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => DetailValue::Str(s),
            Value::Array(items) => DetailValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(obj) => {
                DetailValue::Map(obj.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{DetailValue, Details};

    #[test]
    fn json_integers_and_floats_stay_distinct() {
        let v: DetailValue = serde_json::from_str(r#"{"a": 1, "b": 1.0, "c": 1e-05}"#).unwrap();
        assert_eq!(v.get("a"), Some(&DetailValue::Int(1)));
        assert_eq!(v.get("b"), Some(&DetailValue::Float(1.0)));
        assert_eq!(v.get("c"), Some(&DetailValue::Float(1e-5)));
    }

    #[test]
    fn from_json_value_preserves_nesting() {
        let v = DetailValue::from(json!({
            "scores": { "total": 0.5, "flags": [true, null] },
            "name": "doc"
        }));
        let scores = v.get("scores").and_then(DetailValue::as_map).unwrap();
        assert_eq!(scores.get("total"), Some(&DetailValue::Float(0.5)));
        assert_eq!(
            scores.get("flags"),
            Some(&DetailValue::List(vec![DetailValue::Bool(true), DetailValue::Null]))
        );
        assert_eq!(v.get("name").and_then(DetailValue::as_str), Some("doc"));
    }

    #[test]
    fn map_builder_sorts_keys() {
        let v = DetailValue::map([("zeta", 1), ("alpha", 2)]);
        let keys: Vec<&String> = v.as_map().unwrap().keys().collect();
        assert_eq!(keys, ["alpha", "zeta"]);
    }

    #[test]
    fn emptiness_follows_container_contents() {
        assert!(DetailValue::Null.is_empty());
        assert!(DetailValue::Map(Details::new()).is_empty());
        assert!(!DetailValue::Int(0).is_empty());
        assert!(!DetailValue::map([("k", "v")]).is_empty());
    }

    #[test]
    fn huge_unsigned_stays_an_integer() {
        assert_eq!(DetailValue::from(u64::MAX), DetailValue::UInt(u64::MAX));
        assert_eq!(DetailValue::from(7u64), DetailValue::Int(7));
        assert_eq!(DetailValue::from(json!(u64::MAX)), DetailValue::UInt(u64::MAX));
    }

    #[test]
    fn json_integers_above_i64_deserialize_unsigned() {
        let v: DetailValue = serde_json::from_str(r#"{"big": 18446744073709551615, "neg": -1}"#).unwrap();
        assert_eq!(v.get("big"), Some(&DetailValue::UInt(u64::MAX)));
        assert_eq!(v.get("neg"), Some(&DetailValue::Int(-1)));
        assert_eq!(v.get("big").map(DetailValue::kind), Some("integer"));
    }
}
