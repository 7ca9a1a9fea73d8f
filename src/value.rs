//! Data values bound into templates
//!
//! A [`Value`] is the in-memory data tree a template is rendered against.
//! Presence rules decide whether a keyed value counts for binding: `false`,
//! `null`, empty arrays, and empty objects are absent; everything else
//! (including `0` and `""`) is present.

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading data files
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read data file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse data JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Failed to parse data TOML: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Ordered string-keyed mapping
pub type Map = IndexMap<String, Value>;

/// A data value
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Map),
}

/// Semantic kind of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        })
    }
}

/// A keyed value that counts as present, with its kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Present<'v> {
    pub kind: ValueKind,
    pub value: &'v Value,
}

impl Value {
    /// Parse a JSON document
    pub fn from_json(content: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self, DataError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a data file; `.toml` files are read as TOML, anything else as JSON
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&content),
            _ => Self::from_json(&content),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Own-key lookup
    ///
    /// Objects are keyed by name and arrays by decimal index; other values
    /// have no keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Text a value renders as when written into an element
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(Value::to_text)
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => "[object Object]".to_string(),
        }
    }
}

/// Number text as a browser writes it into the DOM
///
/// Plain decimals between 1e-6 and 1e21, exponent form (`1e+21`) outside.
fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if (1e-6..1e21).contains(&n.abs()) {
        return n.to_string();
    }

    let exponent = format!("{:e}", n);
    match exponent.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exponent,
    }
}

/// Kind of a value, or None when the value counts as absent
pub fn classify(value: &Value) -> Option<ValueKind> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        other => Some(other.kind()),
    }
}

/// Look up `key` in `data` and classify it
pub fn lookup<'v>(data: &'v Value, key: &str) -> Option<Present<'v>> {
    let value = data.get(key)?;
    classify(value).map(|kind| Present { kind, value })
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(v: serde_json::Value) -> Value {
        Value::from(v)
    }

    #[test]
    fn test_absent_values() {
        for empty in [json!(false), json!([]), json!({}), json!(null)] {
            let d = data(json!({ "k": empty }));
            assert_eq!(lookup(&d, "k"), None, "{:?} should be absent", d);
        }
    }

    #[test]
    fn test_missing_key_is_absent() {
        let d = data(json!({ "other": 1 }));
        assert_eq!(lookup(&d, "k"), None);
    }

    #[test]
    fn test_present_values_carry_kind() {
        let cases = [
            (json!(0), ValueKind::Number),
            (json!(""), ValueKind::String),
            (json!(true), ValueKind::Boolean),
            (json!([1]), ValueKind::Array),
            (json!({ "a": 1 }), ValueKind::Object),
        ];
        for (value, kind) in cases {
            let d = data(json!({ "k": value }));
            assert_eq!(lookup(&d, "k").map(|p| p.kind), Some(kind));
        }
    }

    #[test]
    fn test_lookup_on_non_objects() {
        assert_eq!(lookup(&data(json!("text")), "k"), None);
        assert_eq!(lookup(&data(json!(null)), "k"), None);

        let list = data(json!(["a", "b"]));
        assert_eq!(
            lookup(&list, "1").map(|p| p.value),
            Some(&Value::String("b".to_string()))
        );
    }

    #[test]
    fn test_to_text() {
        assert_eq!(Value::Number(5.0).to_text(), "5");
        assert_eq!(Value::Number(1.5).to_text(), "1.5");
        assert_eq!(Value::Number(-3.0).to_text(), "-3");
        assert_eq!(Value::Bool(true).to_text(), "true");
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(data(json!(["a", 2, false])).to_text(), "a,2,false");
    }

    #[test]
    fn test_number_text() {
        assert_eq!(Value::Number(-0.0).to_text(), "0");
        assert_eq!(Value::Number(0.1).to_text(), "0.1");
        assert_eq!(Value::Number(1e20).to_text(), "100000000000000000000");
        assert_eq!(Value::Number(1e21).to_text(), "1e+21");
        assert_eq!(Value::Number(-2.5e30).to_text(), "-2.5e+30");
        assert_eq!(Value::Number(0.000001).to_text(), "0.000001");
        assert_eq!(Value::Number(1.5e-7).to_text(), "1.5e-7");
        assert_eq!(Value::Number(f64::INFINITY).to_text(), "Infinity");
    }

    #[test]
    fn test_deserialize_json_preserves_key_order() {
        let v = Value::from_json(r#"{"z": 1, "a": {"@": {"class": "x"}}, "m": [true, null]}"#)
            .expect("Should parse");
        let keys: Vec<_> = v.as_object().expect("object").keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(
            v.get("m"),
            Some(&Value::Array(vec![Value::Bool(true), Value::Null]))
        );
    }

    #[test]
    fn test_deserialize_toml() {
        let v = Value::from_toml(
            r#"
title = "Mighty Ducks"
year = 1992

[heading]
html = "District 5"
"#,
        )
        .expect("Should parse");
        assert_eq!(v.get("year"), Some(&Value::Number(1992.0)));
        assert_eq!(
            v.get("heading").and_then(|h| h.get("html")),
            Some(&Value::String("District 5".to_string()))
        );
    }

    #[test]
    fn test_invalid_json_error() {
        assert!(matches!(
            Value::from_json("{not json"),
            Err(DataError::JsonError(_))
        ));
    }
}
