//! StoreRecord - the backend's untyped view of one item.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::StoreError;
use crate::id::Id;

/// Attribute holding the record key.
pub const KEY_ATTRIBUTE: &str = "id";

/// A single attribute value.
///
/// Numbers are kept in their decimal text form so no precision is lost on
/// the way through the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Null,
    Bool(bool),
    N(String),
    S(String),
    L(Vec<AttrValue>),
    M(BTreeMap<String, AttrValue>),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::S(s) => Some(s),
            _ => None,
        }
    }

    fn from_json(value: Value) -> Self {
        match value {
            Value::Null => AttrValue::Null,
            Value::Bool(b) => AttrValue::Bool(b),
            Value::Number(n) => AttrValue::N(n.to_string()),
            Value::String(s) => AttrValue::S(s),
            Value::Array(items) => AttrValue::L(items.into_iter().map(Self::from_json).collect()),
            Value::Object(fields) => AttrValue::M(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    fn into_json(self) -> Result<Value, DecodeError> {
        Ok(match self {
            AttrValue::Null => Value::Null,
            AttrValue::Bool(b) => Value::Bool(b),
            AttrValue::N(n) => Value::Number(
                Number::from_str(&n).map_err(|_| DecodeError::new(format!("bad number {:?}", n)))?,
            ),
            AttrValue::S(s) => Value::String(s),
            AttrValue::L(items) => Value::Array(
                items
                    .into_iter()
                    .map(Self::into_json)
                    .collect::<Result<_, _>>()?,
            ),
            AttrValue::M(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| v.into_json().map(|v| (k, v)))
                    .collect::<Result<Map<_, _>, DecodeError>>()?,
            ),
        })
    }
}

/// One item as the backend sees it: a flat map of named attributes.
///
/// Records are produced by the store on `get`/`scan` and consumed by a
/// single conversion into a typed entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    attrs: BTreeMap<String, AttrValue>,
}

impl StoreRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize a typed value into a record. The value must serialize to a
    /// JSON object.
    pub fn encode<T: Serialize>(value: &T) -> Result<Self, StoreError> {
        match serde_json::to_value(value).map_err(|e| StoreError::Codec(e.to_string()))? {
            Value::Object(fields) => Ok(Self {
                attrs: fields
                    .into_iter()
                    .map(|(k, v)| (k, AttrValue::from_json(v)))
                    .collect(),
            }),
            other => Err(StoreError::Codec(format!(
                "expected an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Convert the record into a typed value.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, DecodeError> {
        let key = self.key();
        let mut fields = Map::new();
        for (name, value) in self.attrs {
            fields.insert(name, value.into_json()?);
        }
        serde_json::from_value(Value::Object(fields)).map_err(|e| DecodeError {
            key,
            reason: e.to_string(),
        })
    }

    /// The record key, if the record carries a string `id` attribute.
    pub fn key(&self) -> Option<Id> {
        self.attrs
            .get(KEY_ATTRIBUTE)
            .and_then(AttrValue::as_str)
            .filter(|s| !s.is_empty())
            .map(Id::from)
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: AttrValue) -> Option<AttrValue> {
        self.attrs.insert(name.into(), value)
    }

    /// Overlay every attribute of `other` onto this record.
    pub fn merge(&mut self, other: StoreRecord) {
        self.attrs.extend(other.attrs);
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A record could not be converted into the requested type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// Key of the offending record, when it had one.
    pub key: Option<Id>,
    pub reason: String,
}

impl DecodeError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            key: None,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "cannot decode record {}: {}", key, self.reason),
            None => write!(f, "cannot decode record: {}", self.reason),
        }
    }
}

impl std::error::Error for DecodeError {}
