//! The attribute tree shared by desired and observed state.
//!
//! Nested blocks are modelled the way the host runtime presents them: a
//! list of objects, even for blocks that can only ever hold one element.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// A named set of attributes. Keys keep their insertion order.
pub type AttributeMap = IndexMap<String, AttributeValue>;

/// A single node of an attribute tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Boolean(bool),
    Integer(i64),
    String(String),
    List(Vec<AttributeValue>),
    Object(AttributeMap),
}

impl AttributeValue {
    /// Builds an object node from key/value pairs.
    pub fn object<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        Self::Object(attribute_map(entries))
    }

    /// Wraps a single object as a one-element list, the shape of a nested block.
    pub fn block(attributes: AttributeMap) -> Self {
        Self::List(vec![Self::Object(attributes)])
    }

    /// Converts a JSON value into an attribute tree.
    ///
    /// Floats and nulls have no counterpart and are rejected.
    pub fn from_json(value: Value) -> Result<Self, CoreError> {
        match value {
            Value::Bool(b) => Ok(Self::Boolean(b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .ok_or_else(|| CoreError::invalid_tree(format!("non-integer number {n}"))),
            Value::String(s) => Ok(Self::String(s)),
            Value::Array(items) => items
                .into_iter()
                .map(Self::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            Value::Object(obj) => obj
                .into_iter()
                .map(|(k, v)| Self::from_json(v).map(|v| (k, v)))
                .collect::<Result<AttributeMap, _>>()
                .map(Self::Object),
            Value::Null => Err(CoreError::invalid_tree("null values are not supported")),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Boolean(b) => Value::Bool(*b),
            Self::Integer(i) => Value::from(*i),
            Self::String(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Short name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&AttributeMap> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Vec<AttributeValue>> for AttributeValue {
    fn from(value: Vec<AttributeValue>) -> Self {
        Self::List(value)
    }
}

impl From<AttributeMap> for AttributeValue {
    fn from(value: AttributeMap) -> Self {
        Self::Object(value)
    }
}

/// Builds an [`AttributeMap`] from key/value pairs.
pub fn attribute_map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> AttributeMap
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Parses JSON text into a top-level attribute map.
pub fn attributes_from_str(text: &str) -> Result<AttributeMap, CoreError> {
    let value: Value = serde_json::from_str(text)?;
    attributes_from_json(value)
}

/// Converts a JSON document into a top-level attribute map.
pub fn attributes_from_json(value: Value) -> Result<AttributeMap, CoreError> {
    match AttributeValue::from_json(value)? {
        AttributeValue::Object(map) => Ok(map),
        other => Err(CoreError::invalid_tree(format!(
            "expected an object at the top level, found {}",
            other.type_name()
        ))),
    }
}
