//! Attribute value types for Magic.
//!
//! This crate contains the pure data carried by an attribute bag: the
//! [`Value`] tree and the ordered [`Attributes`] map. No IO, no dispatch.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod date;
pub use date::{DATE_FORMAT, parse_date};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ordered mapping from attribute name to value. Insertion order is kept.
pub type Attributes = IndexMap<String, Value>;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ValueError {
    #[error("invalid date {input:?}: expected RFC 3339 or YYYY-MM-DD")]
    InvalidDate { input: String },
    #[error("float {0} has no JSON representation")]
    NonFiniteFloat(f64),
}

// ============================================================================
// Value
// ============================================================================

/// An attribute value.
///
/// The serialized form is adjacently tagged (`{"type": "date", "value": ...}`)
/// so that a [`Value::Date`] never decodes back as [`Value::Text`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(DateTime<Utc>),
    List(Vec<Value>),
    Map(Attributes),
}

impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&Attributes> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Short name of the variant, used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Date(_) => "date",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Convert untagged JSON into a value.
    ///
    /// Integers that fit `i64` become [`Value::Int`], every other number
    /// becomes [`Value::Float`]. Strings stay text even if they look like dates.
    #[must_use]
    pub fn from_plain_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or(Self::Null),
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from_plain_json).collect())
            }
            serde_json::Value::Object(fields) => Self::Map(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, Self::from_plain_json(value)))
                    .collect(),
            ),
        }
    }

    /// Fails on the first NaN or infinite float, which JSON cannot carry.
    pub fn ensure_finite(&self) -> Result<(), ValueError> {
        match self {
            Self::Float(n) if !n.is_finite() => Err(ValueError::NonFiniteFloat(*n)),
            Self::List(items) => items.iter().try_for_each(Self::ensure_finite),
            Self::Map(map) => map.values().try_for_each(Self::ensure_finite),
            _ => Ok(()),
        }
    }

    /// Render as untagged JSON for display. Dates become RFC 3339 strings.
    pub fn to_plain_json(&self) -> Result<serde_json::Value, ValueError> {
        Ok(match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(n) => serde_json::Value::from(*n),
            Self::Float(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .ok_or(ValueError::NonFiniteFloat(*n))?,
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Date(d) => serde_json::Value::String(d.to_rfc3339()),
            Self::List(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(Self::to_plain_json)
                    .collect::<Result<_, _>>()?,
            ),
            Self::Map(map) => serde_json::Value::Object(attributes_to_plain_json(map)?),
        })
    }
}

/// Render a whole attribute map as an untagged JSON object.
pub fn attributes_to_plain_json(
    attributes: &Attributes,
) -> Result<serde_json::Map<String, serde_json::Value>, ValueError> {
    attributes
        .iter()
        .map(|(key, value)| Ok((key.clone(), value.to_plain_json()?)))
        .collect()
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

/// Calendar dates are stored at midnight UTC.
impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value.and_time(NaiveTime::MIN).and_utc())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

impl From<Attributes> for Value {
    fn from(value: Attributes) -> Self {
        Self::Map(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Build an [`Attributes`] map from `(name, value)` pairs, keeping their order.
pub fn attributes<I, K, V>(pairs: I) -> Attributes
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}
