//! Wire values read from query results and scalar values written to points.
//!
//! A [`WireValue`] is a cell exactly as a query response delivers it. Numbers keep
//! their literal decimal text so that no precision is lost before the target field's
//! type is known. A [`FieldValue`] is the typed scalar a point carries.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::coerce::round_to_precision;

/// A single untyped cell of a tabular query result.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WireValue {
    /// Missing value.
    #[default]
    Null,
    /// Decimal number kept as its literal text.
    Number(String),
    /// Plain string.
    String(String),
    /// Value that already has a native scalar type.
    Scalar(FieldValue),
}

/// The typed scalar stored under a field key of a point.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// 64-bit floating point value
    Float(f64),
    /// 64-bit signed integer value
    Integer(i64),
    /// 64-bit unsigned integer value
    UnsignedInteger(u64),
    /// String value
    String(String),
    /// Boolean value
    Boolean(bool),
}

/// The declared kind of a record field, used to pick a coercion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Floating point targets (`f32`, `f64`).
    Float,
    /// Signed integer targets.
    Integer,
    /// Unsigned integer targets.
    UnsignedInteger,
    /// `String` targets.
    String,
    /// `bool` targets.
    Boolean,
}

impl FieldValue {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Float(_) => ValueKind::Float,
            Self::Integer(_) => ValueKind::Integer,
            Self::UnsignedInteger(_) => ValueKind::UnsignedInteger,
            Self::String(_) => ValueKind::String,
            Self::Boolean(_) => ValueKind::Boolean,
        }
    }

    /// Returns the value as an f64 if this is a Float variant.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as an i64 if this is an Integer variant.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as a u64 if this is an UnsignedInteger variant.
    pub fn as_unsigned(&self) -> Option<u64> {
        match self {
            Self::UnsignedInteger(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as a string slice if this is a String variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the value as a bool if this is a Boolean variant.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }
}

macro_rules! impl_try_from_field_value {
    ($($variant:ident => $ty:ty),*) => {
        $(
            /// Succeeds only for the matching variant; the value is handed back otherwise.
            impl TryFrom<FieldValue> for $ty {
                type Error = FieldValue;

                fn try_from(value: FieldValue) -> Result<Self, Self::Error> {
                    match value {
                        FieldValue::$variant(inner) => Ok(inner),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

impl_try_from_field_value!(
    Float => f64,
    Integer => i64,
    UnsignedInteger => u64,
    String => String,
    Boolean => bool
);

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::UnsignedInteger(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
            Self::Boolean(value) => write!(f, "{value}"),
        }
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Number(text) | Self::String(text) => f.write_str(text),
            Self::Scalar(value) => value.fmt(f),
        }
    }
}

impl WireValue {
    /// Returns true if the cell is missing.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Reads the cell as an integer, or 0 when it is missing or not an integer.
    pub fn as_i64(&self) -> i64 {
        match self {
            Self::Number(text) => text.parse().unwrap_or(0),
            Self::Scalar(FieldValue::Integer(value)) => *value,
            Self::Scalar(FieldValue::UnsignedInteger(value)) => {
                i64::try_from(*value).unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// Reads the cell as a float, or 0.0 when it is missing or not numeric.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Number(text) => text.parse().unwrap_or(0.0),
            Self::Scalar(FieldValue::Float(value)) => *value,
            Self::Scalar(FieldValue::Integer(value)) => *value as f64,
            Self::Scalar(FieldValue::UnsignedInteger(value)) => *value as f64,
            _ => 0.0,
        }
    }

    /// Reads the cell as a float rounded to `precision` decimal places.
    ///
    /// See [`round_to_precision`] for the rounding rule.
    pub fn as_f64_rounded(&self, precision: i32) -> f64 {
        round_to_precision(self.as_f64(), precision)
    }

    /// Reads the cell as text. Missing cells read as an empty string and numbers
    /// read as their literal text.
    pub fn as_string(&self) -> String {
        self.to_string()
    }

    /// Reads the cell as whole seconds since the Unix epoch.
    ///
    /// Anything that is not an integer reads as the epoch itself.
    pub fn as_time(&self) -> DateTime<Utc> {
        let seconds = match self {
            Self::Scalar(FieldValue::Integer(value)) => *value,
            Self::Number(text) => text.parse().unwrap_or(0),
            _ => 0,
        };
        timestamp_from_secs(seconds)
    }
}

/// Converts whole seconds since the epoch into a UTC timestamp, saturating to the
/// epoch when the value is out of range.
pub fn timestamp_from_secs(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Formats whole seconds since the epoch as a human readable UTC time.
pub fn format_timestamp(seconds: i64) -> String {
    timestamp_from_secs(seconds).to_string()
}

impl From<serde_json::Value> for WireValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(value) => Self::Scalar(FieldValue::Boolean(value)),
            serde_json::Value::Number(number) => Self::Number(number.to_string()),
            serde_json::Value::String(value) => Self::String(value),
            // nested values have no mapping target
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Self::Null,
        }
    }
}

impl<'de> Deserialize<'de> for WireValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

impl From<&str> for WireValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for WireValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for WireValue {
    fn from(value: i64) -> Self {
        Self::Scalar(FieldValue::Integer(value))
    }
}

impl From<f64> for WireValue {
    fn from(value: f64) -> Self {
        Self::Scalar(FieldValue::Float(value))
    }
}

impl From<bool> for WireValue {
    fn from(value: bool) -> Self {
        Self::Scalar(FieldValue::Boolean(value))
    }
}

impl<T: Into<WireValue>> From<Option<T>> for WireValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
