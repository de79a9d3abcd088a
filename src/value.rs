//! Scalar binding values.

use serde::{Deserialize, Serialize};

use crate::error::CteBuildError;

/// An opaque scalar bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
        }
    }

    /// Render this value as a SQL literal for the inlining strategy.
    ///
    /// Numbers are emitted bare; strings are single-quoted with embedded
    /// quotes doubled. Everything else is rejected rather than risk
    /// emitting unescaped text. NaN and infinities have no SQL literal
    /// form and are rejected too.
    pub fn to_inline_literal(&self) -> Result<String, CteBuildError> {
        match self {
            Value::Int(i) => Ok(i.to_string()),
            Value::Float(f) if f.is_finite() => Ok(f.to_string()),
            Value::Float(_) => Err(CteBuildError::UnsupportedBindingValue("non-finite float")),
            Value::Str(s) => Ok(format!("'{}'", s.replace('\'', "''"))),
            other => Err(CteBuildError::UnsupportedBindingValue(other.type_name())),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = CteBuildError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Float(f))
                } else {
                    Err(CteBuildError::UnsupportedBindingValue("number"))
                }
            }
            serde_json::Value::String(s) => Ok(Value::Str(s)),
            serde_json::Value::Array(_) => Err(CteBuildError::UnsupportedBindingValue("array")),
            serde_json::Value::Object(_) => Err(CteBuildError::UnsupportedBindingValue("object")),
        }
    }
}
