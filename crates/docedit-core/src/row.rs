//! Editable rows and scalar typing.
//!
//! A [`Row`] is the flat, editable view of one scalar: its textual form plus
//! a closed [`ValueType`] tag. Coercion back to a typed value goes through
//! the tag, so text that no longer fits its declared type is a structured
//! [`CoercionError`] instead of a silently wrong value.

use serde_json::Value;
use thiserror::Error;

/// The closed set of scalar types a row can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Null,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot coerce {text:?} to {value_type}")]
pub struct CoercionError {
    pub value_type: &'static str,
    pub text: String,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::Null => "null",
        }
    }

    /// Classify a scalar value. Containers return `None`.
    pub fn classify(value: &Value) -> Option<ValueType> {
        match value {
            Value::Null => Some(ValueType::Null),
            Value::Bool(_) => Some(ValueType::Boolean),
            Value::Number(_) => Some(ValueType::Number),
            Value::String(_) => Some(ValueType::String),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Coerce edited text back into a typed value.
    ///
    /// `String` keeps the raw text, `Number` parses it (the only fallible
    /// variant), `Boolean` is true exactly for the literal `"true"`, and
    /// `Null` is null regardless of the text.
    pub fn coerce(&self, text: &str) -> Result<Value, CoercionError> {
        match self {
            ValueType::String => Ok(Value::String(text.to_string())),
            ValueType::Number => serde_json::from_str::<serde_json::Number>(text)
                .map(Value::Number)
                .map_err(|_| CoercionError {
                    value_type: self.as_str(),
                    text: text.to_string(),
                }),
            ValueType::Boolean => Ok(Value::Bool(text == "true")),
            ValueType::Null => Ok(Value::Null),
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The textual form of a scalar value. Containers return `None`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some("null".to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// One editable scalar: an optional field key, the value as text, and the
/// declared type the text coerces back through.
///
/// A scalar node projects to exactly one keyless row; an object node
/// projects to one keyed row per scalar field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub key: Option<String>,
    pub value: String,
    pub value_type: ValueType,
}

impl Row {
    /// Build a row from a scalar value. Containers return `None`.
    pub fn from_value(key: Option<String>, value: &Value) -> Option<Row> {
        let value_type = ValueType::classify(value)?;
        let text = scalar_text(value)?;
        Some(Row {
            key,
            value: text,
            value_type,
        })
    }

    /// Coerce this row's text through its declared type.
    pub fn coerce(&self) -> Result<Value, CoercionError> {
        self.value_type.coerce(&self.value)
    }
}
