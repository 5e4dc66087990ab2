//! Field values held by models and produced by the binder.

use std::fmt;

use chrono::NaiveDateTime;

use crate::enums::EnumValue;

/// A model field value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(NaiveDateTime),
    Enum(EnumValue),
    List(Vec<Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Enum(_) => "enum",
            Value::List(_) => "list",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// String rendering used for length checks and display.
    ///
    /// `Null` renders empty, booleans as `1`/empty, dates as
    /// `YYYY-MM-DD HH:MM:SS` and lists comma-joined.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) => String::new(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => format_float(*f),
            Value::String(s) => s.clone(),
            Value::Date(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Value::Enum(e) => e.value().to_string(),
            Value::List(items) => items
                .iter()
                .map(Value::to_display_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Number of characters in the string rendering.
    pub fn char_len(&self) -> usize {
        match self {
            Value::String(s) => s.chars().count(),
            other => other.to_display_string().chars().count(),
        }
    }
}

/// Render a float without a trailing `.0` when it holds an integral value.
pub fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
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

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::Date(dt)
    }
}

impl From<EnumValue> for Value {
    fn from(e: EnumValue) -> Self {
        Value::Enum(e)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_len_counts_characters_not_bytes() {
        assert_eq!(Value::from("שלום").char_len(), 4);
        assert_eq!(Value::Null.char_len(), 0);
        assert_eq!(Value::Int(12345).char_len(), 5);
    }

    #[test]
    fn test_display_string() {
        assert_eq!(Value::Float(4.0).to_display_string(), "4");
        assert_eq!(Value::Float(2.5).to_display_string(), "2.5");
        assert_eq!(Value::Bool(false).to_display_string(), "");
        assert_eq!(Value::from(vec!["a", "b"]).to_display_string(), "a, b");
    }

    #[test]
    fn test_strict_equality_distinguishes_representations() {
        assert_ne!(Value::Int(1), Value::from("1"));
        assert_eq!(Value::from("abc123"), Value::from("abc123"));
    }
}
