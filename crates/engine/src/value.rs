//! Leaf values stored in the form-state tree.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

/// A scalar value at a [`FieldPath`](crate::FieldPath).
///
/// Numbers are always `Decimal`; floating point never enters the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(Decimal),
    Text(String),
}

impl FieldValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "Null",
            FieldValue::Bool(_) => "Bool",
            FieldValue::Number(_) => "Number",
            FieldValue::Text(_) => "Text",
        }
    }

    /// Numeric reading of the value.
    ///
    /// Text that parses as a decimal counts as a number, matching how
    /// free-form inputs arrive from the form. Anything else yields `None`.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Number(d) => Some(*d),
            FieldValue::Text(s) => parse_decimal(s),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Convert a JSON leaf. Objects and arrays are not leaves and return `None`.
    pub fn from_json(v: &serde_json::Value) -> Option<Self> {
        match v {
            serde_json::Value::Null => Some(FieldValue::Null),
            serde_json::Value::Bool(b) => Some(FieldValue::Bool(*b)),
            serde_json::Value::Number(n) => {
                // Go through the textual form so that 0.1 stays 0.1.
                let d = parse_decimal(&n.to_string())?;
                Some(FieldValue::Number(d))
            }
            serde_json::Value::String(s) => Some(FieldValue::Text(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }

    /// Render as JSON. Numbers are emitted as JSON numbers when a JSON
    /// number reproduces them digit for digit, otherwise as strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Number(d) => {
                let text = d.normalize().to_string();
                match serde_json::from_str::<serde_json::Number>(&text) {
                    Ok(n) if n.to_string() == text => serde_json::Value::Number(n),
                    _ => serde_json::Value::String(text),
                }
            }
            FieldValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl From<Decimal> for FieldValue {
    fn from(d: Decimal) -> Self {
        FieldValue::Number(d)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Number(Decimal::from(v))
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Number(Decimal::from(v))
    }
}

impl From<usize> for FieldValue {
    fn from(v: usize) -> Self {
        FieldValue::Number(Decimal::from(v))
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(d) => write!(f, "{}", d),
            FieldValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Parse plain or scientific decimal text; surrounding whitespace is ignored.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}
