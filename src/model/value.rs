//! Property values as delivered by the fetch boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of property value kinds.
///
/// The wire form is plain JSON (`null`, `true`, `1994`, `8.5`, `"Drama"`,
/// `["a", "b"]`). Every comparison in the crate matches on the variant;
/// there is no untyped fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<PropertyValue>),
}

// ============================================================================
// Type checking
// ============================================================================

impl PropertyValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Null => "NULL",
            PropertyValue::Bool(_) => "BOOLEAN",
            PropertyValue::Int(_) => "INTEGER",
            PropertyValue::Float(_) => "FLOAT",
            PropertyValue::Text(_) => "TEXT",
            PropertyValue::List(_) => "LIST",
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, PropertyValue::Null) }
    pub fn is_numeric(&self) -> bool { matches!(self, PropertyValue::Int(_) | PropertyValue::Float(_)) }
    pub fn is_text(&self) -> bool { matches!(self, PropertyValue::Text(_)) }

    /// Scalars are everything except `List`.
    pub fn is_scalar(&self) -> bool { !matches!(self, PropertyValue::List(_)) }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for PropertyValue { fn from(v: bool) -> Self { PropertyValue::Bool(v) } }
impl From<i32> for PropertyValue { fn from(v: i32) -> Self { PropertyValue::Int(v as i64) } }
impl From<i64> for PropertyValue { fn from(v: i64) -> Self { PropertyValue::Int(v) } }
impl From<f64> for PropertyValue { fn from(v: f64) -> Self { PropertyValue::Float(v) } }
impl From<String> for PropertyValue { fn from(v: String) -> Self { PropertyValue::Text(v) } }
impl From<&str> for PropertyValue { fn from(v: &str) -> Self { PropertyValue::Text(v.to_owned()) } }
impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(v: Vec<T>) -> Self { PropertyValue::List(v.into_iter().map(Into::into).collect()) }
}
impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(PropertyValue::Null) }
}

// ============================================================================
// Display
// ============================================================================

/// Canonical text of each kind. Text is written bare, lists as `[a, b]`,
/// whole floats keep a decimal point (`8.0`).
impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => write!(f, "null"),
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Int(i) => write!(f, "{i}"),
            PropertyValue::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            PropertyValue::Float(v) => write!(f, "{v}"),
            PropertyValue::Text(s) => write!(f, "{s}"),
            PropertyValue::List(l) => {
                write!(f, "[")?;
                for (i, v) in l.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
        }
    }
}
