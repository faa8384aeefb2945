//! Type-aware property access.
//!
//! Every filter reads property values through these functions, so the
//! coercion rules live in exactly one place:
//!
//! | Target | Accepts | Fails on |
//! |--------|---------|----------|
//! | numeric | `Int`, `Float`, `Text` whose trimmed form parses as a float | everything else |
//! | text | every kind (canonical form); `Null` → `""` | never |
//!
//! A failed coercion is a non-match for the caller, never an error.

use std::borrow::Cow;

use crate::model::PropertyValue;

/// Kind a value is coerced to before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Numeric,
    Text,
}

/// A successfully coerced value.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced<'a> {
    Numeric(f64),
    Text(Cow<'a, str>),
}

/// Coerce to `target`; `None` when the value cannot take that kind.
pub fn coerce(value: &PropertyValue, target: TargetKind) -> Option<Coerced<'_>> {
    match target {
        TargetKind::Numeric => as_number(value).map(Coerced::Numeric),
        TargetKind::Text => Some(Coerced::Text(as_text(value))),
    }
}

/// Numeric view of a value.
pub fn as_number(value: &PropertyValue) -> Option<f64> {
    match value {
        PropertyValue::Int(i) => Some(*i as f64),
        PropertyValue::Float(f) => Some(*f),
        PropertyValue::Text(s) => s.trim().parse::<f64>().ok(),
        PropertyValue::Null | PropertyValue::Bool(_) | PropertyValue::List(_) => None,
    }
}

/// Text view of a value. `Null` reads as the empty string.
pub fn as_text(value: &PropertyValue) -> Cow<'_, str> {
    match value {
        PropertyValue::Null => Cow::Borrowed(""),
        PropertyValue::Text(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

/// Equality under the probe's kind.
///
/// A numeric probe compares both sides as `f64`; any other probe compares
/// canonical text, ignoring case unless `case_sensitive` is set.
pub fn values_equal(value: &PropertyValue, probe: &PropertyValue, case_sensitive: bool) -> bool {
    if probe.is_numeric() {
        return match (as_number(value), as_number(probe)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        };
    }
    text_equal(&as_text(value), &as_text(probe), case_sensitive)
}

pub(crate) fn text_equal(a: &str, b: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.to_lowercase() == b.to_lowercase()
    }
}

/// Lower-cases unless the comparison is case-sensitive.
pub(crate) fn fold_case(s: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive { Cow::Borrowed(s) } else { Cow::Owned(s.to_lowercase()) }
}
