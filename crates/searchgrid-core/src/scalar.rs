//! Helpers for comparing JSON scalars.
//!
//! Filter options, submitted values, and indexed documents all carry
//! `serde_json::Value`s. These helpers give them one shared notion of
//! equality and ordering.

use std::cmp::Ordering;

use serde_json::Value;

/// Returns `true` for strings, numbers, and booleans.
pub fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

/// Text form of a scalar (`"1"` for `1`, `"true"` for `true`).
///
/// Returns `None` for null, arrays, and objects.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Loose scalar equality: equal JSON, or equal text forms.
///
/// Form submissions arrive as strings, so `"3"` equals `3`.
pub fn loosely_equal(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x == y;
    }
    match (as_text(a), as_text(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Order two scalars.
///
/// Numbers (or numeric strings) compare numerically, strings
/// lexicographically (ISO-8601 dates order correctly), booleans
/// `false < true`. Mixed or non-scalar pairs are not comparable.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (numeric(a), numeric(b)) {
        (Some(x), Some(y)) => return x.partial_cmp(&y),
        (Some(_), None) | (None, Some(_)) => {
            if !(a.is_string() && b.is_string()) {
                return None;
            }
        }
        (None, None) => {}
    }
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
