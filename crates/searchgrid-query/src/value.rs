//! Submitted filter values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use searchgrid_core::FieldId;

/// Values submitted for a datagrid, keyed by filter field.
pub type FilterValues = HashMap<FieldId, FilterValue>;

const FROM: &str = "from";
const TO: &str = "to";

/// Runtime value submitted for one filter.
///
/// JSON converts as: an object whose keys are only `from`/`to` becomes
/// [`FilterValue::Range`], an array becomes [`FilterValue::Many`], anything
/// else [`FilterValue::Single`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum FilterValue {
    /// One value.
    Single(Value),
    /// Several values (multi-choice, relation ids).
    Many(Vec<Value>),
    /// Range bounds, either side optional.
    Range {
        /// Lower bound (inclusive).
        from: Option<Value>,
        /// Upper bound (inclusive).
        to: Option<Value>,
    },
}

impl FilterValue {
    /// A text value.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Single(Value::String(s.into()))
    }

    /// A boolean value.
    pub fn boolean(b: bool) -> Self {
        Self::Single(Value::Bool(b))
    }

    /// Any single value.
    pub fn single(value: impl Into<Value>) -> Self {
        Self::Single(value.into())
    }

    /// Several values.
    pub fn many<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Many(values.into_iter().map(Into::into).collect())
    }

    /// Range bounds.
    pub fn range(from: Option<Value>, to: Option<Value>) -> Self {
        Self::Range { from, to }
    }

    /// Whether the value is absent for query purposes.
    ///
    /// Null, blank strings, empty lists (or lists of empties), and ranges
    /// without bounds are empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(value) => is_blank(value),
            Self::Many(values) => values.iter().all(is_blank),
            Self::Range { from, to } => {
                from.as_ref().is_none_or(is_blank) && to.as_ref().is_none_or(is_blank)
            }
        }
    }
}

/// Null, blank string, or a list/mapping with nothing in it.
pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.iter().all(is_blank),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map)
                if !map.is_empty() && map.keys().all(|k| k == FROM || k == TO) =>
            {
                let mut map = map;
                Self::Range {
                    from: map.remove(FROM).filter(|v| !v.is_null()),
                    to: map.remove(TO).filter(|v| !v.is_null()),
                }
            }
            Value::Array(items) => Self::Many(items),
            other => Self::Single(other),
        }
    }
}

impl From<FilterValue> for Value {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::Single(v) => v,
            FilterValue::Many(items) => Value::Array(items),
            FilterValue::Range { from, to } => {
                let mut map = Map::new();
                if let Some(from) = from {
                    map.insert(FROM.to_string(), from);
                }
                if let Some(to) = to {
                    map.insert(TO.to_string(), to);
                }
                Value::Object(map)
            }
        }
    }
}
