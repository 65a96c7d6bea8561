//! Filter kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use searchgrid_core::{Error, Result};

/// How a field can be queried.
///
/// The kind decides which options a filter accepts and how its submitted
/// value is translated into a query clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Analyzed or substring match on a text field.
    Text,
    /// Inclusive bounds, either side optional.
    Range,
    /// Membership in a declared set of choices.
    Choice,
    /// Exact match on a coerced boolean.
    Boolean,
    /// Nested sub-query over a related entity's identifiers.
    Relation,
}

impl FilterKind {
    /// All kinds, in declaration order.
    pub const ALL: [FilterKind; 5] = [
        FilterKind::Text,
        FilterKind::Range,
        FilterKind::Choice,
        FilterKind::Boolean,
        FilterKind::Relation,
    ];

    /// Lowercase name used in configuration and fixtures.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Range => "range",
            Self::Choice => "choice",
            Self::Boolean => "boolean",
            Self::Relation => "relation",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::config(format!("Unknown filter kind: '{s}'")))
    }
}
