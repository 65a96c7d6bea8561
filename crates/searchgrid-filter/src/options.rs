//! Filter options: the raw option bag and its typed form.
//!
//! Options start life as an [`OptionBag`], an arbitrary-shaped mapping that
//! callers and guessers both contribute to. Resolution merges guessed
//! defaults underneath the caller's entries and then parses the result into
//! [`FilterOptions`], which is what the query builder reads.
//!
//! # Merge precedence
//!
//! For each default option:
//! - scalar (or list) defaults are used only when the caller left the option unset;
//! - mapping defaults are merged key by key, the caller's keys winning.
//!
//! # Recognised keys
//!
//! | Key | Kinds | Shape |
//! |-----|-------|-------|
//! | `label` | all | string |
//! | `field_name` | all | string |
//! | `field_options` | all | mapping (`required` is forced `false`) |
//! | `mode` | text | `match`, `phrase`, or `prefix` |
//! | `min`, `max` | range | scalar |
//! | `choices` | choice | non-empty list of scalars, or mapping label → scalar |
//! | `multiple` | choice | bool |
//! | `relation` | relation | non-empty string |
//! | `related_field` | relation | non-empty string |
//!
//! Any other key lands in [`FilterOptions::extra`] untouched.

use serde::Serialize;
use serde_json::{Map, Value};

use searchgrid_core::scalar;
use searchgrid_core::{Error, FieldId, Result};

use crate::kind::FilterKind;

/// Option holding the nested form options.
pub const FIELD_OPTIONS: &str = "field_options";

/// Key inside [`FIELD_OPTIONS`] controlling required submission.
pub const REQUIRED: &str = "required";

const LABEL: &str = "label";
const FIELD_NAME: &str = "field_name";
const MODE: &str = "mode";
const MIN: &str = "min";
const MAX: &str = "max";
const CHOICES: &str = "choices";
const MULTIPLE: &str = "multiple";
const RELATION: &str = "relation";
const RELATED_FIELD: &str = "related_field";

/// Keys that belong to exactly one kind.
const KIND_KEYS: &[(FilterKind, &[&str])] = &[
    (FilterKind::Text, &[MODE]),
    (FilterKind::Range, &[MIN, MAX]),
    (FilterKind::Choice, &[CHOICES, MULTIPLE]),
    (FilterKind::Boolean, &[]),
    (FilterKind::Relation, &[RELATION, RELATED_FIELD]),
];

// ============================================================================
// OptionBag
// ============================================================================

/// Raw, arbitrary-shaped filter options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct OptionBag(Map<String, Value>);

impl OptionBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    /// Set an option, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(name.into(), value)
    }

    /// Get an option.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Whether an option is set.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Iterate over options.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the bag, returning the underlying mapping.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Fold `defaults` underneath the options already in this bag.
    ///
    /// Caller entries always win. Mapping-valued defaults are merged one
    /// level deep: the default mapping is taken as the base and the caller's
    /// mapping is laid on top key by key. A caller value that is not a
    /// mapping replaces a mapping default wholesale.
    pub fn merge_defaults(&mut self, defaults: &OptionBag) {
        for (name, default) in &defaults.0 {
            match (default, self.0.get_mut(name)) {
                (Value::Object(base), Some(Value::Object(caller))) => {
                    let mut merged = base.clone();
                    for (key, value) in caller.iter() {
                        merged.insert(key.clone(), value.clone());
                    }
                    *caller = merged;
                }
                (_, Some(_)) => {}
                (_, None) => {
                    self.0.insert(name.clone(), default.clone());
                }
            }
        }
    }

    /// Merge `entries` into the mapping option `name`, `entries` winning.
    ///
    /// A missing or non-mapping option is replaced by a fresh mapping.
    pub fn merge_option(&mut self, name: &str, entries: Map<String, Value>) {
        let slot = self
            .0
            .entry(name.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(existing) = slot {
            existing.extend(entries);
        }
    }
}

impl From<Map<String, Value>> for OptionBag {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for OptionBag {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// `defaults` overridden by `caller`, per the merge precedence rules.
pub fn merged(defaults: &OptionBag, caller: &OptionBag) -> OptionBag {
    let mut out = caller.clone();
    out.merge_defaults(defaults);
    out
}

// ============================================================================
// Typed options
// ============================================================================

/// Matching mode of a text filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMode {
    /// Analyzed match: every term must occur.
    #[default]
    Match,
    /// The whole value must occur as a phrase.
    Phrase,
    /// The field must start with the value.
    Prefix,
}

impl TextMode {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "match" => Some(Self::Match),
            "phrase" => Some(Self::Phrase),
            "prefix" => Some(Self::Prefix),
            _ => None,
        }
    }
}

/// One entry of a choice filter's declared set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    /// Human-readable label.
    pub label: String,
    /// Value indexed in the backend.
    pub value: Value,
}

/// Options specific to one filter kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KindOptions {
    /// Text filter options.
    Text {
        /// Matching mode.
        mode: TextMode,
    },
    /// Range filter options.
    Range {
        /// Lowest bound a caller may submit.
        min: Option<Value>,
        /// Highest bound a caller may submit.
        max: Option<Value>,
    },
    /// Choice filter options.
    Choice {
        /// Declared choice set.
        choices: Vec<Choice>,
        /// Whether several choices may be submitted at once.
        multiple: bool,
    },
    /// Boolean filters take no specific options.
    Boolean,
    /// Relation filter options.
    Relation {
        /// Related path (nested object or child type).
        relation: String,
        /// Identifier field inside the related entity.
        related_field: String,
    },
}

impl KindOptions {
    /// Kind these options belong to.
    pub fn kind(&self) -> FilterKind {
        match self {
            Self::Text { .. } => FilterKind::Text,
            Self::Range { .. } => FilterKind::Range,
            Self::Choice { .. } => FilterKind::Choice,
            Self::Boolean => FilterKind::Boolean,
            Self::Relation { .. } => FilterKind::Relation,
        }
    }
}

/// Fully parsed options of a resolved filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Display label.
    pub label: Option<String>,
    /// Backend field the filter queries, when it differs from the field id.
    pub field_name: Option<String>,
    /// Nested form options.
    pub field_options: Map<String, Value>,
    /// Kind-specific options.
    pub kind: KindOptions,
    /// Backend-specific tuning, passed through uninterpreted.
    pub extra: OptionBag,
}

impl FilterOptions {
    /// Parse a merged option bag for a filter of `kind` on `field`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] if a key belongs to another kind,
    /// a known key has the wrong shape, or a required key is missing.
    pub fn from_bag(field: &FieldId, kind: FilterKind, bag: &OptionBag) -> Result<Self> {
        let invalid =
            |option: &str, message: String| Error::invalid_option(field.as_str(), option, message);

        let mut label = None;
        let mut field_name = None;
        let mut field_options = Map::new();
        let mut extra = OptionBag::new();
        let mut own = Map::new();

        for (name, value) in bag.iter() {
            match name.as_str() {
                LABEL => {
                    let text = string_option(value)
                        .ok_or_else(|| invalid(LABEL, "expected a string".into()))?;
                    label = Some(text);
                }
                FIELD_NAME => {
                    let backend_field = string_option(value)
                        .filter(|s| !s.trim().is_empty())
                        .ok_or_else(|| invalid(FIELD_NAME, "expected a non-empty string".into()))?;
                    field_name = Some(backend_field);
                }
                FIELD_OPTIONS => match value {
                    Value::Object(map) => field_options = map.clone(),
                    _ => return Err(invalid(FIELD_OPTIONS, "expected a mapping".into())),
                },
                other => match owner_of(other) {
                    Some(owner) if owner == kind => {
                        own.insert(other.to_string(), value.clone());
                    }
                    Some(owner) => {
                        return Err(invalid(
                            other,
                            format!("only valid for {owner} filters, not {kind}"),
                        ));
                    }
                    None => {
                        extra.insert(other, value.clone());
                    }
                },
            }
        }

        let kind_options = parse_kind_options(kind, &own, &invalid)?;

        Ok(Self {
            label,
            field_name,
            field_options,
            kind: kind_options,
            extra,
        })
    }

    /// Whether the filter must be submitted. Always `false` once resolved.
    pub fn is_required(&self) -> bool {
        self.field_options
            .get(REQUIRED)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

fn owner_of(key: &str) -> Option<FilterKind> {
    KIND_KEYS
        .iter()
        .find(|(_, keys)| keys.contains(&key))
        .map(|(kind, _)| *kind)
}

fn string_option(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn parse_kind_options(
    kind: FilterKind,
    own: &Map<String, Value>,
    invalid: &dyn Fn(&str, String) -> Error,
) -> Result<KindOptions> {
    match kind {
        FilterKind::Text => {
            let mode = match own.get(MODE) {
                None => TextMode::default(),
                Some(value) => value
                    .as_str()
                    .and_then(TextMode::parse)
                    .ok_or_else(|| invalid(MODE, "expected one of match, phrase, prefix".into()))?,
            };
            Ok(KindOptions::Text { mode })
        }
        FilterKind::Range => {
            let bound = |key: &str| -> Result<Option<Value>> {
                match own.get(key) {
                    None | Some(Value::Null) => Ok(None),
                    Some(value) if scalar::is_scalar(value) => Ok(Some(value.clone())),
                    Some(_) => Err(invalid(key, "expected a scalar bound".into())),
                }
            };
            let min = bound(MIN)?;
            let max = bound(MAX)?;
            if let (Some(lo), Some(hi)) = (&min, &max) {
                match scalar::compare(lo, hi) {
                    Some(std::cmp::Ordering::Greater) => {
                        return Err(invalid(MIN, "min is greater than max".into()));
                    }
                    None => return Err(invalid(MIN, "min and max are not comparable".into())),
                    _ => {}
                }
            }
            Ok(KindOptions::Range { min, max })
        }
        FilterKind::Choice => {
            let choices = match own.get(CHOICES) {
                Some(value) => parse_choices(value).ok_or_else(|| {
                    invalid(
                        CHOICES,
                        "expected a non-empty list of scalars or mapping of label to scalar".into(),
                    )
                })?,
                None => return Err(invalid(CHOICES, "choice filters require choices".into())),
            };
            let multiple = match own.get(MULTIPLE) {
                None => false,
                Some(value) => value
                    .as_bool()
                    .ok_or_else(|| invalid(MULTIPLE, "expected a bool".into()))?,
            };
            Ok(KindOptions::Choice { choices, multiple })
        }
        FilterKind::Boolean => Ok(KindOptions::Boolean),
        FilterKind::Relation => {
            let relation = own
                .get(RELATION)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| invalid(RELATION, "relation filters require a related path".into()))?
                .to_string();
            let related_field = match own.get(RELATED_FIELD) {
                None => "id".to_string(),
                Some(value) => value
                    .as_str()
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| invalid(RELATED_FIELD, "expected a non-empty string".into()))?
                    .to_string(),
            };
            Ok(KindOptions::Relation {
                relation,
                related_field,
            })
        }
    }
}

fn parse_choices(value: &Value) -> Option<Vec<Choice>> {
    let choices: Vec<Choice> = match value {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                scalar::as_text(item).map(|label| Choice {
                    label,
                    value: item.clone(),
                })
            })
            .collect::<Option<_>>()?,
        Value::Object(map) => map
            .iter()
            .map(|(label, item)| {
                scalar::is_scalar(item).then(|| Choice {
                    label: label.clone(),
                    value: item.clone(),
                })
            })
            .collect::<Option<_>>()?,
        _ => return None,
    };
    (!choices.is_empty()).then_some(choices)
}

// ============================================================================
// Tests
// ============================================================================
