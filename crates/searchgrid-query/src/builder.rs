//! Query builder.
//!
//! [`QueryBuilder::build`] takes `&self` and [`QueryBuilder::add_filter`]
//! takes `&mut self`: a shared builder can serve concurrent builds, but
//! registration cannot overlap with them.

use std::cmp::Ordering;

use serde_json::Value;

use searchgrid_core::scalar::{as_text, compare, is_scalar, loosely_equal};
use searchgrid_core::{Error, FieldId, Result};
use searchgrid_filter::{Choice, FilterDescriptor, KindOptions};

use crate::ast::{Clause, CompositeQuery};
use crate::value::{FilterValue, FilterValues, is_blank};

/// Option name reported when a submitted value is rejected.
const VALUE: &str = "value";

/// Ordered set of filter descriptors for one datagrid.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    filters: Vec<FilterDescriptor>,
}

impl QueryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor.
    ///
    /// A descriptor for an already registered field replaces the previous
    /// one at its original position.
    pub fn add_filter(&mut self, descriptor: FilterDescriptor) {
        match self
            .filters
            .iter_mut()
            .find(|existing| existing.field() == descriptor.field())
        {
            Some(existing) => {
                log::debug!("Replacing filter '{}'", descriptor.field());
                *existing = descriptor;
            }
            None => self.filters.push(descriptor),
        }
    }

    /// Registered descriptors in registration order.
    pub fn filters(&self) -> &[FilterDescriptor] {
        &self.filters
    }

    /// Descriptor registered for `field`.
    pub fn get(&self, field: &str) -> Option<&FilterDescriptor> {
        self.filters.iter().find(|d| d.field().as_str() == field)
    }

    /// Number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether no filter is registered.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Build the AND of every filter that has a non-empty value.
    ///
    /// Values for unregistered fields are ignored.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOption`] (option `value`) if a submitted value does
    /// not fit its filter: a choice outside the declared set, a range bound
    /// outside `min`/`max`, an uncoercible boolean, or a mismatched shape.
    pub fn build(&self, values: &FilterValues) -> Result<CompositeQuery> {
        for field in values.keys() {
            if self.get(field.as_str()).is_none() {
                log::warn!("Ignoring value for unregistered filter '{field}'");
            }
        }

        let mut clauses = Vec::new();
        for descriptor in &self.filters {
            match values.get(descriptor.field()) {
                Some(value) if !value.is_empty() => clauses.push(translate(descriptor, value)?),
                _ => {}
            }
        }

        log::debug!(
            "Built query with {} clause(s) from {} filter(s)",
            clauses.len(),
            self.filters.len()
        );
        Ok(CompositeQuery::all_of(clauses))
    }
}

fn translate(descriptor: &FilterDescriptor, value: &FilterValue) -> Result<Clause> {
    let field = descriptor.field();
    let backend_field = descriptor.backend_field().to_string();

    match &descriptor.options().kind {
        KindOptions::Text { mode } => {
            let query = single(field, value)
                .and_then(as_text)
                .ok_or_else(|| invalid(field, "text filters take a single scalar value"))?;
            Ok(Clause::Match {
                field: backend_field,
                query: query.trim().to_string(),
                mode: *mode,
            })
        }
        KindOptions::Range { min, max } => {
            let FilterValue::Range { from, to } = value else {
                return Err(invalid(field, "range filters take from/to bounds"));
            };
            let gte = bound(field, from.as_ref(), min.as_ref(), max.as_ref())?;
            let lte = bound(field, to.as_ref(), min.as_ref(), max.as_ref())?;
            if let (Some(gte), Some(lte)) = (&gte, &lte) {
                match compare(gte, lte) {
                    Some(Ordering::Greater) => {
                        return Err(invalid(
                            field,
                            format!("lower bound {gte} exceeds upper bound {lte}"),
                        ));
                    }
                    None => {
                        return Err(invalid(
                            field,
                            format!("bounds {gte} and {lte} are not comparable"),
                        ));
                    }
                    Some(_) => {}
                }
            }
            Ok(Clause::Range {
                field: backend_field,
                gte,
                lte,
            })
        }
        KindOptions::Choice { choices, multiple } => {
            let submitted = list(field, value)?;
            if !multiple && submitted.len() > 1 {
                return Err(invalid(field, "only one choice may be selected"));
            }
            let values = submitted
                .into_iter()
                .map(|v| declared_choice(field, choices, v))
                .collect::<Result<Vec<_>>>()?;
            Ok(Clause::Terms {
                field: backend_field,
                values,
            })
        }
        KindOptions::Boolean => {
            let flag = single(field, value)
                .and_then(coerce_bool)
                .ok_or_else(|| invalid(field, "expected a boolean"))?;
            Ok(Clause::Term {
                field: backend_field,
                value: Value::Bool(flag),
            })
        }
        KindOptions::Relation {
            relation,
            related_field,
        } => {
            let ids = list(field, value)?;
            if let Some(bad) = ids.iter().find(|id| !is_scalar(id)) {
                return Err(invalid(field, format!("related identifier {bad} is not a scalar")));
            }
            Ok(Clause::Nested {
                path: relation.clone(),
                query: Box::new(Clause::Terms {
                    field: format!("{relation}.{related_field}"),
                    values: ids.into_iter().cloned().collect(),
                }),
            })
        }
    }
}

fn invalid(field: &FieldId, message: impl Into<String>) -> Error {
    Error::invalid_option(field.as_str(), VALUE, message)
}

fn single<'v>(field: &FieldId, value: &'v FilterValue) -> Option<&'v Value> {
    match value {
        FilterValue::Single(v) => Some(v),
        FilterValue::Many(items) => {
            let mut present = items.iter().filter(|v| !is_blank(v));
            match (present.next(), present.next()) {
                (Some(v), None) => Some(v),
                _ => {
                    log::debug!("Filter '{field}' got several values where one was expected");
                    None
                }
            }
        }
        FilterValue::Range { .. } => None,
    }
}

/// Non-blank submitted values of a multi-value filter.
fn list<'v>(field: &FieldId, value: &'v FilterValue) -> Result<Vec<&'v Value>> {
    match value {
        FilterValue::Single(v) => Ok(vec![v]),
        FilterValue::Many(items) => Ok(items.iter().filter(|v| !is_blank(v)).collect()),
        FilterValue::Range { .. } => Err(invalid(field, "range bounds are not accepted here")),
    }
}

fn bound(
    field: &FieldId,
    submitted: Option<&Value>,
    min: Option<&Value>,
    max: Option<&Value>,
) -> Result<Option<Value>> {
    let Some(value) = submitted.filter(|v| !is_blank(v)) else {
        return Ok(None);
    };
    if !is_scalar(value) {
        return Err(invalid(field, format!("range bound {value} is not a scalar")));
    }
    if let Some(min) = min
        && compare(value, min).is_none_or(|ord| ord == Ordering::Less)
    {
        return Err(invalid(field, format!("bound {value} is below the minimum {min}")));
    }
    if let Some(max) = max
        && compare(value, max).is_none_or(|ord| ord == Ordering::Greater)
    {
        return Err(invalid(field, format!("bound {value} is above the maximum {max}")));
    }
    Ok(Some(value.clone()))
}

/// Declared value matching `submitted`, so `"3"` resolves to a declared `3`.
fn declared_choice(field: &FieldId, choices: &[Choice], submitted: &Value) -> Result<Value> {
    choices
        .iter()
        .find(|choice| loosely_equal(&choice.value, submitted))
        .map(|choice| choice.value.clone())
        .ok_or_else(|| invalid(field, format!("{submitted} is not one of the declared choices")))
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
