//! Filter resolution.
//!
//! [`FilterResolver`] turns a field, an optional declared type, and the
//! caller's options into a [`FilterDescriptor`]:
//!
//! 1. The guesser is consulted for the field.
//! 2. The kind is picked: a pinned type, else the guess, else an advisory type.
//! 3. The guess's default options are merged underneath the caller's options
//!    (only when the guess agrees with the picked kind).
//! 4. `field_options` must be a mapping; its `required` is forced to `false`.
//! 5. The merged bag is parsed into typed [`FilterOptions`].
//! 6. A missing or empty label is derived through the [`LabelTranslator`].

use std::sync::Arc;

use serde_json::{Map, Value};

use searchgrid_core::{Error, FieldId, Result};

use crate::descriptor::FilterDescriptor;
use crate::guesser::{GuessContext, TypeGuesser};
use crate::kind::FilterKind;
use crate::label::LabelTranslator;
use crate::options::{FIELD_OPTIONS, FilterOptions, OptionBag, REQUIRED};

/// Type declared for a field before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeclaredType {
    /// No type declared.
    #[default]
    Unset,
    /// A hint used only when the guesser has nothing to say.
    Advisory(FilterKind),
    /// An explicit choice the guesser cannot override.
    Pinned(FilterKind),
}

/// Resolves admin fields into filter descriptors.
#[derive(Clone)]
pub struct FilterResolver {
    guesser: Arc<dyn TypeGuesser>,
    labels: Arc<dyn LabelTranslator>,
}

impl FilterResolver {
    /// Create a resolver over a guesser and a label strategy.
    pub fn new(guesser: Arc<dyn TypeGuesser>, labels: Arc<dyn LabelTranslator>) -> Self {
        Self { guesser, labels }
    }

    /// Resolve one field.
    ///
    /// # Errors
    ///
    /// - [`Error::UnresolvableField`] if no type is declared and the guesser
    ///   has no suggestion.
    /// - [`Error::InvalidOption`] if the merged options do not fit the kind.
    pub fn resolve(
        &self,
        ctx: &GuessContext<'_>,
        field: &FieldId,
        declared: DeclaredType,
        existing: OptionBag,
    ) -> Result<FilterDescriptor> {
        let guess = self.guesser.guess_type(ctx, field);

        let kind = match (declared, &guess) {
            (DeclaredType::Pinned(kind), _) => kind,
            (_, Some(guess)) => guess.kind,
            (DeclaredType::Advisory(kind), None) => kind,
            (DeclaredType::Unset, None) => return Err(Error::unresolvable(field.as_str())),
        };

        let mut options = existing;
        match guess {
            Some(guess) if guess.kind == kind => options.merge_defaults(&guess.options),
            Some(guess) => log::debug!(
                "Filter '{field}': pinned {kind} overrides guessed {}, guessed defaults ignored",
                guess.kind
            ),
            None => {}
        }

        if options.get(FIELD_OPTIONS).is_some_and(|value| !value.is_object()) {
            return Err(Error::invalid_option(
                field.as_str(),
                FIELD_OPTIONS,
                "expected a mapping",
            ));
        }

        let mut not_required = Map::new();
        not_required.insert(REQUIRED.to_string(), Value::Bool(false));
        options.merge_option(FIELD_OPTIONS, not_required);

        let mut typed = FilterOptions::from_bag(field, kind, &options)?;
        if typed.label.as_deref().is_none_or(str::is_empty) {
            typed.label = Some(self.labels.label(field));
        }

        log::debug!(
            "Resolved filter '{field}' as {kind} ({} extra option(s))",
            typed.extra.len()
        );

        Ok(FilterDescriptor::new(field.clone(), typed))
    }
}

impl std::fmt::Debug for FilterResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterResolver").finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
