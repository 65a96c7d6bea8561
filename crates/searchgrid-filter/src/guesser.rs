//! Type guessing capability.
//!
//! A [`TypeGuesser`] inspects entity metadata and suggests a filter kind plus
//! default options for a field. Host frameworks implement the trait over
//! their own model managers; [`MappingGuesser`] and [`ChainGuesser`] cover
//! table-driven setups and guesser composition.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use searchgrid_core::FieldId;

use crate::kind::FilterKind;
use crate::options::OptionBag;

/// How sure a guesser is about its suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// A fallback guess.
    Low,
    /// Plausible from metadata.
    Medium,
    /// Derived from explicit metadata.
    High,
    /// Certain.
    VeryHigh,
}

/// A suggested filter kind with its default options.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeGuess {
    /// Suggested kind.
    pub kind: FilterKind,
    /// Default options for that kind.
    pub options: OptionBag,
    /// Guesser confidence.
    pub confidence: Confidence,
}

impl TypeGuess {
    /// Create a guess with no default options.
    pub fn new(kind: FilterKind, confidence: Confidence) -> Self {
        Self {
            kind,
            options: OptionBag::new(),
            confidence,
        }
    }

    /// Add a default option.
    pub fn with_option(mut self, name: impl Into<String>, value: Value) -> Self {
        self.options.insert(name, value);
        self
    }

    /// Replace the default options.
    pub fn with_options(mut self, options: OptionBag) -> Self {
        self.options = options;
        self
    }
}

/// Entity metadata a guesser is asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuessContext<'a> {
    /// Entity class the admin manages.
    pub entity_class: &'a str,
    /// Model manager the entity lives in (opaque to searchgrid).
    pub model_manager: &'a str,
}

impl<'a> GuessContext<'a> {
    /// Create a context.
    pub fn new(entity_class: &'a str, model_manager: &'a str) -> Self {
        Self {
            entity_class,
            model_manager,
        }
    }
}

/// Suggests a filter kind and default options for a field.
pub trait TypeGuesser: Send + Sync {
    /// Guess the filter type of `field`, or `None` if nothing is known.
    fn guess_type(&self, ctx: &GuessContext<'_>, field: &FieldId) -> Option<TypeGuess>;
}

/// Table-driven guesser.
///
/// Entity-specific entries take precedence over entity-agnostic ones.
#[derive(Debug, Clone, Default)]
pub struct MappingGuesser {
    by_entity: HashMap<(String, FieldId), TypeGuess>,
    any_entity: HashMap<FieldId, TypeGuess>,
}

impl MappingGuesser {
    /// Create an empty guesser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a guess for `field` on any entity.
    pub fn with_guess(mut self, field: impl Into<FieldId>, guess: TypeGuess) -> Self {
        self.any_entity.insert(field.into(), guess);
        self
    }

    /// Register a guess for `field` on one entity class.
    pub fn with_entity_guess(
        mut self,
        entity_class: impl Into<String>,
        field: impl Into<FieldId>,
        guess: TypeGuess,
    ) -> Self {
        self.by_entity
            .insert((entity_class.into(), field.into()), guess);
        self
    }

    /// Number of registered guesses.
    pub fn len(&self) -> usize {
        self.by_entity.len() + self.any_entity.len()
    }

    /// Whether no guesses are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TypeGuesser for MappingGuesser {
    fn guess_type(&self, ctx: &GuessContext<'_>, field: &FieldId) -> Option<TypeGuess> {
        self.by_entity
            .get(&(ctx.entity_class.to_string(), field.clone()))
            .or_else(|| self.any_entity.get(field))
            .cloned()
    }
}

/// Asks several guessers and keeps the most confident suggestion.
///
/// On equal confidence the guesser registered first wins.
#[derive(Clone, Default)]
pub struct ChainGuesser {
    guessers: Vec<Arc<dyn TypeGuesser>>,
}

impl ChainGuesser {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a guesser.
    pub fn with(mut self, guesser: Arc<dyn TypeGuesser>) -> Self {
        self.guessers.push(guesser);
        self
    }
}

impl TypeGuesser for ChainGuesser {
    fn guess_type(&self, ctx: &GuessContext<'_>, field: &FieldId) -> Option<TypeGuess> {
        let mut best: Option<TypeGuess> = None;
        for guess in self.guessers.iter().filter_map(|g| g.guess_type(ctx, field)) {
            if best
                .as_ref()
                .is_none_or(|current| guess.confidence > current.confidence)
            {
                best = Some(guess);
            }
        }
        best
    }
}

impl std::fmt::Debug for ChainGuesser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainGuesser")
            .field("guessers", &self.guessers.len())
            .finish()
    }
}
