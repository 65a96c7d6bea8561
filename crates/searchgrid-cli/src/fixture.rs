//! JSON search fixtures.
//!
//! A fixture stands in for an admin and its search index:
//!
//! ```json
//! {
//!   "entity_class": "App\\Entity\\Post",
//!   "documents": [{"id": 1, "title": "Hello", "price": 10}],
//!   "guesses": {"price": {"kind": "range", "options": {"min": 0}}},
//!   "filters": [{"field": "title", "kind": "text"}, {"field": "price"}],
//!   "values": {"title": "hello", "price": {"from": 5}}
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use searchgrid::filter::{Confidence, MappingGuesser, TypeGuess};
use searchgrid::{DeclaredType, FieldDescription, FilterKind, FilterValues, OptionBag};

fn default_id_field() -> String {
    "id".to_string()
}

fn default_model_manager() -> String {
    "fixture".to_string()
}

fn default_confidence() -> Confidence {
    Confidence::High
}

/// A filter declared by the fixture's admin.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterDeclaration {
    /// Field identifier.
    pub field: String,
    /// Declared kind; pinned unless `advisory` is set.
    #[serde(default)]
    pub kind: Option<FilterKind>,
    /// Treat `kind` as a hint the guesser may override.
    #[serde(default)]
    pub advisory: bool,
    /// Declared options.
    #[serde(default)]
    pub options: OptionBag,
}

impl FilterDeclaration {
    /// Field description handed to the datagrid builder.
    pub fn to_field_description(&self) -> FieldDescription {
        let declared = match (self.kind, self.advisory) {
            (None, _) => DeclaredType::Unset,
            (Some(kind), true) => DeclaredType::Advisory(kind),
            (Some(kind), false) => DeclaredType::Pinned(kind),
        };
        FieldDescription::new(self.field.as_str())
            .with_declared(declared)
            .with_options(self.options.clone())
    }
}

/// Type guess available to the fixture's guesser.
#[derive(Debug, Clone, Deserialize)]
pub struct GuessDeclaration {
    /// Guessed kind.
    pub kind: FilterKind,
    /// Default options.
    #[serde(default)]
    pub options: OptionBag,
    /// Guess confidence.
    #[serde(default = "default_confidence")]
    pub confidence: Confidence,
}

/// Documents, filters, and submitted values for one search.
#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    /// Entity class the admin manages.
    #[serde(default)]
    pub entity_class: String,
    /// Model manager name.
    #[serde(default = "default_model_manager")]
    pub model_manager: String,
    /// Document field holding the id.
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Indexed documents.
    #[serde(default)]
    pub documents: Vec<Value>,
    /// Guesses keyed by field.
    #[serde(default)]
    pub guesses: BTreeMap<String, GuessDeclaration>,
    /// Filters in registration order.
    #[serde(default)]
    pub filters: Vec<FilterDeclaration>,
    /// Submitted values.
    #[serde(default)]
    pub values: FilterValues,
}

impl Fixture {
    /// Read a fixture file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading fixture {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing fixture {}", path.display()))
    }

    /// Guesser answering from `guesses`.
    pub fn guesser(&self) -> MappingGuesser {
        self.guesses
            .iter()
            .fold(MappingGuesser::new(), |guesser, (field, guess)| {
                guesser.with_guess(
                    field.as_str(),
                    TypeGuess::new(guess.kind, guess.confidence)
                        .with_options(guess.options.clone()),
                )
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use searchgrid::filter::{GuessContext, TypeGuesser};
    use std::io::Write;

    const FIXTURE: &str = r#"{
        "entity_class": "App\\Entity\\Post",
        "documents": [{"id": 1, "title": "Hello"}],
        "guesses": {"price": {"kind": "range", "options": {"min": 0}}},
        "filters": [
            {"field": "title", "kind": "text"},
            {"field": "status", "kind": "choice", "advisory": true},
            {"field": "price"}
        ],
        "values": {"title": "hello", "price": {"from": 5}}
    }"#;

    #[test]
    fn test_load_fixture() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();
        let fixture = Fixture::load(file.path()).unwrap();
        assert_eq!(fixture.id_field, "id");
        assert_eq!(fixture.model_manager, "fixture");
        assert_eq!(fixture.documents.len(), 1);
        assert_eq!(fixture.values.len(), 2);
    }

    #[test]
    fn test_declared_types() {
        let fixture: Fixture = serde_json::from_str(FIXTURE).unwrap();
        let declared: Vec<DeclaredType> = fixture
            .filters
            .iter()
            .map(|f| f.to_field_description().declared)
            .collect();
        assert_eq!(
            declared,
            [
                DeclaredType::Pinned(FilterKind::Text),
                DeclaredType::Advisory(FilterKind::Choice),
                DeclaredType::Unset,
            ]
        );
    }

    #[test]
    fn test_guesser_from_fixture() {
        let fixture: Fixture = serde_json::from_str(FIXTURE).unwrap();
        let ctx = GuessContext::new(&fixture.entity_class, &fixture.model_manager);
        let guess = fixture.guesser().guess_type(&ctx, &"price".into()).unwrap();
        assert_eq!(guess.kind, FilterKind::Range);
        assert_eq!(guess.confidence, Confidence::High);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Fixture::load(Path::new("/nonexistent/fixture.json")).unwrap_err();
        assert!(err.to_string().contains("reading fixture"));
    }
}
