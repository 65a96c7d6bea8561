//! Label translation capability.
//!
//! When a resolved filter carries no label, one is derived from the field
//! identifier through a [`LabelTranslator`].

use searchgrid_core::FieldId;

/// Derives a human-readable label from a field identifier.
pub trait LabelTranslator: Send + Sync {
    /// Label for `field`. Must be deterministic.
    fn label(&self, field: &FieldId) -> String;
}

/// Sentence-case labels: `createdAt` and `created_at` both become `Created at`.
///
/// Dots in nested paths are treated as word breaks (`author.name` → `Author name`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeLabels;

impl LabelTranslator for NativeLabels {
    fn label(&self, field: &FieldId) -> String {
        let words = split_words(field.as_str()).join(" ").to_lowercase();
        let mut chars = words.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Translation-key labels: `createdAt` becomes `filter.label_created_at`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnderscoreLabels;

impl LabelTranslator for UnderscoreLabels {
    fn label(&self, field: &FieldId) -> String {
        let key = split_words(field.as_str()).join("_").to_lowercase();
        format!("filter.label_{key}")
    }
}

/// Split on underscores, whitespace, dots, and lower→upper camel boundaries.
fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in name.chars() {
        if c == '_' || c == '.' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
