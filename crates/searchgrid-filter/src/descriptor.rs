//! Resolved filter descriptors.

use serde::Serialize;

use searchgrid_core::FieldId;

use crate::kind::FilterKind;
use crate::options::FilterOptions;

/// Normalized specification of how one field can be queried.
///
/// The kind is fixed at construction; there is no setter. Descriptors are
/// produced by [`FilterResolver`](crate::FilterResolver) once per admin field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterDescriptor {
    field: FieldId,
    kind: FilterKind,
    options: FilterOptions,
}

impl FilterDescriptor {
    /// Create a descriptor. The kind is the one `options` were parsed for.
    pub fn new(field: FieldId, options: FilterOptions) -> Self {
        Self {
            field,
            kind: options.kind.kind(),
            options,
        }
    }

    /// Field the filter is registered for.
    pub fn field(&self) -> &FieldId {
        &self.field
    }

    /// Filter kind.
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Parsed options.
    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// Display label.
    pub fn label(&self) -> Option<&str> {
        self.options.label.as_deref()
    }

    /// Backend field queried by this filter (`field_name` option, else the field id).
    pub fn backend_field(&self) -> &str {
        self.options
            .field_name
            .as_deref()
            .unwrap_or(self.field.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::options::OptionBag;
    use serde_json::json;

    #[test]
    fn test_backend_field_defaults_to_field_id() {
        let field = FieldId::from("title");
        let options = FilterOptions::from_bag(&field, FilterKind::Text, &OptionBag::new()).unwrap();
        let descriptor = FilterDescriptor::new(field, options);
        assert_eq!(descriptor.backend_field(), "title");
        assert!(descriptor.label().is_none());
    }

    #[test]
    fn test_backend_field_override() {
        let field = FieldId::from("title");
        let bag = OptionBag::new().with("field_name", json!("title.keyword"));
        let options = FilterOptions::from_bag(&field, FilterKind::Text, &bag).unwrap();
        let descriptor = FilterDescriptor::new(field, options);
        assert_eq!(descriptor.backend_field(), "title.keyword");
        assert_eq!(descriptor.field().as_str(), "title");
    }

    #[test]
    fn test_kind_follows_parsed_options() {
        let field = FieldId::from("price");
        let bag = OptionBag::new().with("min", json!(0));
        let options = FilterOptions::from_bag(&field, FilterKind::Range, &bag).unwrap();
        let descriptor = FilterDescriptor::new(field, options);
        assert_eq!(descriptor.kind(), FilterKind::Range);
        assert_eq!(descriptor.options().kind.kind(), descriptor.kind());
    }
}
