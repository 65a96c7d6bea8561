//! Integration tests for filter resolution through the datagrid builder.

use serde_json::json;

use searchgrid::filter::KindOptions;
use searchgrid::{DeclaredType, Error, FieldDescription, FilterKind, FilterValues, OptionBag};

use crate::common::TestHarness;

#[test]
fn test_guessed_defaults_merged_under_caller_options() {
    let harness = TestHarness::new();
    let mut datagrid = harness.builder.base_datagrid(&harness.admin, FilterValues::new()).unwrap();

    let field = FieldDescription::new("price").with_options(
        OptionBag::new()
            .with("max", json!(500))
            .with("field_options", json!({"attr": {"placeholder": "EUR"}, "required": true})),
    );
    let descriptor = harness
        .builder
        .add_filter(&mut datagrid, &field, &harness.admin)
        .unwrap();

    assert_eq!(
        descriptor.options().kind,
        KindOptions::Range {
            min: Some(json!(0)),
            max: Some(json!(500)),
        }
    );
    // Nested mapping merged one level: the caller's `attr` replaces the
    // guessed `attr` as a whole value, `required` is forced false.
    let field_options = &descriptor.options().field_options;
    assert_eq!(field_options.get("attr"), Some(&json!({"placeholder": "EUR"})));
    assert_eq!(field_options.get("required"), Some(&json!(false)));
}

#[test]
fn test_required_forced_false_for_every_kind() {
    let harness = TestHarness::new();
    let datagrid = harness.datagrid(FilterValues::new());
    for descriptor in datagrid.filters() {
        assert!(
            !descriptor.options().is_required(),
            "{} should not be required",
            descriptor.field()
        );
    }
    assert_eq!(datagrid.filters().len(), 5);
}

#[test]
fn test_pinned_type_overrides_guess() {
    let harness = TestHarness::new();
    let mut datagrid = harness.builder.base_datagrid(&harness.admin, FilterValues::new()).unwrap();
    let field =
        FieldDescription::new("status").with_declared(DeclaredType::Pinned(FilterKind::Text));
    let descriptor = harness
        .builder
        .add_filter(&mut datagrid, &field, &harness.admin)
        .unwrap();
    assert_eq!(descriptor.kind(), FilterKind::Text);
}

#[test]
fn test_unresolvable_field_keeps_other_filters() {
    let harness = TestHarness::new();
    let mut datagrid = harness.datagrid(FilterValues::new());
    let err = harness
        .builder
        .add_filter(&mut datagrid, &FieldDescription::new("slug"), &harness.admin)
        .unwrap_err();
    assert!(matches!(err, Error::UnresolvableField { ref field } if field == "slug"));
    assert_eq!(datagrid.filters().len(), 5);
}

#[test]
fn test_incompatible_option_rejected() {
    let harness = TestHarness::new();
    let mut datagrid = harness.builder.base_datagrid(&harness.admin, FilterValues::new()).unwrap();
    let field =
        FieldDescription::new("published").with_options(OptionBag::new().with("min", json!(1)));
    let err = harness
        .builder
        .add_filter(&mut datagrid, &field, &harness.admin)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOption { ref option, .. } if option == "min"));
    assert!(datagrid.filters().is_empty());
}
