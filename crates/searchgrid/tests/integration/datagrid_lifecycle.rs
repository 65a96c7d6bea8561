//! Integration tests for query building over a full datagrid.

use serde_json::json;

use searchgrid::{Error, FilterValue, FilterValues};

use crate::common::TestHarness;

fn values(json: serde_json::Value) -> FilterValues {
    serde_json::from_value(json).unwrap()
}

#[test]
fn test_no_values_is_match_all() {
    let harness = TestHarness::new();
    let query = harness.datagrid(FilterValues::new()).build_query().unwrap();
    assert!(query.is_match_all());
}

#[test]
fn test_lower_bound_only_is_open_ended() {
    let harness = TestHarness::new();
    let datagrid = harness.datagrid(values(json!({"price": {"from": 10}})));
    let query = datagrid.build_query().unwrap();
    assert_eq!(
        query.to_dsl(),
        json!({"bool": {"must": [{"range": {"price": {"gte": 10}}}]}})
    );
}

#[test]
fn test_choice_outside_set_returns_no_query() {
    let harness = TestHarness::new();
    let datagrid = harness.datagrid(values(json!({"title": "rust", "status": "deleted"})));
    let result = datagrid.build_query();
    assert!(matches!(
        result,
        Err(Error::InvalidOption { ref field, ref option, .. })
            if field == "status" && option == "value"
    ));
}

#[tokio::test]
async fn test_filters_combine_with_and() {
    let harness = TestHarness::new();
    let datagrid = harness.datagrid(values(json!({
        "title": "rust",
        "price": {"from": 4, "to": 20},
        "status": "draft",
    })));

    // Even ids mention rust; draft is i % 3 == 0; 4..=20 → 6, 12, 18
    let page = datagrid.page(0, 10).await.unwrap();
    assert_eq!(page.items, ["6", "12", "18"]);
    assert_eq!(page.total, 3);
}

#[tokio::test]
async fn test_relation_and_boolean_filters() {
    let harness = TestHarness::new();
    let mut datagrid = harness.datagrid(values(json!({"author": [1]})));
    datagrid.set_value("published", FilterValue::text("yes"));

    let page = datagrid.page(0, 100).await.unwrap();
    // Author 1 and published are both i % 3 == 1
    assert_eq!(page.total, 8);
    assert_eq!(page.items[0], "1");

    datagrid.set_value("published", FilterValue::boolean(false));
    let page = datagrid.page(0, 100).await.unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_lazy_pager_over_datagrid() {
    let harness = TestHarness::new();
    let datagrid = harness.datagrid(values(json!({"status": "published"})));
    let mut pager = datagrid.pager().unwrap();

    let page = pager.results().await.unwrap();
    assert_eq!(page.total, 8);

    pager.set_page(5, 5);
    let page = pager.results().await.unwrap();
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.page_number(), 2);
}
