//! Integration tests for page execution.

use std::sync::Arc;

use searchgrid::{Error, FilterValue, FilterValues, SearchTransport};

use crate::common::{CountingTransport, FailingTransport, TestHarness, posts};

#[tokio::test]
async fn test_first_and_last_page_of_25() {
    let harness = TestHarness::new();
    let datagrid = harness.datagrid(FilterValues::new());

    let first = datagrid.page(0, 10).await.unwrap();
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total, 25);
    assert!(first.has_next());

    let last = datagrid.page(20, 10).await.unwrap();
    assert_eq!(last.items.len(), 5);
    assert_eq!(last.last_page(), 3);
    assert!(!last.has_next());
}

#[tokio::test]
async fn test_invalid_page_requests_never_reach_backend() {
    let counting = CountingTransport::new(Arc::new(posts(25)));
    let harness = TestHarness::with_transport(counting.clone());
    let datagrid = harness.datagrid(FilterValues::new());

    let err = datagrid.page(-1, 10).await.unwrap_err();
    assert!(matches!(err, Error::InvalidPageRequest { offset: -1, .. }));

    let err = datagrid.page(0, 0).await.unwrap_err();
    assert!(matches!(err, Error::InvalidPageRequest { limit: 0, .. }));

    assert_eq!(counting.calls(), 0);

    datagrid.page(0, 10).await.unwrap();
    assert_eq!(counting.calls(), 1);
}

#[tokio::test]
async fn test_total_stable_across_executions() {
    let harness = TestHarness::new();
    let mut datagrid = harness.datagrid(FilterValues::new());
    datagrid.set_value("title", FilterValue::text("rust"));

    let a = datagrid.page(0, 5).await.unwrap();
    let b = datagrid.page(0, 5).await.unwrap();
    let c = datagrid.page(5, 5).await.unwrap();
    assert_eq!(a.total, 13);
    assert_eq!(a.total, b.total);
    assert_eq!(a.total, c.total);
    assert_eq!(a.items, b.items);
}

#[tokio::test]
async fn test_backend_failure_surfaces_unchanged() {
    let harness = TestHarness::with_transport(Arc::new(FailingTransport));
    let datagrid = harness.datagrid(FilterValues::new());

    let err = datagrid.page(0, 10).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Backend { ref message, .. } if message.contains("connection refused")
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_pages_do_not_overlap() {
    let harness = TestHarness::new();
    let datagrid = harness.datagrid(FilterValues::new());

    let mut seen = Vec::new();
    for offset in (0..25).step_by(10) {
        seen.extend(datagrid.page(offset, 10).await.unwrap().items);
    }
    let expected: Vec<String> = (0..25).map(|i| i.to_string()).collect();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn test_counting_transport_name() {
    let counting = CountingTransport::new(Arc::new(posts(1)));
    assert_eq!(counting.name(), "counting");
}
