//! Paged result sets.
//!
//! [`PagedResultSet::execute`] is the single entry point to the backend:
//! it rejects invalid page requests before any call is made, runs the query
//! for one window, and wraps transport failures as [`Error::Backend`].
//!
//! Totals come from the backend on every execution. Two pages of the same
//! query agree on `total` only as long as the indexed data does not change
//! between the calls; nothing here provides snapshot isolation.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use searchgrid_core::{Error, Result};
use searchgrid_query::CompositeQuery;

use crate::backend::{SearchRequest, SearchTransport};

/// Page size used by [`Pager::new`].
pub const DEFAULT_LIMIT: i64 = 25;

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultPage {
    /// Offset the page was requested at.
    pub offset: usize,
    /// Requested page size.
    pub limit: usize,
    /// Matching document ids, at most `limit` of them.
    pub items: Vec<String>,
    /// Total number of matches across all pages.
    pub total: usize,
}

impl ResultPage {
    /// 1-based page number (`offset / limit + 1`).
    pub fn page_number(&self) -> usize {
        self.offset / self.limit.max(1) + 1
    }

    /// Number of the last page; 1 when there are no matches.
    pub fn last_page(&self) -> usize {
        self.total.div_ceil(self.limit.max(1)).max(1)
    }

    /// Whether matches exist past this page.
    pub fn has_next(&self) -> bool {
        self.offset.saturating_add(self.limit) < self.total
    }

    /// Whether this page starts after the first match.
    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    /// Number of items on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Executes queries against a transport one page at a time.
///
/// Holds no per-request state; clones share the transport and `execute`
/// may run concurrently.
#[derive(Clone)]
pub struct PagedResultSet {
    transport: Arc<dyn SearchTransport>,
    timeout: Option<Duration>,
}

impl PagedResultSet {
    /// Create a result set over a transport, without a deadline.
    pub fn new(transport: Arc<dyn SearchTransport>) -> Self {
        Self {
            transport,
            timeout: None,
        }
    }

    /// Set the per-execution deadline.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Per-execution deadline.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Name of the underlying transport.
    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    /// Execute `query` for the window `[offset, offset + limit)`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPageRequest`] if `offset < 0` or `limit <= 0`; the
    ///   backend is not called.
    /// - [`Error::Backend`] if the transport fails or the deadline expires.
    pub async fn execute(
        &self,
        query: &CompositeQuery,
        offset: i64,
        limit: i64,
    ) -> Result<ResultPage> {
        let (start, size) = validate(offset, limit)?;

        let request = SearchRequest {
            query: query.clone(),
            offset: start,
            limit: size,
            timeout: self.timeout,
        };

        log::debug!(
            "Executing page offset={start} limit={size} on '{}'",
            self.transport.name()
        );

        let search = self.transport.search(request);
        let outcome = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, search)
                .await
                .map_err(|elapsed| Error::backend_timeout(timeout, elapsed))?,
            None => search.await,
        };

        let mut hits = outcome.map_err(|e| match e {
            Error::Backend { .. } => e,
            other => Error::backend_with_source(
                format!("transport '{}' failed", self.transport.name()),
                other,
            ),
        })?;

        if hits.ids.len() > size {
            log::warn!(
                "Transport '{}' returned {} ids for limit {size}, truncating",
                self.transport.name(),
                hits.ids.len()
            );
            hits.ids.truncate(size);
        }

        Ok(ResultPage {
            offset: start,
            limit: size,
            items: hits.ids,
            total: hits.total,
        })
    }
}

impl std::fmt::Debug for PagedResultSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedResultSet")
            .field("transport", &self.transport.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn validate(offset: i64, limit: i64) -> Result<(usize, usize)> {
    if offset < 0 {
        return Err(Error::invalid_page(offset, limit, "offset must be >= 0"));
    }
    if limit <= 0 {
        return Err(Error::invalid_page(offset, limit, "limit must be > 0"));
    }
    let start = usize::try_from(offset)
        .map_err(|_| Error::invalid_page(offset, limit, "offset does not fit in memory"))?;
    let size = usize::try_from(limit)
        .map_err(|_| Error::invalid_page(offset, limit, "limit does not fit in memory"))?;
    Ok((start, size))
}

// ============================================================================
// Lazy pager
// ============================================================================

/// Whether a [`Pager`] has results for its current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerState {
    /// Nothing executed since the last page change.
    Unexecuted,
    /// Results of the last execution.
    Executed(Arc<ResultPage>),
}

/// A query and a page position, executed on first access.
///
/// Changing the page or the query sends the pager back to
/// [`PagerState::Unexecuted`]; the next [`Pager::results`] call executes
/// again and yields a new [`ResultPage`].
#[derive(Debug, Clone)]
pub struct Pager {
    results: PagedResultSet,
    query: CompositeQuery,
    offset: i64,
    limit: i64,
    state: PagerState,
}

impl Pager {
    /// Create a pager on the first page of [`DEFAULT_LIMIT`] items.
    pub fn new(results: PagedResultSet, query: CompositeQuery) -> Self {
        Self {
            results,
            query,
            offset: 0,
            limit: DEFAULT_LIMIT,
            state: PagerState::Unexecuted,
        }
    }

    /// Move to another window. Validation happens on the next execution.
    pub fn set_page(&mut self, offset: i64, limit: i64) {
        self.offset = offset;
        self.limit = limit;
        self.state = PagerState::Unexecuted;
    }

    /// Replace the query.
    pub fn set_query(&mut self, query: CompositeQuery) {
        self.query = query;
        self.state = PagerState::Unexecuted;
    }

    /// Current query.
    pub fn query(&self) -> &CompositeQuery {
        &self.query
    }

    /// Current offset.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Current limit.
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Current state.
    pub fn state(&self) -> &PagerState {
        &self.state
    }

    /// Results of the current page, executing if needed.
    ///
    /// # Errors
    ///
    /// Propagates [`PagedResultSet::execute`] errors; the pager stays
    /// unexecuted.
    pub async fn results(&mut self) -> Result<Arc<ResultPage>> {
        if let PagerState::Executed(page) = &self.state {
            return Ok(Arc::clone(page));
        }
        let page = Arc::new(
            self.results
                .execute(&self.query, self.offset, self.limit)
                .await?,
        );
        self.state = PagerState::Executed(Arc::clone(&page));
        Ok(page)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::{SearchHits, SimpleSearch};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and returns a fixed number of ids.
    struct Counting {
        calls: AtomicUsize,
        returned: usize,
        total: usize,
    }

    impl Counting {
        fn new(returned: usize, total: usize) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                returned,
                total,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SearchTransport for Counting {
        async fn search(&self, _request: SearchRequest) -> Result<SearchHits> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SearchHits {
                ids: (0..self.returned).map(|i| i.to_string()).collect(),
                total: self.total,
            })
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    struct Failing;

    #[async_trait]
    impl SearchTransport for Failing {
        async fn search(&self, _request: SearchRequest) -> Result<SearchHits> {
            Err(Error::config("index 'posts' does not exist"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct Slow;

    #[async_trait]
    impl SearchTransport for Slow {
        async fn search(&self, _request: SearchRequest) -> Result<SearchHits> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(SearchHits::empty())
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    fn documents(n: usize) -> Arc<SimpleSearch> {
        let docs = (0..n).map(|i| json!({"id": i, "n": i})).collect();
        Arc::new(SimpleSearch::from_documents("docs", docs, "id").unwrap())
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_invalid_page_never_calls_backend() {
        let transport = Counting::new(0, 0);
        let results = PagedResultSet::new(transport.clone());
        let query = CompositeQuery::match_all();

        for (offset, limit) in [(-1, 10), (0, 0), (0, -5)] {
            let err = results.execute(&query, offset, limit).await.unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidPageRequest { offset: o, limit: l, .. }
                    if o == offset && l == limit
            ));
        }
        assert_eq!(transport.calls(), 0);
    }

    // ------------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_pages_over_documents() {
        let results = PagedResultSet::new(documents(25));
        let query = CompositeQuery::match_all();

        let first = results.execute(&query, 0, 10).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(first.total, 25);
        assert_eq!(first.items[0], "0");

        let last = results.execute(&query, 20, 10).await.unwrap();
        assert_eq!(last.items, ["20", "21", "22", "23", "24"]);
        assert_eq!(last.total, first.total);

        let past = results.execute(&query, 40, 10).await.unwrap();
        assert!(past.is_empty());
        assert_eq!(past.total, 25);
    }

    #[tokio::test]
    async fn test_each_execute_calls_backend() {
        let transport = Counting::new(3, 3);
        let results = PagedResultSet::new(transport.clone());
        let query = CompositeQuery::match_all();
        results.execute(&query, 0, 10).await.unwrap();
        results.execute(&query, 0, 10).await.unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_oversized_backend_response_truncated() {
        let results = PagedResultSet::new(Counting::new(8, 100));
        let page = results
            .execute(&CompositeQuery::match_all(), 0, 5)
            .await
            .unwrap();
        assert_eq!(page.len(), 5);
        assert_eq!(page.total, 100);
    }

    #[tokio::test]
    async fn test_transport_error_wrapped_as_backend() {
        let results = PagedResultSet::new(Arc::new(Failing));
        let err = results
            .execute(&CompositeQuery::match_all(), 0, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Backend { source: Some(_), .. }));
        assert!(err.is_retryable());
        let source = std::error::Error::source(&err).unwrap().to_string();
        assert!(source.contains("posts"));
    }

    #[tokio::test]
    async fn test_timeout_surfaces_as_backend() {
        let results =
            PagedResultSet::new(Arc::new(Slow)).with_timeout(Some(Duration::from_millis(10)));
        let err = results
            .execute(&CompositeQuery::match_all(), 0, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Backend { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_executions() {
        let results = PagedResultSet::new(documents(25));
        let query = CompositeQuery::match_all();
        let pages = futures::future::join_all(
            [0, 10, 20].map(|offset| results.execute(&query, offset, 10)),
        )
        .await;
        let lens: Vec<usize> = pages.into_iter().map(|p| p.unwrap().len()).collect();
        assert_eq!(lens, [10, 10, 5]);
    }

    #[test]
    fn test_execute_outside_async_test() {
        let results = PagedResultSet::new(documents(3));
        let page =
            tokio_test::block_on(results.execute(&CompositeQuery::match_all(), 1, 1)).unwrap();
        assert_eq!(page.items, ["1"]);
    }

    // ------------------------------------------------------------------------
    // Page arithmetic
    // ------------------------------------------------------------------------

    #[test]
    fn test_page_arithmetic() {
        let page = ResultPage {
            offset: 20,
            limit: 10,
            items: vec!["x".into(); 5],
            total: 25,
        };
        assert_eq!(page.page_number(), 3);
        assert_eq!(page.last_page(), 3);
        assert!(!page.has_next());
        assert!(page.has_previous());

        let empty = ResultPage {
            offset: 0,
            limit: 10,
            items: vec![],
            total: 0,
        };
        assert_eq!(empty.page_number(), 1);
        assert_eq!(empty.last_page(), 1);
        assert!(!empty.has_next());
        assert!(!empty.has_previous());
    }

    // ------------------------------------------------------------------------
    // Pager
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_pager_is_lazy_and_caches() {
        let transport = Counting::new(2, 2);
        let mut pager = Pager::new(
            PagedResultSet::new(transport.clone()),
            CompositeQuery::match_all(),
        );
        assert_eq!(pager.state(), &PagerState::Unexecuted);
        assert_eq!(transport.calls(), 0);

        let first = pager.results().await.unwrap();
        let again = pager.results().await.unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_pager_set_page_reexecutes() {
        let mut pager = Pager::new(PagedResultSet::new(documents(25)), CompositeQuery::match_all());
        let first = pager.results().await.unwrap();
        assert_eq!(first.len(), 25);

        pager.set_page(20, 10);
        assert_eq!(pager.state(), &PagerState::Unexecuted);
        let second = pager.results().await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 5);
        assert!(matches!(pager.state(), PagerState::Executed(_)));
    }

    #[tokio::test]
    async fn test_pager_error_leaves_unexecuted() {
        let mut pager = Pager::new(PagedResultSet::new(documents(5)), CompositeQuery::match_all());
        pager.set_page(-3, 10);
        assert!(pager.results().await.is_err());
        assert_eq!(pager.state(), &PagerState::Unexecuted);
    }
}
