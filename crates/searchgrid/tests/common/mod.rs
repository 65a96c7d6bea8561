//! Common test utilities and harness for searchgrid integration tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;

use searchgrid::filter::{Confidence, MappingGuesser, NativeLabels, TypeGuess};
use searchgrid::pager::{SearchHits, SearchRequest};
use searchgrid::{
    AdminContext, ConfiguredFinders, Error, FieldDescription, FilterKind, FilterResolver,
    FilterValues, NoFixups, Result, SearchDatagridBuilder, SearchGridConfig, SearchTransport,
    SimpleSearch,
};

pub const POST_FINDER: &str = "finder.app.post";

/// Wraps a transport and counts the calls that reach it.
pub struct CountingTransport {
    inner: Arc<dyn SearchTransport>,
    calls: AtomicUsize,
}

impl CountingTransport {
    pub fn new(inner: Arc<dyn SearchTransport>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchTransport for CountingTransport {
    async fn search(&self, request: SearchRequest) -> Result<SearchHits> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.search(request).await
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Always fails like an unreachable cluster.
pub struct FailingTransport;

#[async_trait]
impl SearchTransport for FailingTransport {
    async fn search(&self, _request: SearchRequest) -> Result<SearchHits> {
        Err(Error::backend("connection refused"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Test harness for integration tests.
///
/// Provides an admin for `App\Entity\Post` whose finder is `transport`, and
/// a guesser that knows the post fields.
pub struct TestHarness {
    pub admin: AdminContext,
    pub builder: SearchDatagridBuilder,
}

impl TestHarness {
    /// Harness over 25 generated posts.
    pub fn new() -> Self {
        Self::with_transport(Arc::new(posts(25)))
    }

    /// Harness over a custom transport.
    pub fn with_transport(transport: Arc<dyn SearchTransport>) -> Self {
        let config = SearchGridConfig::default().with_finder("admin.post", POST_FINDER);
        let finders = ConfiguredFinders::new(config).register(POST_FINDER, transport);
        let resolver = FilterResolver::new(Arc::new(post_guesser()), Arc::new(NativeLabels));
        Self {
            admin: AdminContext::new("admin.post", "App\\Entity\\Post", "orm"),
            builder: SearchDatagridBuilder::new(Arc::new(NoFixups), resolver, Arc::new(finders)),
        }
    }

    /// Datagrid with every post filter registered.
    pub fn datagrid(&self, values: FilterValues) -> searchgrid::Datagrid {
        let mut datagrid = self.builder.base_datagrid(&self.admin, values).unwrap();
        for field in ["title", "price", "status", "published", "author"] {
            self.builder
                .add_filter(&mut datagrid, &FieldDescription::new(field), &self.admin)
                .unwrap();
        }
        datagrid
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

pub fn post_guesser() -> MappingGuesser {
    MappingGuesser::new()
        .with_guess("title", TypeGuess::new(FilterKind::Text, Confidence::High))
        .with_guess(
            "price",
            TypeGuess::new(FilterKind::Range, Confidence::High)
                .with_option("min", json!(0))
                .with_option("field_options", json!({"attr": {"step": 1}})),
        )
        .with_guess(
            "status",
            TypeGuess::new(FilterKind::Choice, Confidence::High)
                .with_option("choices", json!(["draft", "published", "archived"])),
        )
        .with_guess("published", TypeGuess::new(FilterKind::Boolean, Confidence::Medium))
        .with_guess(
            "author",
            TypeGuess::new(FilterKind::Relation, Confidence::High)
                .with_option("relation", json!("author")),
        )
}

/// `n` posts: prices 0..n, status cycling draft/published/archived,
/// author `i % 3`, titles "Post i" with "rust" on even ids.
pub fn posts(n: usize) -> SimpleSearch {
    let statuses = ["draft", "published", "archived"];
    (0..n).fold(SimpleSearch::new("posts"), |search, i| {
        let title = if i % 2 == 0 {
            format!("Post {i} about Rust")
        } else {
            format!("Post {i}")
        };
        search.with_document(
            i.to_string(),
            json!({
                "title": title,
                "price": i,
                "status": statuses[i % 3],
                "published": i % 3 == 1,
                "author": {"id": i % 3},
            }),
        )
    })
}
