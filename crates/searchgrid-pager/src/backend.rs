//! Search transport trait and the in-memory transport.
//!
//! A transport takes a [`SearchRequest`] and returns the ids of the matching
//! documents for the requested window plus the overall match count. It does
//! not interpret paging rules; [`PagedResultSet`](crate::PagedResultSet)
//! validates requests before they get here.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use searchgrid_core::scalar::{as_text, compare, loosely_equal};
use searchgrid_core::{Error, Result};
use searchgrid_query::{Clause, CompositeQuery, TextMode};

/// One backend execution.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Query to run.
    pub query: CompositeQuery,
    /// Number of matches to skip.
    pub offset: usize,
    /// Maximum number of ids to return.
    pub limit: usize,
    /// Caller deadline, for transports with their own timeout support.
    pub timeout: Option<Duration>,
}

/// Ids of one window of matches plus the total match count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHits {
    /// Matching document ids in backend order.
    pub ids: Vec<String>,
    /// Total number of matching documents (independent of the window).
    pub total: usize,
}

impl SearchHits {
    /// No matches.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Backend that executes composite queries.
///
/// # Async
///
/// `search` is async so network transports do not block the runtime.
/// Implementations must be safe to call concurrently.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Execute a query for one window of results.
    async fn search(&self, request: SearchRequest) -> Result<SearchHits>;

    /// Transport name for diagnostics.
    fn name(&self) -> &str;

    /// Check if the transport is ready to handle queries.
    fn is_ready(&self) -> bool {
        true
    }
}

/// In-memory transport evaluating queries over JSON documents.
///
/// Documents are scanned in insertion order, which is also the result order.
///
/// # Matching
///
/// - Field names are dotted paths; arrays along the path are flattened.
/// - `Match` is case-insensitive: every query word must occur in the field
///   (`Phrase`: the whole text must occur, `Prefix`: a value must start
///   with it).
/// - `Term`/`Terms` compare loosely (`"3"` equals `3`).
/// - `Nested` requires one related object to satisfy the whole sub-query.
///
/// # Limitations
///
/// - O(n) search time
/// - No relevance scoring
/// - No stemming or fuzzy matching
pub struct SimpleSearch {
    name: String,
    documents: Vec<(String, Value)>,
}

impl SimpleSearch {
    /// Create an empty transport.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Vec::new(),
        }
    }

    /// Add a document.
    pub fn with_document(mut self, id: impl Into<String>, document: Value) -> Self {
        self.documents.push((id.into(), document));
        self
    }

    /// Create a transport from documents carrying their id in `id_field`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a document has no scalar value at
    /// `id_field`.
    pub fn from_documents(
        name: impl Into<String>,
        documents: Vec<Value>,
        id_field: &str,
    ) -> Result<Self> {
        let mut search = Self::new(name);
        for (index, document) in documents.into_iter().enumerate() {
            let id = document.get(id_field).and_then(as_text).ok_or_else(|| {
                Error::config(format!(
                    "document #{index} has no scalar '{id_field}' field"
                ))
            })?;
            search.documents.push((id, document));
        }
        Ok(search)
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether there are no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn matching(&self, query: &CompositeQuery) -> impl Iterator<Item = &str> {
        self.documents
            .iter()
            .filter(move |(_, document)| Scope::root(document).matches(query.root()))
            .map(|(id, _)| id.as_str())
    }
}

#[async_trait]
impl SearchTransport for SimpleSearch {
    async fn search(&self, request: SearchRequest) -> Result<SearchHits> {
        let mut total = 0;
        let mut ids = Vec::new();
        for id in self.matching(&request.query) {
            if total >= request.offset && ids.len() < request.limit {
                ids.push(id.to_string());
            }
            total += 1;
        }

        log::debug!(
            "SimpleSearch '{}': {} of {} document(s) match, returning {} from offset {}",
            self.name,
            total,
            self.documents.len(),
            ids.len(),
            request.offset
        );

        Ok(SearchHits { ids, total })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for SimpleSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleSearch")
            .field("name", &self.name)
            .field("documents", &self.documents.len())
            .finish()
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// A document, optionally narrowed to one related object by `Nested`.
#[derive(Clone, Copy)]
struct Scope<'a> {
    root: &'a Value,
    nested: Option<(&'a str, &'a Value)>,
}

impl<'a> Scope<'a> {
    fn root(document: &'a Value) -> Self {
        Self {
            root: document,
            nested: None,
        }
    }

    /// Leaf values at a dotted path.
    fn values(&self, field: &str) -> Vec<&'a Value> {
        if let Some((path, object)) = self.nested
            && let Some(rest) = field
                .strip_prefix(path)
                .and_then(|rest| rest.strip_prefix('.'))
        {
            return lookup(object, rest);
        }
        lookup(self.root, field)
    }

    fn matches(&self, clause: &Clause) -> bool {
        match clause {
            Clause::MatchAll => true,
            Clause::Match { field, query, mode } => {
                let texts = self.values(field).into_iter().filter_map(as_text);
                text_matches(texts, query, *mode)
            }
            Clause::Range { field, gte, lte } => self.values(field).into_iter().any(|v| {
                gte.as_ref()
                    .is_none_or(|gte| compare(v, gte).is_some_and(|o| o.is_ge()))
                    && lte
                        .as_ref()
                        .is_none_or(|lte| compare(v, lte).is_some_and(|o| o.is_le()))
            }),
            Clause::Terms { field, values } => self
                .values(field)
                .into_iter()
                .any(|v| values.iter().any(|expected| loosely_equal(v, expected))),
            Clause::Term { field, value } => self
                .values(field)
                .into_iter()
                .any(|v| loosely_equal(v, value)),
            Clause::Nested { path, query } => self.values(path).into_iter().any(|object| {
                let scope = Scope {
                    root: self.root,
                    nested: Some((path.as_str(), object)),
                };
                scope.matches(query)
            }),
            Clause::Bool { must } => must.iter().all(|clause| self.matches(clause)),
        }
    }
}

fn lookup<'a>(value: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current = vec![value];
    for segment in path.split('.') {
        current = current
            .into_iter()
            .flat_map(flatten)
            .filter_map(|v| v.get(segment))
            .collect();
    }
    current.into_iter().flat_map(flatten).collect()
}

fn flatten(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().flat_map(flatten).collect(),
        other => vec![other],
    }
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn text_matches(texts: impl Iterator<Item = String>, query: &str, mode: TextMode) -> bool {
    let needle = query.to_lowercase();
    let mut texts = texts.map(|t| t.to_lowercase());
    match mode {
        TextMode::Match => {
            let wanted = words(&needle);
            if wanted.is_empty() {
                return false;
            }
            let found: Vec<String> = texts.flat_map(|t| words(&t)).collect();
            wanted.iter().all(|w| found.contains(w))
        }
        TextMode::Phrase => texts.any(|t| t.contains(&needle)),
        TextMode::Prefix => texts.any(|t| t.starts_with(&needle)),
    }
}

// ============================================================================
// Tests
// ============================================================================
