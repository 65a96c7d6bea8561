//! Composite query tree.
//!
//! Clauses are backend-neutral. [`CompositeQuery::to_dsl`] renders them in
//! the Elasticsearch query DSL for HTTP transports; in-memory transports
//! walk the tree directly.

use serde_json::{Map, Value, json};

use searchgrid_filter::TextMode;

/// One node of a query tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Matches every document.
    MatchAll,
    /// Text match on a field.
    Match {
        /// Backend field.
        field: String,
        /// Trimmed query text.
        query: String,
        /// Matching mode.
        mode: TextMode,
    },
    /// Inclusive bounds on a field; a missing side is open-ended.
    Range {
        /// Backend field.
        field: String,
        /// Lower bound.
        gte: Option<Value>,
        /// Upper bound.
        lte: Option<Value>,
    },
    /// Field equals any of the values.
    Terms {
        /// Backend field.
        field: String,
        /// Accepted values.
        values: Vec<Value>,
    },
    /// Field equals the value.
    Term {
        /// Backend field.
        field: String,
        /// Expected value.
        value: Value,
    },
    /// Sub-query evaluated inside each related object at `path`.
    ///
    /// Inner field names are full paths (`author.id`), as in the DSL.
    Nested {
        /// Related path.
        path: String,
        /// Query scoped to the related objects.
        query: Box<Clause>,
    },
    /// Every sub-clause must match.
    Bool {
        /// Conjuncts, in filter registration order.
        must: Vec<Clause>,
    },
}

impl Clause {
    /// Render as Elasticsearch query DSL.
    pub fn to_dsl(&self) -> Value {
        match self {
            Self::MatchAll => json!({ "match_all": {} }),
            Self::Match { field, query, mode } => match mode {
                TextMode::Match => json!({
                    "match": { field: { "query": query, "operator": "and" } }
                }),
                TextMode::Phrase => json!({ "match_phrase": { field: query } }),
                TextMode::Prefix => json!({ "prefix": { field: query } }),
            },
            Self::Range { field, gte, lte } => {
                let mut bounds = Map::new();
                if let Some(gte) = gte {
                    bounds.insert("gte".to_string(), gte.clone());
                }
                if let Some(lte) = lte {
                    bounds.insert("lte".to_string(), lte.clone());
                }
                json!({ "range": { field: bounds } })
            }
            Self::Terms { field, values } => json!({ "terms": { field: values } }),
            Self::Term { field, value } => json!({ "term": { field: value } }),
            Self::Nested { path, query } => json!({
                "nested": { "path": path, "query": query.to_dsl() }
            }),
            Self::Bool { must } => {
                let must: Vec<Value> = must.iter().map(Clause::to_dsl).collect();
                json!({ "bool": { "must": must } })
            }
        }
    }
}

/// Query produced by [`QueryBuilder::build`](crate::QueryBuilder::build).
///
/// The root is either [`Clause::MatchAll`] (no filter had a value) or a
/// [`Clause::Bool`] with one conjunct per filter that had a value.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeQuery {
    root: Clause,
}

impl CompositeQuery {
    /// The neutral query.
    pub fn match_all() -> Self {
        Self {
            root: Clause::MatchAll,
        }
    }

    /// AND of `clauses`; the neutral query when there are none.
    pub fn all_of(clauses: Vec<Clause>) -> Self {
        if clauses.is_empty() {
            Self::match_all()
        } else {
            Self {
                root: Clause::Bool { must: clauses },
            }
        }
    }

    /// Root clause.
    pub fn root(&self) -> &Clause {
        &self.root
    }

    /// Top-level conjuncts (empty for the neutral query).
    pub fn clauses(&self) -> &[Clause] {
        match &self.root {
            Clause::Bool { must } => must,
            _ => &[],
        }
    }

    /// Whether this query matches every document.
    pub fn is_match_all(&self) -> bool {
        matches!(self.root, Clause::MatchAll)
    }

    /// Render as Elasticsearch query DSL.
    pub fn to_dsl(&self) -> Value {
        self.root.to_dsl()
    }
}

impl Default for CompositeQuery {
    fn default() -> Self {
        Self::match_all()
    }
}
