//! Search execution and paging for searchgrid.
//!
//! A [`PagedResultSet`] validates an `(offset, limit)` page request and runs
//! a [`CompositeQuery`](searchgrid_query::CompositeQuery) through a
//! [`SearchTransport`]. Every request is an independent backend execution;
//! no state is cached across pages. [`Pager`] adds a lazy layer on top that
//! executes on first access and again after the page changes.
//!
//! # Transports
//!
//! - [`SimpleSearch`]: in-memory evaluation over JSON documents
//! - anything implementing [`SearchTransport`] (HTTP clients typically send
//!   [`CompositeQuery::to_dsl`](searchgrid_query::CompositeQuery::to_dsl))

pub mod backend;
pub mod pager;

// Re-exports
pub use backend::{SearchHits, SearchRequest, SearchTransport, SimpleSearch};
pub use pager::{DEFAULT_LIMIT, PagedResultSet, Pager, PagerState, ResultPage};

pub use searchgrid_core::{Error, Result};
