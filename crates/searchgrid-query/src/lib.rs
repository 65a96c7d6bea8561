//! Query building for searchgrid.
//!
//! A [`QueryBuilder`] holds the resolved filters of one datagrid. Given the
//! values submitted for them, [`QueryBuilder::build`] produces a
//! [`CompositeQuery`]: a tree of [`Clause`]s with one sub-clause per filter
//! that has a non-empty value, all combined with logical AND.
//!
//! | Kind | Clause |
//! |------|--------|
//! | text | `Match` (analyzed, phrase, or prefix) |
//! | range | `Range` with inclusive, optional bounds |
//! | choice | `Terms` over declared choice values |
//! | boolean | `Term` on the coerced boolean |
//! | relation | `Nested` wrapping `Terms` on the related identifier |
//!
//! Filters without a value are omitted. With no values at all the query is
//! `MatchAll`.

pub mod ast;
pub mod builder;
pub mod value;

// Re-exports
pub use ast::{Clause, CompositeQuery};
pub use builder::QueryBuilder;
pub use value::{FilterValue, FilterValues};

pub use searchgrid_core::{Error, Result};
pub use searchgrid_filter::TextMode;
